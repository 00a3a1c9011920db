use std::fmt;

use serde::Serialize;

use crate::error::Error;

/// Chain-id to network-name pairs known to Defender. This mirrors the table
/// bundled with the Defender SDK base client; callers go through
/// [`Network::from_chain_id`] so table updates never touch command code.
const KNOWN_NETWORKS: &[(u64, &str)] = &[
    (1, "mainnet"),
    (5, "goerli"),
    (10, "optimism"),
    (56, "bsc"),
    (97, "bsctest"),
    (100, "xdai"),
    (137, "matic"),
    (250, "fantom"),
    (300, "zksync-sepolia"),
    (324, "zksync"),
    (1101, "zkevm"),
    (1284, "moonbeam"),
    (1285, "moonriver"),
    (1287, "moonbase"),
    (2442, "zkevm-sepolia"),
    (4002, "fantomtest"),
    (5000, "mantle"),
    (5003, "mantle-sepolia"),
    (8453, "base"),
    (17000, "holesky"),
    (42161, "arbitrum"),
    (42170, "arbitrum-nova"),
    (42220, "celo"),
    (43113, "fuji"),
    (43114, "avalanche"),
    (44787, "alfajores"),
    (59141, "linea-sepolia"),
    (59144, "linea"),
    (80002, "amoy"),
    (84532, "base-sepolia"),
    (421614, "arbitrum-sepolia"),
    (534351, "scroll-sepolia"),
    (534352, "scroll"),
    (11155111, "sepolia"),
    (11155420, "optimism-sepolia"),
    (1313161554, "aurora"),
    (1313161555, "auroratest"),
];

/// A Defender network name, only constructible from a supported chain id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Network(&'static str);

impl Network {
    /// Resolves a chain id against the known network table.
    pub fn from_chain_id(chain_id: u64) -> Result<Self, Error> {
        KNOWN_NETWORKS
            .iter()
            .copied()
            .find(|(id, _)| *id == chain_id)
            .map(|(_, name)| Network(name))
            .ok_or(Error::NetworkResolution(chain_id))
    }

    /// Resolves the decimal string form of a chain id, as supplied on the
    /// command line via `--chainId`.
    pub fn from_chain_id_str(value: &str) -> Result<Self, Error> {
        let chain_id: u64 = value.trim().parse().map_err(|_| {
            Error::Validation(format!("Invalid option: --chainId must be a decimal chain id, got '{value}'"))
        })?;
        Self::from_chain_id(chain_id)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_chain_ids() {
        for (chain_id, name) in KNOWN_NETWORKS {
            let network = Network::from_chain_id(*chain_id).unwrap();
            assert_eq!(network.as_str(), *name);
        }
    }

    #[test]
    fn mainnet_is_chain_id_one() {
        assert_eq!(Network::from_chain_id(1).unwrap().as_str(), "mainnet");
    }

    #[test]
    fn rejects_unsupported_chain_id() {
        let err = Network::from_chain_id(123456789).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Network 123456789 is not supported by OpenZeppelin Defender"
        );
    }

    #[test]
    fn parses_decimal_chain_id_string() {
        assert_eq!(Network::from_chain_id_str("137").unwrap().as_str(), "matic");
    }

    #[test]
    fn rejects_non_decimal_chain_id_string() {
        let err = Network::from_chain_id_str("0x1").unwrap_err();
        assert!(err.to_string().contains("--chainId"));
    }

    #[test]
    fn serializes_as_bare_name() {
        let network = Network::from_chain_id(1).unwrap();
        assert_eq!(serde_json::to_string(&network).unwrap(), "\"mainnet\"");
    }
}
