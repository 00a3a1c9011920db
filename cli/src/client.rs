use std::env;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::network::Network;

const DEFAULT_BASE_URL: &str = "https://defender-api.openzeppelin.com/deployment";

/// Which approval process to look up on Defender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalProcessKind {
    Deploy,
    Upgrade,
}

impl ApprovalProcessKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalProcessKind::Deploy => "deploy",
            ApprovalProcessKind::Upgrade => "upgrade",
        }
    }
}

impl fmt::Display for ApprovalProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployContractRequest {
    pub contract_name: String,
    pub contract_path: String,
    pub network: Network,
    /// Compact JSON string of the build-info compiler input and output.
    pub artifact_payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constructor_bytecode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_type: Option<String>,
    pub verify_source_code: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relayer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_factory_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeContractRequest {
    pub proxy_address: String,
    pub new_implementation_address: String,
    pub network: Network,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_admin_address: Option<String>,
    /// Compact JSON string of the implementation's ABI, when supplied.
    #[serde(rename = "newImplementationABI", skip_serializing_if = "Option::is_none")]
    pub new_implementation_abi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_process_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResponse {
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeResponse {
    pub proposal_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalProcessResponse {
    pub approval_process_id: String,
    pub name: String,
    pub via: Option<String>,
}

/// The Defender deploy API surface the commands depend on. Kept as a trait so
/// tests can substitute a recording fake without touching the network or the
/// process environment.
pub trait DeployClient {
    #[allow(async_fn_in_trait)]
    async fn deploy_contract(
        &self,
        request: DeployContractRequest,
    ) -> Result<DeploymentResponse, Error>;

    #[allow(async_fn_in_trait)]
    async fn upgrade_contract(
        &self,
        request: UpgradeContractRequest,
    ) -> Result<UpgradeResponse, Error>;

    #[allow(async_fn_in_trait)]
    async fn get_approval_process(
        &self,
        kind: ApprovalProcessKind,
        network: Network,
    ) -> Result<ApprovalProcessResponse, Error>;
}

/// Defender API key pair, read once per invocation.
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    /// Loads `DEFENDER_KEY` and `DEFENDER_SECRET`, honoring a `.env` file
    /// when one is present. Missing values fail fast, before any request is
    /// built.
    pub fn from_env() -> Result<Self, Error> {
        let _ = dotenvy::dotenv();
        match (env::var("DEFENDER_KEY"), env::var("DEFENDER_SECRET")) {
            (Ok(api_key), Ok(api_secret)) => Ok(Self { api_key, api_secret }),
            _ => Err(Error::Configuration(
                "DEFENDER_KEY and DEFENDER_SECRET must be set in environment variables.".to_string(),
            )),
        }
    }
}

/// Concrete client talking to the Defender deploy API over HTTPS.
pub struct DefenderApi {
    http: reqwest::Client,
    credentials: Credentials,
}

impl DefenderApi {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{DEFAULT_BASE_URL}{path}"))
            .header("X-Api-Key", &self.credentials.api_key)
            .header("X-Api-Secret", &self.credentials.api_secret)
    }

    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, Error> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Remote(format!("Defender API returned {status}: {body}")));
        }
        response.json().await.map_err(|e| Error::Remote(e.to_string()))
    }
}

impl DeployClient for DefenderApi {
    async fn deploy_contract(
        &self,
        request: DeployContractRequest,
    ) -> Result<DeploymentResponse, Error> {
        log::debug!("submitting deployment of {} on {}", request.contract_name, request.network);
        let response = self
            .request(reqwest::Method::POST, "/deployments")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Remote(e.to_string()))?;
        Self::decode(response).await
    }

    async fn upgrade_contract(
        &self,
        request: UpgradeContractRequest,
    ) -> Result<UpgradeResponse, Error> {
        log::debug!("submitting upgrade of {} on {}", request.proxy_address, request.network);
        let response = self
            .request(reqwest::Method::POST, "/upgrades")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Remote(e.to_string()))?;
        Self::decode(response).await
    }

    async fn get_approval_process(
        &self,
        kind: ApprovalProcessKind,
        network: Network,
    ) -> Result<ApprovalProcessResponse, Error> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/approval-process/{kind}/{network}"),
            )
            .send()
            .await
            .map_err(|e| Error::Remote(e.to_string()))?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upgrade_request() -> UpgradeContractRequest {
        UpgradeContractRequest {
            proxy_address: "0x123".to_string(),
            new_implementation_address: "0x456".to_string(),
            network: Network::from_chain_id(1).unwrap(),
            proxy_admin_address: None,
            new_implementation_abi: None,
            approval_process_id: None,
        }
    }

    #[test]
    fn absent_optional_fields_are_omitted_from_the_wire_form() {
        let value = serde_json::to_value(upgrade_request()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(object["proxyAddress"], "0x123");
        assert_eq!(object["newImplementationAddress"], "0x456");
        assert_eq!(object["network"], "mainnet");
    }

    #[test]
    fn abi_field_uses_the_upper_case_wire_name() {
        let mut request = upgrade_request();
        request.new_implementation_abi = Some("[]".to_string());
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(value["newImplementationABI"], "[]");
    }

    #[test]
    fn verify_source_code_is_explicit_in_the_deploy_wire_form() {
        let request = DeployContractRequest {
            contract_name: "MyContract".to_string(),
            contract_path: "contracts/MyContract.sol".to_string(),
            network: Network::from_chain_id(1).unwrap(),
            artifact_payload: "{}".to_string(),
            constructor_bytecode: None,
            license_type: None,
            verify_source_code: true,
            relayer_id: None,
            salt: None,
            create_factory_address: None,
        };
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(value["verifySourceCode"], true);
        assert!(value.get("constructorBytecode").is_none());
    }
}
