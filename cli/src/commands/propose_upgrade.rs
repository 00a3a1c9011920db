use crate::artifact;
use crate::client::{Credentials, DefenderApi, DeployClient, UpgradeContractRequest};
use crate::error::Error;
use crate::network::Network;
use crate::options::{OptionSchema, ParseOutcome, ParsedOptions, StringOption};

const USAGE: &str = "Usage: defender-deploy-cli proposeUpgrade --proxyAddress <PROXY_ADDRESS> --newImplementationAddress <NEW_IMPLEMENTATION_ADDRESS> --chainId <CHAIN_ID> [--proxyAdminAddress <PROXY_ADMIN_ADDRESS>] [--abiFile <ABI_FILE_PATH>] [--approvalProcessId <APPROVAL_PROCESS_ID>]";
const DETAILS: &str = "
Proposes an upgrade using OpenZeppelin Defender.

Required options:
  --proxyAddress <PROXY_ADDRESS>  Address of the proxy to upgrade.
  --newImplementationAddress <NEW_IMPLEMENTATION_ADDRESS>  Address of the new implementation contract.
  --chainId <CHAIN_ID>            Chain ID of the network to use.

Additional options:
  --proxyAdminAddress <PROXY_ADMIN_ADDRESS>  Address of the proxy's admin contract.
  --abiFile <ABI_FILE_PATH>       Path to a JSON file containing the new implementation's ABI under an 'abi' key.
  --approvalProcessId <APPROVAL_PROCESS_ID>  Approval process to use for the upgrade. Defaults to the upgrade approval process configured for your deployment environment on Defender.
";

const SCHEMA: OptionSchema = OptionSchema {
    command: "proposeUpgrade",
    sub_verb: None,
    strings: &[
        StringOption { name: "proxyAddress", required: true },
        StringOption { name: "newImplementationAddress", required: true },
        StringOption { name: "chainId", required: true },
        StringOption { name: "proxyAdminAddress", required: false },
        StringOption { name: "abiFile", required: false },
        StringOption { name: "approvalProcessId", required: false },
    ],
    bools: &[],
};

#[derive(Debug)]
pub struct FunctionArgs {
    pub proxy_address: String,
    pub new_implementation_address: String,
    pub network: Network,
    pub proxy_admin_address: Option<String>,
    pub abi_file: Option<String>,
    pub approval_process_id: Option<String>,
}

/// Parses and validates the proposeUpgrade argument list. `Ok(None)` means
/// help was requested.
pub fn function_args(args: &[String]) -> Result<Option<FunctionArgs>, Error> {
    let options = match SCHEMA.apply(args)? {
        ParseOutcome::Help => {
            println!("{USAGE}");
            println!("{DETAILS}");
            return Ok(None);
        }
        ParseOutcome::Options(options) => options,
    };
    Ok(Some(from_options(&options)?))
}

fn from_options(options: &ParsedOptions) -> Result<FunctionArgs, Error> {
    Ok(FunctionArgs {
        proxy_address: options.required("proxyAddress")?,
        new_implementation_address: options.required("newImplementationAddress")?,
        network: Network::from_chain_id_str(&options.required("chainId")?)?,
        proxy_admin_address: options.optional("proxyAdminAddress"),
        abi_file: options.optional("abiFile"),
        approval_process_id: options.optional("approvalProcessId"),
    })
}

pub async fn run(args: &[String]) -> Result<(), Error> {
    let Some(function_args) = function_args(args)? else {
        return Ok(());
    };
    let client = DefenderApi::new(Credentials::from_env()?);
    upgrade_contract(function_args, &client).await
}

/// Builds the upgrade request from validated options and submits it. An
/// absent ABI file path leaves the ABI field unset; only a present but
/// unreadable path is an error.
pub async fn upgrade_contract(args: FunctionArgs, client: &impl DeployClient) -> Result<(), Error> {
    let new_implementation_abi = match &args.abi_file {
        Some(path) => Some(artifact::extract_field(path, "abi")?),
        None => None,
    };

    let request = UpgradeContractRequest {
        proxy_address: args.proxy_address,
        new_implementation_address: args.new_implementation_address,
        network: args.network,
        proxy_admin_address: args.proxy_admin_address,
        new_implementation_abi,
        approval_process_id: args.approval_process_id,
    };

    let response = client.upgrade_contract(request).await?;
    println!("Upgrade proposal created with ID: {}", response.proposal_id);
    Ok(())
}
