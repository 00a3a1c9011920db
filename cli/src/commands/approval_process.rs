use crate::client::{ApprovalProcessKind, Credentials, DefenderApi, DeployClient};
use crate::error::Error;
use crate::network::Network;
use crate::options::{OptionSchema, ParseOutcome, StringOption};

const USAGE: &str = "Usage: defender-deploy-cli getDeployApprovalProcess|getUpgradeApprovalProcess --chainId <CHAIN_ID>";
const DETAILS: &str = "
Gets the deploy or upgrade approval process configured for a network on OpenZeppelin Defender.

Required options:
  --chainId <CHAIN_ID>  Chain ID of the network to query.
";

const DEPLOY_SCHEMA: OptionSchema = OptionSchema {
    command: "getDeployApprovalProcess",
    sub_verb: None,
    strings: &[StringOption { name: "chainId", required: true }],
    bools: &[],
};

const UPGRADE_SCHEMA: OptionSchema = OptionSchema {
    command: "getUpgradeApprovalProcess",
    sub_verb: None,
    strings: &[StringOption { name: "chainId", required: true }],
    bools: &[],
};

#[derive(Debug)]
pub struct FunctionArgs {
    pub network: Network,
}

/// Parses and validates the approval-process argument list for the given
/// kind. `Ok(None)` means help was requested.
pub fn function_args(kind: ApprovalProcessKind, args: &[String]) -> Result<Option<FunctionArgs>, Error> {
    let schema = match kind {
        ApprovalProcessKind::Deploy => &DEPLOY_SCHEMA,
        ApprovalProcessKind::Upgrade => &UPGRADE_SCHEMA,
    };
    let options = match schema.apply(args)? {
        ParseOutcome::Help => {
            println!("{USAGE}");
            println!("{DETAILS}");
            return Ok(None);
        }
        ParseOutcome::Options(options) => options,
    };
    let network = Network::from_chain_id_str(&options.required("chainId")?)?;
    Ok(Some(FunctionArgs { network }))
}

pub async fn run(kind: ApprovalProcessKind, args: &[String]) -> Result<(), Error> {
    let Some(function_args) = function_args(kind, args)? else {
        return Ok(());
    };
    let client = DefenderApi::new(Credentials::from_env()?);
    get_approval_process(kind, function_args, &client).await
}

/// Looks up the approval process of the given kind for the resolved network
/// and prints its identifier, name and signing channel.
pub async fn get_approval_process(
    kind: ApprovalProcessKind,
    args: FunctionArgs,
    client: &impl DeployClient,
) -> Result<(), Error> {
    let response = client.get_approval_process(kind, args.network).await?;
    println!("Approval process ID: {}", response.approval_process_id);
    println!("Name: {}", response.name);
    if let Some(via) = response.via {
        println!("Via: {via}");
    }
    Ok(())
}
