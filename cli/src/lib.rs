//! Command-line client for OpenZeppelin Defender's deploy, upgrade and
//! approval-process API.

pub mod artifact;
pub mod client;
pub mod commands;
pub mod error;
pub mod network;
pub mod options;

use client::ApprovalProcessKind;
use error::Error;

const USAGE: &str = "Usage: defender-deploy-cli <COMMAND> <OPTIONS>";
const DETAILS: &str = "
Performs actions using OpenZeppelin Defender.

Available commands:
  deploy  Deploys a contract.
  proposeUpgrade  Proposes an upgrade.
  getDeployApprovalProcess  Gets the deploy approval process configured for a network.
  getUpgradeApprovalProcess  Gets the upgrade approval process configured for a network.

Run 'defender-deploy-cli <COMMAND> --help' for more information on a command.
";

/// Routes the first non-flag token to its sub-command. An argument list with
/// no such token (empty, or flags only, e.g. a stray `--help`) renders the
/// top-level usage. The `deploy` sub-command keeps its token as the expected
/// sub-verb positional; the others receive only their flags.
pub async fn run(args: &[String]) -> Result<(), Error> {
    let Some(index) = args.iter().position(|arg| !arg.starts_with('-')) else {
        println!("{USAGE}");
        println!("{DETAILS}");
        return Ok(());
    };

    let rest: Vec<String> = args[..index]
        .iter()
        .chain(&args[index + 1..])
        .cloned()
        .collect();

    match args[index].as_str() {
        "deploy" => commands::deploy::run(args).await,
        "proposeUpgrade" => commands::propose_upgrade::run(&rest).await,
        "getDeployApprovalProcess" => {
            commands::approval_process::run(ApprovalProcessKind::Deploy, &rest).await
        }
        "getUpgradeApprovalProcess" => {
            commands::approval_process::run(ApprovalProcessKind::Upgrade, &rest).await
        }
        other => Err(Error::Usage(format!(
            "Unknown command: {other}\nRun 'defender-deploy-cli --help' for usage."
        ))),
    }
}
