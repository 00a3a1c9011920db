use crate::artifact;
use crate::client::{Credentials, DefenderApi, DeployClient, DeployContractRequest};
use crate::error::Error;
use crate::network::Network;
use crate::options::{BoolOption, OptionSchema, ParseOutcome, ParsedOptions, StringOption};

const USAGE: &str = "Usage: defender-deploy-cli deploy --contractName <CONTRACT_NAME> --contractPath <CONTRACT_PATH> --chainId <CHAIN_ID> --artifactFile <BUILD_INFO_FILE_PATH> [--constructorBytecode <CONSTRUCTOR_ARGS>] [--licenseType <LICENSE>] [--verifySourceCode <true|false>] [--relayerId <RELAYER_ID>] [--salt <SALT>] [--createFactoryAddress <CREATE_FACTORY_ADDRESS>]";
const DETAILS: &str = "
Deploys a contract using OpenZeppelin Defender.

Required options:
  --contractName <CONTRACT_NAME>  Name of the contract to deploy.
  --contractPath <CONTRACT_PATH>  Path to the contract file.
  --chainId <CHAIN_ID>            Chain ID of the network to deploy to.
  --artifactFile <BUILD_INFO_FILE_PATH>  Path to the build info file containing Solidity compiler input and output for the contract.

Additional options:
  --constructorBytecode <CONSTRUCTOR_BYTECODE>  0x-prefixed ABI encoded byte string representing the constructor arguments. Required if the constructor has arguments.
  --licenseType <LICENSE>         License type for the contract. Recommended if verifying source code. Defaults to \"None\".
  --verifySourceCode <true|false>  Whether to verify source code on block explorers. Defaults to true.
  --relayerId <RELAYER_ID>        Relayer ID to use for deployment. Defaults to the relayer configured for your deployment environment on Defender.
  --salt <SALT>                   Salt to use for CREATE2 deployment. Defaults to a random salt.
  --createFactoryAddress <CREATE_FACTORY_ADDRESS>  Address of the CREATE2 factory to use for deployment. Defaults to the factory provided by Defender.
";

const SCHEMA: OptionSchema = OptionSchema {
    command: "deploy",
    sub_verb: Some("deploy"),
    strings: &[
        StringOption { name: "contractName", required: true },
        StringOption { name: "contractPath", required: true },
        StringOption { name: "chainId", required: true },
        StringOption { name: "artifactFile", required: true },
        StringOption { name: "licenseType", required: false },
        StringOption { name: "constructorBytecode", required: false },
        StringOption { name: "relayerId", required: false },
        StringOption { name: "salt", required: false },
        StringOption { name: "createFactoryAddress", required: false },
    ],
    bools: &[BoolOption { name: "verifySourceCode", default: true }],
};

/// Validated deploy options, one step away from the wire request: the
/// artifact file is still a path here, read only when the request is built.
#[derive(Debug)]
pub struct FunctionArgs {
    pub contract_name: String,
    pub contract_path: String,
    pub network: Network,
    pub artifact_file: String,
    pub license_type: Option<String>,
    pub constructor_bytecode: Option<String>,
    pub verify_source_code: bool,
    pub relayer_id: Option<String>,
    pub salt: Option<String>,
    pub create_factory_address: Option<String>,
}

/// Parses and validates the deploy argument list. `Ok(None)` means help was
/// requested; usage has been printed and no request should be made.
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
        contract_name: options.required("contractName")?,
        contract_path: options.required("contractPath")?,
        network: Network::from_chain_id_str(&options.required("chainId")?)?,
        artifact_file: options.required("artifactFile")?,
        license_type: options.optional("licenseType"),
        constructor_bytecode: options.optional("constructorBytecode"),
        verify_source_code: options.flag("verifySourceCode"),
        relayer_id: options.optional("relayerId"),
        salt: options.optional("salt"),
        create_factory_address: options.optional("createFactoryAddress"),
    })
}

pub async fn run(args: &[String]) -> Result<(), Error> {
    let Some(function_args) = function_args(args)? else {
        return Ok(());
    };
    let client = DefenderApi::new(Credentials::from_env()?);
    deploy_contract(function_args, &client).await
}

/// Builds the deployment request from validated options and submits it.
pub async fn deploy_contract(args: FunctionArgs, client: &impl DeployClient) -> Result<(), Error> {
    let artifact_payload = artifact::extract_compiler_io(&args.artifact_file)?;

    let request = DeployContractRequest {
        contract_name: args.contract_name,
        contract_path: args.contract_path,
        network: args.network,
        artifact_payload,
        constructor_bytecode: args.constructor_bytecode,
        license_type: args.license_type,
        verify_source_code: args.verify_source_code,
        relayer_id: args.relayer_id,
        salt: args.salt,
        create_factory_address: args.create_factory_address,
    };

    let response = client.deploy_contract(request).await?;
    println!("Deployed to address: {}", response.address);
    Ok(())
}
