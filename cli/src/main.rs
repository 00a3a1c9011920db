use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    defender_deploy_cli::run(&args).await?;
    Ok(())
}
