#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = advising_gateway::run().await {
        eprintln!("advising-gateway fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
