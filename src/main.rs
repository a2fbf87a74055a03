#[tokio::main]
async fn main() -> anyhow::Result<()> {
    analytics_gateway::cli::run().await
}
