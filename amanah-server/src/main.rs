#[tokio::main]
async fn main() -> anyhow::Result<()> {
    amanah_server::cli::run().await
}
