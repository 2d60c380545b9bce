#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sessionrpc_app::run().await
}
