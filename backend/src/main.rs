#[tokio::main]
async fn main() -> anyhow::Result<()> {
  songbook::run().await
}
