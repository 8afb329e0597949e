use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    selector_picker::cli::app::run().await
}
