use anyhow::Result;
use wordcount_language_server::lsp::server::serve;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    serve().await
}
