mod samples;
mod search;
mod tools;

use rmcp::{ServiceExt, transport::stdio};
use tools::Kwic;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kwic=info".parse()?),
        )
        .init();

    info!("starting kwic MCP server");

    let service = Kwic::from_env()
        .serve(stdio())
        .await
        .inspect_err(|e| tracing::error!("failed to start server: {e}"))?;

    service.waiting().await?;
    info!("server stopped");
    Ok(())
}
