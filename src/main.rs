use catalog_refresh::{config::RefreshConfig, refresh_job::RefreshJob};
use tracing::{info, debug};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()
            .add_directive("catalog_refresh=debug".parse()?)
            .add_directive("aws_sdk=warn".parse()?)
            .add_directive("aws_config=warn".parse()?))
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Starting catalog refresh");
    debug!("Environment variables: TABLE_NAME={}, INVENTORY_DIR={}, AWS_ENDPOINT_URL={}",
        std::env::var("TABLE_NAME").unwrap_or_else(|_| "not set".to_string()),
        std::env::var("INVENTORY_DIR").unwrap_or_else(|_| "not set".to_string()),
        std::env::var("AWS_ENDPOINT_URL").unwrap_or_else(|_| "not set".to_string())
    );

    let config = RefreshConfig::from_env()?;
    let job = RefreshJob::new(config).await?;
    info!("Refresh job initialized successfully");

    let report = job.run().await?;
    debug!("Refresh report: {}", serde_json::to_string(&report)?);
    Ok(())
}
