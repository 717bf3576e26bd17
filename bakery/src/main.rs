use bakery::api::ApiServer;
use bakery::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env_or_default();
    bakery::logging::init(&config.log_filter, config.log_format)?;

    if config.origin_tokens.is_empty() {
        tracing::warn!("BAKERY_ORIGIN_TOKEN is not set, origin token check is disabled");
    }
    if config.origin_host.is_none() {
        tracing::warn!("BAKERY_ORIGIN_HOST is not set, every manifest request will fail");
    }

    let server = ApiServer::new(config)?;

    let cancel_token = server.cancel_token();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        cancel_token.cancel();
    });

    server.run().await?;

    tracing::info!("bakery stopped");
    Ok(())
}
