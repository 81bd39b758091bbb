// src/main.rs
use anyhow::{Context, Result};
use tracing::info;

use search_readiness::{config, ElasticsearchProbe, ReadinessGate, RetryPolicy};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("search_readiness=debug".parse()?)
                .add_directive("reqwest=info".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    info!("Loading configuration from: {}", config_path);
    let config = config::load_config(&config_path)?;
    info!("Elasticsearch node: {}", config.elasticsearch.redacted_url());

    let probe = ElasticsearchProbe::new(&config.elasticsearch)
        .context("Failed to create Elasticsearch client")?;

    let mut gate = ReadinessGate::new(probe).with_policy(RetryPolicy::new(&config.retry));
    gate.await_ready().await;

    info!("Elasticsearch is ready");
    Ok(())
}
