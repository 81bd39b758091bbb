// src/health/elasticsearch.rs
use super::{HealthProbe, HealthStatus, ProbeError};
use crate::config::ElasticsearchConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::time::{timeout, Duration};
use tracing::debug;
use url::Url;

const HEALTH_PATH: &str = "_cluster/health";

/// Body of `GET /_cluster/health`. Only `status` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterHealth {
    pub status: HealthStatus,
    #[serde(default)]
    pub cluster_name: Option<String>,
    #[serde(default)]
    pub number_of_nodes: Option<u32>,
    #[serde(default)]
    pub number_of_data_nodes: Option<u32>,
    #[serde(default)]
    pub active_shards: Option<u32>,
    #[serde(default)]
    pub unassigned_shards: Option<u32>,
}

/// Queries cluster health on a single Elasticsearch node.
pub struct ElasticsearchProbe {
    client: Client,
    endpoint: Url,
    credentials: Option<(String, Option<String>)>,
    timeout: Duration,
}

impl ElasticsearchProbe {
    pub fn new(config: &ElasticsearchConfig) -> Result<Self, ProbeError> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        let mut base = config.url.clone();

        // Credentials embedded in the URL are sent as basic auth unless configured explicitly.
        let url_credentials = if base.username().is_empty() {
            None
        } else {
            let user = base.username().to_string();
            let pass = base.password().map(str::to_string);
            if base.set_username("").is_err() || base.set_password(None).is_err() {
                return Err(ProbeError::Other(format!(
                    "Cannot strip credentials from {}",
                    base
                )));
            }
            Some((user, pass))
        };

        let credentials = match &config.username {
            Some(user) => Some((user.clone(), config.password.clone())),
            None => url_credentials,
        };

        Ok(Self {
            client,
            endpoint: health_endpoint(&base)?,
            credentials,
            timeout: config.timeout(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch(&self) -> Result<ClusterHealth, ProbeError> {
        let mut request = self.client.get(self.endpoint.clone());
        if let Some((user, pass)) = &self.credentials {
            request = request.basic_auth(user, pass.as_ref());
        }

        let response = timeout(self.timeout, request.send())
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))??;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProbeError::Status { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl HealthProbe for ElasticsearchProbe {
    async fn check_health(&self) -> Result<HealthStatus, ProbeError> {
        let health = self.fetch().await?;

        debug!(
            cluster = health.cluster_name.as_deref().unwrap_or("unknown"),
            nodes = ?health.number_of_nodes,
            data_nodes = ?health.number_of_data_nodes,
            active_shards = ?health.active_shards,
            unassigned_shards = ?health.unassigned_shards,
            "Cluster health from {}",
            self.endpoint
        );

        Ok(health.status)
    }
}

/// Keeps any path on the node URL as a prefix, e.g. a reverse-proxied `/search/`.
fn health_endpoint(base: &Url) -> Result<Url, ProbeError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(HEALTH_PATH)?)
}
