// src/config/models.rs
use anyhow::{bail, Result};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,

    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElasticsearchConfig {
    /// Node the health probe talks to, e.g. `http://elasticsearch:9200`.
    #[serde(default = "default_url")]
    pub url: Url,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetryConfig {
    /// Pause between failed probes. Zero retries immediately.
    #[serde(default)]
    pub delay_ms: u64,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.elasticsearch.validate()
    }
}

impl ElasticsearchConfig {
    pub fn validate(&self) -> Result<()> {
        match self.url.scheme() {
            "http" | "https" => {}
            other => bail!("Unsupported Elasticsearch URL scheme: {}", other),
        }

        if self.url.host_str().is_none() {
            bail!("Elasticsearch URL has no host: {}", self.url);
        }

        if self.timeout_secs == 0 {
            bail!("Elasticsearch timeout_secs must be greater than zero");
        }

        if self.password.is_some() && self.username.is_none() {
            bail!("Elasticsearch password given without a username");
        }

        Ok(())
    }

    /// Node URL without embedded credentials, for log lines.
    pub fn redacted_url(&self) -> String {
        let mut url = self.url.clone();
        if url.set_username("").is_err() || url.set_password(None).is_err() {
            return format!("{}://{}", url.scheme(), url.host_str().unwrap_or("unknown"));
        }
        url.to_string()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout(),
            username: None,
            password: None,
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn default_url() -> Url {
    Url::parse("http://localhost:9200").expect("static default URL is valid")
}

fn default_timeout() -> u64 {
    10
}
