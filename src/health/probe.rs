// src/health/probe.rs
use super::HealthStatus;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Every way a health query can fail. Callers treat all variants alike.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed health response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid health endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

/// A single health query against an external dependency.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check_health(&self) -> Result<HealthStatus, ProbeError>;
}

#[async_trait]
impl<P: HealthProbe + ?Sized> HealthProbe for Arc<P> {
    async fn check_health(&self) -> Result<HealthStatus, ProbeError> {
        (**self).check_health().await
    }
}

