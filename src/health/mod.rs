// src/health/mod.rs
mod elasticsearch;
mod probe;
mod status;

pub use elasticsearch::{ClusterHealth, ElasticsearchProbe};
pub use probe::{HealthProbe, ProbeError};
pub use status::HealthStatus;
