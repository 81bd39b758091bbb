// src/lib.rs
pub mod config;
pub mod health;
pub mod readiness;
pub mod retry;

pub use health::{ElasticsearchProbe, HealthProbe, HealthStatus, ProbeError};
pub use readiness::{GateState, ReadinessGate};
pub use retry::RetryPolicy;
