// src/health/status.rs
use serde::Deserialize;
use std::fmt;

/// Cluster health as reported by the search engine.
///
/// Any status string is accepted; values outside the known three are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum HealthStatus {
    Green,
    Yellow,
    Red,
    Other(String),
}

impl HealthStatus {
    pub fn as_str(&self) -> &str {
        match self {
            HealthStatus::Green => "green",
            HealthStatus::Yellow => "yellow",
            HealthStatus::Red => "red",
            HealthStatus::Other(s) => s,
        }
    }
}

impl From<String> for HealthStatus {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "green" => HealthStatus::Green,
            "yellow" => HealthStatus::Yellow,
            "red" => HealthStatus::Red,
            _ => HealthStatus::Other(s),
        }
    }
}

impl From<&str> for HealthStatus {
    fn from(s: &str) -> Self {
        HealthStatus::from(s.to_string())
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
