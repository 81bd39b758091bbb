// src/retry/strategy.rs

use crate::config::RetryConfig;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Pause taken between failed attempts.
///
/// A zero delay never sleeps: it only yields to the runtime, so the next
/// attempt starts as soon as the previous one fails while timers and other
/// tasks on the same thread still make progress.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(config: &RetryConfig) -> Self {
        Self::fixed(config.delay())
    }

    /// Retry straight away after a failure.
    pub fn immediate() -> Self {
        Self::default()
    }

    pub fn fixed(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn pause(&self, attempt: u64) {
        if self.delay.is_zero() {
            tokio::task::yield_now().await;
            return;
        }

        debug!("Attempt {} failed. Retrying in {:?}", attempt, self.delay);
        sleep(self.delay).await;
    }
}
