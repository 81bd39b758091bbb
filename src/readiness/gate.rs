// src/readiness/gate.rs

use crate::health::HealthProbe;
use crate::retry::RetryPolicy;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Probing, // No successful probe yet
    Ready,   // Terminal
}

/// Startup gate that holds the caller until a dependency answers a health query.
///
/// Any answer counts, whatever status it carries. Failed probes are logged and
/// retried forever; nothing is ever returned to the caller except readiness.
/// Wrap [`ReadinessGate::await_ready`] in `tokio::time::timeout` if startup
/// must be bounded.
pub struct ReadinessGate<P> {
    probe: P,
    policy: RetryPolicy,
    label: String,
    state: GateState,
}

impl<P: HealthProbe> ReadinessGate<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            policy: RetryPolicy::immediate(),
            label: "Elasticsearch".to_string(),
            state: GateState::Probing,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Name of the dependency used in log lines.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == GateState::Ready
    }

    pub async fn await_ready(&mut self) {
        if self.is_ready() {
            return;
        }

        let mut attempt: u64 = 0;

        loop {
            attempt += 1;

            match self.probe.check_health().await {
                Ok(status) => {
                    info!(attempt, "{} health status - {}", self.label, status);
                    self.state = GateState::Ready;
                    return;
                }
                Err(e) => {
                    error!(attempt, "Connection to {} failed, retrying", self.label);
                    error!(error = %e, "await_ready probe error");
                    self.policy.pause(attempt).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{HealthStatus, ProbeError};
    use async_trait::async_trait;
    use std::fmt::{self, Write};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::{Layer, Registry};

    /// Fails `failures` times, then reports `status`.
    struct ScriptedProbe {
        failures: usize,
        status: HealthStatus,
        calls: AtomicUsize,
    }

    impl ScriptedProbe {
        fn new(failures: usize, status: HealthStatus) -> Self {
            Self {
                failures,
                status,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HealthProbe for ScriptedProbe {
        async fn check_health(&self) -> Result<HealthStatus, ProbeError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(ProbeError::Other("connection refused".to_string()))
            } else {
                Ok(self.status.clone())
            }
        }
    }

    /// Fails until `healthy` is flipped; yields so other tasks can observe it.
    #[derive(Default)]
    struct SwitchProbe {
        healthy: AtomicBool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HealthProbe for SwitchProbe {
        async fn check_health(&self) -> Result<HealthStatus, ProbeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.healthy.load(Ordering::SeqCst) {
                Ok(HealthStatus::Green)
            } else {
                Err(ProbeError::Other("connection refused".to_string()))
            }
        }
    }

    /// Fails straight away without ever awaiting.
    struct AlwaysDown;

    #[async_trait]
    impl HealthProbe for AlwaysDown {
        async fn check_health(&self) -> Result<HealthStatus, ProbeError> {
            Err(ProbeError::Other("connection refused".to_string()))
        }
    }

    type Records = Arc<Mutex<Vec<(Level, String)>>>;

    struct CaptureLayer(Records);

    #[derive(Default)]
    struct Line(String);

    impl Visit for Line {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if !self.0.is_empty() {
                self.0.push(' ');
            }
            if field.name() == "message" {
                let _ = write!(self.0, "{:?}", value);
            } else {
                let _ = write!(self.0, "{}={:?}", field.name(), value);
            }
        }
    }

    impl<S: Subscriber> Layer<S> for CaptureLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if !event.metadata().target().starts_with("search_readiness::readiness") {
                return;
            }
            let mut line = Line::default();
            event.record(&mut line);
            self.0
                .lock()
                .unwrap()
                .push((*event.metadata().level(), line.0));
        }
    }

    fn capture() -> (Records, tracing::subscriber::DefaultGuard) {
        let records = Records::default();
        let subscriber = Registry::default().with(CaptureLayer(records.clone()));
        let guard = tracing::subscriber::set_default(subscriber);
        (records, guard)
    }

    #[tokio::test]
    async fn test_two_failures_then_green() {
        let (records, _guard) = capture();
        let probe = Arc::new(ScriptedProbe::new(2, HealthStatus::Green));
        let mut gate = ReadinessGate::new(probe.clone());

        gate.await_ready().await;

        assert_eq!(probe.calls(), 3);
        assert!(gate.is_ready());

        let records = records.lock().unwrap();
        assert_eq!(records.len(), 5);
        for pair in records[..4].chunks(2) {
            assert_eq!(pair[0].0, Level::ERROR);
            assert!(pair[0].1.contains("Connection to Elasticsearch failed, retrying"));
            assert_eq!(pair[1].0, Level::ERROR);
            assert!(pair[1].1.contains("await_ready probe error"));
            assert!(pair[1].1.contains("connection refused"));
        }
        assert_eq!(records[4].0, Level::INFO);
        assert!(records[4].1.contains("health status - green"));
    }

    #[tokio::test]
    async fn test_immediate_yellow() {
        let (records, _guard) = capture();
        let probe = Arc::new(ScriptedProbe::new(0, HealthStatus::Yellow));
        let mut gate = ReadinessGate::new(probe.clone());

        gate.await_ready().await;

        assert_eq!(probe.calls(), 1);
        let records = records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, Level::INFO);
        assert!(records[0].1.contains("yellow"));
    }

    #[tokio::test]
    async fn test_red_status_still_unblocks() {
        let probe = Arc::new(ScriptedProbe::new(0, HealthStatus::Red));
        let mut gate = ReadinessGate::new(probe.clone());

        gate.await_ready().await;

        assert_eq!(probe.calls(), 1);
        assert_eq!(gate.state(), GateState::Ready);
    }

    #[tokio::test]
    async fn test_ready_gate_does_not_probe_again() {
        let probe = Arc::new(ScriptedProbe::new(0, HealthStatus::Green));
        let mut gate = ReadinessGate::new(probe.clone());

        gate.await_ready().await;
        gate.await_ready().await;

        assert_eq!(probe.calls(), 1);
    }

    #[tokio::test]
    async fn test_blocks_while_probe_fails() {
        let probe = Arc::new(SwitchProbe::default());
        let mut gate = ReadinessGate::new(probe.clone());
        assert_eq!(gate.state(), GateState::Probing);

        let handle = tokio::spawn(async move {
            gate.await_ready().await;
            gate
        });

        while probe.calls.load(Ordering::SeqCst) < 100 {
            tokio::task::yield_now().await;
        }
        assert!(!handle.is_finished());

        probe.healthy.store(true, Ordering::SeqCst);
        let gate = handle.await.unwrap();

        assert!(gate.is_ready());
        assert!(probe.calls.load(Ordering::SeqCst) > 100);
    }

    #[tokio::test]
    async fn test_custom_label_in_logs() {
        let (records, _guard) = capture();
        let probe = Arc::new(ScriptedProbe::new(1, HealthStatus::Green));
        let mut gate = ReadinessGate::new(probe).with_label("search cluster");

        gate.await_ready().await;

        let records = records.lock().unwrap();
        assert!(records[0].1.contains("Connection to search cluster failed"));
        assert!(records[2].1.contains("search cluster health status - green"));
    }

    #[tokio::test]
    async fn test_caller_timeout_bounds_failing_gate() {
        let mut gate = ReadinessGate::new(AlwaysDown);

        let result = tokio::time::timeout(Duration::from_millis(50), gate.await_ready()).await;

        assert!(result.is_err());
        assert_eq!(gate.state(), GateState::Probing);
    }
}
