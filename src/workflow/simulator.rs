//! Simulated backend actions.
//!
//! Stands in for claim acceptance, scan verification and similar calls that
//! would normally go over the network:
//! - Each scheduled action runs on its own tokio task
//! - The task sleeps for the action's delay, then reports a [`Completion`]
//!   over a channel owned by the workflow
//! - Tasks are aborted through their [`JoinHandle`] when the workflow restarts
//!   or is dropped, so a late completion never touches disposed state

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::error::WorkflowError;

/// What the controller asks a backend to do
#[derive(Debug, Clone)]
pub struct ActionRequest {
    /// Human-readable action name, used in logs and errors
    pub label: String,
    /// How long the simulated call takes
    pub delay: Duration,
}

/// Result of one scheduled action, tagged with the ticket it was issued under
#[derive(Debug, Clone)]
pub struct Completion {
    pub ticket: u64,
    pub result: Result<(), WorkflowError>,
}

/// Seam where a real backend replaces the simulator
#[async_trait]
pub trait ActionBackend: Send + Sync {
    async fn perform(&self, request: ActionRequest) -> Result<(), WorkflowError>;
}

/// Always succeeds after the requested delay
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedBackend;

#[async_trait]
impl ActionBackend for SimulatedBackend {
    async fn perform(&self, request: ActionRequest) -> Result<(), WorkflowError> {
        tokio::time::sleep(request.delay).await;
        Ok(())
    }
}

/// Schedules backend calls and routes their completions back to the owner
pub struct ActionSimulator {
    backend: Arc<dyn ActionBackend>,
    timeout: Duration,
    completions: mpsc::UnboundedSender<Completion>,
}

impl ActionSimulator {
    pub fn new(
        backend: Arc<dyn ActionBackend>,
        timeout: Duration,
        completions: mpsc::UnboundedSender<Completion>,
    ) -> Self {
        Self {
            backend,
            timeout,
            completions,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Spawn the backend call. Must be called from within a tokio runtime.
    pub fn schedule(&self, ticket: u64, request: ActionRequest) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        let tx = self.completions.clone();
        let timeout = self.timeout;

        tokio::spawn(async move {
            let label = request.label.clone();
            let result = match tokio::time::timeout(timeout, backend.perform(request)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(action = %label, ticket, "Simulated action timed out");
                    Err(WorkflowError::ActionTimeout {
                        action: label,
                        timeout_ms: timeout.as_millis() as u64,
                    })
                }
            };

            if tx.send(Completion { ticket, result }).is_err() {
                debug!(ticket, "Workflow gone before action completed");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowBackend;

    #[async_trait]
    impl ActionBackend for SlowBackend {
        async fn perform(&self, _request: ActionRequest) -> Result<(), WorkflowError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }
    }

    fn request(ms: u64) -> ActionRequest {
        ActionRequest {
            label: "ScanFood".to_string(),
            delay: Duration::from_millis(ms),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_backend_completes_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let simulator = ActionSimulator::new(Arc::new(SimulatedBackend), Duration::from_secs(5), tx);

        let start = tokio::time::Instant::now();
        simulator.schedule(7, request(2500));
        let completion = rx.recv().await.unwrap();

        assert_eq!(completion.ticket, 7);
        assert!(completion.result.is_ok());
        assert!(start.elapsed() >= Duration::from_millis(2500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_reports_action_timeout() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let simulator = ActionSimulator::new(Arc::new(SlowBackend), Duration::from_millis(300), tx);

        simulator.schedule(1, request(0));
        let completion = rx.recv().await.unwrap();

        assert_eq!(
            completion.result,
            Err(WorkflowError::ActionTimeout {
                action: "ScanFood".to_string(),
                timeout_ms: 300,
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_aborted_task_sends_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let simulator = ActionSimulator::new(Arc::new(SimulatedBackend), Duration::from_secs(5), tx);

        let handle = simulator.schedule(3, request(600));
        handle.abort();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(rx.try_recv().is_err());
    }
}
