//! Errors surfaced by the workflow controller

use thiserror::Error;

use super::step::StepId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// The gate for the current step is closed. Presentation shows a disabled
    /// control; nothing changed.
    #[error("step {step} is not ready to continue")]
    Gated { step: StepId },

    /// The backend did not answer within the configured timeout.
    /// The action's in-progress flags are rolled back and the workflow does
    /// not advance.
    #[error("'{action}' timed out after {timeout_ms}ms")]
    ActionTimeout { action: String, timeout_ms: u64 },

    /// The backend rejected the action. Its in-progress flags are rolled back
    /// and the workflow does not advance.
    #[error("'{action}' failed: {reason}")]
    ActionFailure { action: String, reason: String },
}

impl WorkflowError {
    /// Whether this error came back from a backend call rather than a closed gate
    pub fn is_action_error(&self) -> bool {
        matches!(
            self,
            WorkflowError::ActionTimeout { .. } | WorkflowError::ActionFailure { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let gated = WorkflowError::Gated {
            step: StepId::at(2),
        };
        assert_eq!(gated.to_string(), "step 2 is not ready to continue");

        let timeout = WorkflowError::ActionTimeout {
            action: "PublishListing".to_string(),
            timeout_ms: 500,
        };
        assert_eq!(timeout.to_string(), "'PublishListing' timed out after 500ms");
        assert!(timeout.is_action_error());
        assert!(!gated.is_action_error());
    }
}
