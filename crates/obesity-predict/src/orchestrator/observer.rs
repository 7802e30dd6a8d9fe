use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use super::state::SubmissionState;
use crate::fields::Attribute;

/// Notification emitted after every field edit and state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorEvent {
    FieldChanged { attribute: Attribute, value: String },
    FieldsReset,
    StateChanged(SubmissionState),
}

/// Hook for presentation layers that re-render on change.
///
/// `notify` runs while the orchestrator holds its state lock. Keep it short and
/// never call back into the orchestrator from it.
pub trait SubmissionObserver: Send + Sync {
    fn notify(&self, event: &OrchestratorEvent);
}

/// Keeps every event in memory, in delivery order.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Arc<Mutex<Vec<OrchestratorEvent>>>,
}

impl EventLog {
    pub fn events(&self) -> Vec<OrchestratorEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Labels of the states entered so far.
    pub fn state_labels(&self) -> Vec<&'static str> {
        self.events()
            .iter()
            .filter_map(|event| match event {
                OrchestratorEvent::StateChanged(state) => Some(state.label()),
                _ => None,
            })
            .collect()
    }
}

impl SubmissionObserver for EventLog {
    fn notify(&self, event: &OrchestratorEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

/// Mirrors transitions into the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SubmissionObserver for TracingObserver {
    fn notify(&self, event: &OrchestratorEvent) {
        match event {
            OrchestratorEvent::FieldChanged { attribute, .. } => {
                debug!(%attribute, "field updated");
            }
            OrchestratorEvent::FieldsReset => debug!("fields cleared"),
            OrchestratorEvent::StateChanged(SubmissionState::Succeeded(result)) => {
                info!(
                    class = %result.class_label,
                    risk = %result.risk_level,
                    confidence = result.confidence,
                    "prediction succeeded"
                );
            }
            OrchestratorEvent::StateChanged(SubmissionState::Failed(error)) => {
                warn!(kind = error.kind(), %error, "prediction failed");
            }
            OrchestratorEvent::StateChanged(state) => {
                debug!(state = state.label(), "submission state changed");
            }
        }
    }
}
