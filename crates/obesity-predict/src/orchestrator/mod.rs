//! Submission lifecycle: validation, dispatch, outcome classification, reset.
//!
//! `Idle -> Validating -> Submitting -> {Succeeded | Failed} -> Idle`
//!
//! At most one request is outstanding. `submit` while validating or submitting
//! is a no-op, and a response that arrives after `reset` is dropped.

pub mod observer;
pub(crate) mod response;
pub mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::fields::{Attribute, FieldError, FieldSet, FieldSnapshot};
use crate::transport::PredictionTransport;
use crate::validator;

pub use observer::{EventLog, OrchestratorEvent, SubmissionObserver, TracingObserver};
pub use state::{
    ErrorInfo, PredictionResult, SubmissionState, APPLICATION_ERROR_FALLBACK,
    NETWORK_ERROR_MESSAGE,
};

/// What a call to [`RequestOrchestrator::submit`] amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The submission reached a terminal state.
    Settled(SubmissionState),
    /// Another submission was already in flight; nothing happened.
    AlreadyInFlight,
    /// `reset` ran while the request was outstanding, so its response was ignored.
    Discarded,
}

struct Inner {
    fields: FieldSet,
    state: SubmissionState,
    // Bumped on every dispatch and reset so late responses can be recognised.
    epoch: u64,
}

/// Owns the [`FieldSet`] and [`SubmissionState`]; all mutation goes through here.
pub struct RequestOrchestrator<T> {
    transport: Arc<T>,
    inner: Mutex<Inner>,
    observers: Vec<Arc<dyn SubmissionObserver>>,
}

impl<T> RequestOrchestrator<T>
where
    T: PredictionTransport + 'static,
{
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            inner: Mutex::new(Inner {
                fields: FieldSet::new(),
                state: SubmissionState::Idle,
                epoch: 0,
            }),
            observers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn SubmissionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn state(&self) -> SubmissionState {
        self.lock().state.clone()
    }

    pub fn last_result(&self) -> Option<PredictionResult> {
        self.lock().state.result().cloned()
    }

    pub fn last_error(&self) -> Option<ErrorInfo> {
        self.lock().state.error().cloned()
    }

    pub fn fields(&self) -> FieldSnapshot {
        self.lock().fields.snapshot()
    }

    pub fn update_field(&self, attribute: Attribute, value: impl Into<String>) {
        let value = value.into();
        let mut inner = self.lock();
        inner.fields.update(attribute, value.clone());
        self.emit(&inner, [OrchestratorEvent::FieldChanged { attribute, value }]);
    }

    pub fn update_named(&self, name: &str, value: impl Into<String>) -> Result<Attribute, FieldError> {
        let attribute: Attribute = name.parse()?;
        self.update_field(attribute, value);
        Ok(attribute)
    }

    /// Back to `Idle` with empty fields, from any state.
    ///
    /// An outstanding request keeps running but its response will be discarded.
    pub fn reset(&self) {
        let mut inner = self.lock();
        if inner.state.is_in_flight() {
            debug!("reset while a request is outstanding; its response will be ignored");
        }
        inner.fields.reset();
        inner.state = SubmissionState::Idle;
        inner.epoch += 1;
        self.emit(
            &inner,
            [
                OrchestratorEvent::FieldsReset,
                OrchestratorEvent::StateChanged(SubmissionState::Idle),
            ],
        );
    }

    /// Validates a snapshot of the fields and, if complete, sends it to the service.
    pub async fn submit(&self) -> SubmitOutcome {
        let (snapshot, epoch) = match self.begin_submission() {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        let outcome = match self.transport.send(&snapshot).await {
            Ok(reply) => response::interpret(&reply).map_err(|error| {
                warn!(
                    status = reply.status,
                    kind = error.kind(),
                    endpoint = %self.transport.endpoint(),
                    "prediction service reply was not a success"
                );
                error
            }),
            Err(err) => {
                warn!(error = %err, endpoint = %self.transport.endpoint(), "prediction request failed");
                Err(ErrorInfo::Network)
            }
        };

        let next = match outcome {
            Ok(result) => SubmissionState::Succeeded(result),
            Err(error) => SubmissionState::Failed(error),
        };

        let mut inner = self.lock();
        if inner.epoch != epoch {
            debug!(state = next.label(), "discarding response that arrived after reset");
            return SubmitOutcome::Discarded;
        }
        inner.state = next.clone();
        self.emit(&inner, [OrchestratorEvent::StateChanged(next.clone())]);
        SubmitOutcome::Settled(next)
    }

    /// Synchronous half of `submit`; nothing here awaits.
    fn begin_submission(&self) -> Result<(FieldSnapshot, u64), SubmitOutcome> {
        let mut inner = self.lock();
        if inner.state.is_in_flight() {
            debug!(state = inner.state.label(), "submission already in flight; ignoring");
            return Err(SubmitOutcome::AlreadyInFlight);
        }

        let snapshot = inner.fields.snapshot();
        inner.state = SubmissionState::Validating;

        let missing = validator::missing_fields(&snapshot);
        if !missing.is_empty() {
            let failed = SubmissionState::Failed(ErrorInfo::Validation { missing });
            inner.state = failed.clone();
            self.emit(
                &inner,
                [
                    OrchestratorEvent::StateChanged(SubmissionState::Validating),
                    OrchestratorEvent::StateChanged(failed.clone()),
                ],
            );
            return Err(SubmitOutcome::Settled(failed));
        }

        inner.state = SubmissionState::Submitting;
        inner.epoch += 1;
        let epoch = inner.epoch;
        self.emit(
            &inner,
            [
                OrchestratorEvent::StateChanged(SubmissionState::Validating),
                OrchestratorEvent::StateChanged(SubmissionState::Submitting),
            ],
        );
        Ok((snapshot, epoch))
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Delivers events while the caller still holds the state lock, so observers
    /// see transitions in the order they were applied. Observers must not call
    /// back into the orchestrator from `notify`.
    fn emit<const N: usize>(&self, _held: &MutexGuard<'_, Inner>, events: [OrchestratorEvent; N]) {
        for event in &events {
            for observer in &self.observers {
                observer.notify(event);
            }
        }
    }
}
