use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use obesity_predict::fields::{Attribute, FieldSnapshot};
use obesity_predict::orchestrator::{
    ErrorInfo, EventLog, OrchestratorEvent, PredictionResult, RequestOrchestrator,
    SubmissionState, SubmitOutcome, NETWORK_ERROR_MESSAGE,
};
use obesity_predict::risk::{color_for, Color, RiskLevel};
use obesity_predict::transport::{PredictionTransport, TransportError, TransportReply};
use tokio::sync::Notify;

const SUCCESS_BODY: &str = r#"{"status":"success","prediction":{"class":"Normal_Weight","confidence":0.87,"bmi":25.7},"risk_level":"normal","recommendation":"Maintain current habits.","probabilities":{"Normal_Weight":0.87,"Obesity_Type_I":0.05}}"#;

/// Replies with a fixed outcome and records every snapshot it was handed.
struct ScriptedTransport {
    reply: Result<TransportReply, TransportError>,
    calls: Mutex<Vec<FieldSnapshot>>,
}

impl ScriptedTransport {
    fn replying(status: u16, body: &str) -> Self {
        Self {
            reply: Ok(TransportReply::new(status, body)),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(error: TransportError) -> Self {
        Self {
            reply: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<FieldSnapshot> {
        self.calls.lock().expect("calls mutex").clone()
    }
}

#[async_trait]
impl PredictionTransport for ScriptedTransport {
    fn endpoint(&self) -> String {
        "stub://predict".to_string()
    }

    async fn send(&self, fields: &FieldSnapshot) -> Result<TransportReply, TransportError> {
        self.calls.lock().expect("calls mutex").push(fields.clone());
        self.reply.clone()
    }
}

/// Holds every request open until the test releases it.
struct GatedTransport {
    body: String,
    calls: AtomicUsize,
    entered: Notify,
    release: Notify,
}

impl GatedTransport {
    fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            calls: AtomicUsize::new(0),
            entered: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl PredictionTransport for GatedTransport {
    fn endpoint(&self) -> String {
        "stub://gated".to_string()
    }

    async fn send(&self, _fields: &FieldSnapshot) -> Result<TransportReply, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(TransportReply::new(200, self.body.clone()))
    }
}

/// One gate per request, so each call can be released independently.
struct Gate {
    body: &'static str,
    entered: Notify,
    release: Notify,
}

struct RelayTransport {
    gates: Vec<Gate>,
    calls: AtomicUsize,
}

impl RelayTransport {
    fn new(bodies: &[&'static str]) -> Self {
        Self {
            gates: bodies
                .iter()
                .map(|&body| Gate {
                    body,
                    entered: Notify::new(),
                    release: Notify::new(),
                })
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PredictionTransport for RelayTransport {
    fn endpoint(&self) -> String {
        "stub://relay".to_string()
    }

    async fn send(&self, _fields: &FieldSnapshot) -> Result<TransportReply, TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.get(call).ok_or_else(|| TransportError::Unreachable {
            url: self.endpoint(),
            message: format!("no gate for call {call}"),
        })?;
        gate.entered.notify_one();
        gate.release.notified().await;
        Ok(TransportReply::new(200, gate.body))
    }
}

const OVERWEIGHT_BODY: &str = r#"{"status":"success","prediction":{"class":"Overweight_Level_II","confidence":0.71,"bmi":28.9},"risk_level":"moderate","recommendation":"Aim for gradual weight loss.","probabilities":{"Overweight_Level_II":0.71}}"#;

fn last_observed_state(log: &EventLog) -> Option<SubmissionState> {
    log.events().into_iter().rev().find_map(|event| match event {
        OrchestratorEvent::StateChanged(state) => Some(state),
        _ => None,
    })
}

fn sample_answers() -> [(Attribute, &'static str); 16] {
    [
        (Attribute::Gender, "Female"),
        (Attribute::Age, "30"),
        (Attribute::Height, "1.65"),
        (Attribute::Weight, "70"),
        (Attribute::FamilyHistoryOverweight, "yes"),
        (Attribute::HighCaloricFoodFrequent, "no"),
        (Attribute::VegetableFrequency, "2"),
        (Attribute::MainMealsCount, "3"),
        (Attribute::SnackingFrequency, "Sometimes"),
        (Attribute::Smokes, "no"),
        (Attribute::WaterIntakeLevel, "2"),
        (Attribute::CaloriesMonitored, "no"),
        (Attribute::PhysicalActivityLevel, "1"),
        (Attribute::TechnologyUseLevel, "0"),
        (Attribute::AlcoholConsumption, "no"),
        (Attribute::TransportMode, "Walking"),
    ]
}

fn fill<T: PredictionTransport + 'static>(orchestrator: &RequestOrchestrator<T>) {
    for (attribute, value) in sample_answers() {
        orchestrator.update_field(attribute, value);
    }
}

fn expected_result() -> PredictionResult {
    PredictionResult {
        class_label: "Normal_Weight".to_string(),
        confidence: 0.87,
        bmi: 25.7,
        risk_level: RiskLevel::Normal,
        recommendation: "Maintain current habits.".to_string(),
        probabilities: BTreeMap::from([
            ("Normal_Weight".to_string(), 0.87),
            ("Obesity_Type_I".to_string(), 0.05),
        ]),
    }
}

#[tokio::test]
async fn complete_submission_succeeds_with_parsed_result() {
    let transport = Arc::new(ScriptedTransport::replying(200, SUCCESS_BODY));
    let log = EventLog::default();
    let orchestrator =
        RequestOrchestrator::new(transport.clone()).with_observer(Arc::new(log.clone()));
    fill(&orchestrator);

    let outcome = orchestrator.submit().await;

    let expected = SubmissionState::Succeeded(expected_result());
    assert_eq!(outcome, SubmitOutcome::Settled(expected.clone()));
    assert_eq!(orchestrator.state(), expected);
    assert_eq!(orchestrator.last_result(), Some(expected_result()));
    assert!(orchestrator.last_error().is_none());
    assert_eq!(color_for("normal"), Color::Green500);

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].get(Attribute::TransportMode), "Walking");
    assert_eq!(
        log.state_labels(),
        vec!["validating", "submitting", "succeeded"]
    );
}

#[tokio::test]
async fn incomplete_fields_fail_validation_without_network_call() {
    let transport = Arc::new(ScriptedTransport::replying(200, SUCCESS_BODY));
    let orchestrator = RequestOrchestrator::new(transport.clone());
    fill(&orchestrator);
    orchestrator.update_field(Attribute::Weight, "   ");
    orchestrator.update_field(Attribute::Smokes, "");

    let outcome = orchestrator.submit().await;

    let expected = SubmissionState::Failed(ErrorInfo::Validation {
        missing: vec![Attribute::Weight, Attribute::Smokes],
    });
    assert_eq!(outcome, SubmitOutcome::Settled(expected.clone()));
    assert_eq!(orchestrator.state(), expected);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn service_failure_surfaces_its_message() {
    let transport = Arc::new(ScriptedTransport::replying(
        500,
        r#"{"status":"error","error":"model unavailable"}"#,
    ));
    let orchestrator = RequestOrchestrator::new(transport);
    fill(&orchestrator);

    orchestrator.submit().await;

    assert_eq!(
        orchestrator.state(),
        SubmissionState::Failed(ErrorInfo::Application("model unavailable".to_string()))
    );
}

#[tokio::test]
async fn connection_failure_yields_fixed_network_message() {
    let transport = Arc::new(ScriptedTransport::failing(TransportError::Unreachable {
        url: "http://127.0.0.1:9/predict".to_string(),
        message: "connection refused".to_string(),
    }));
    let orchestrator = RequestOrchestrator::new(transport);
    fill(&orchestrator);

    orchestrator.submit().await;

    let error = orchestrator.last_error().expect("failed");
    assert_eq!(error, ErrorInfo::Network);
    assert_eq!(error.prompt(), NETWORK_ERROR_MESSAGE);
}

#[tokio::test]
async fn timeout_and_unparseable_body_are_network_failures() {
    let timeout = Arc::new(ScriptedTransport::failing(TransportError::Timeout {
        url: "http://slow/predict".to_string(),
    }));
    let orchestrator = RequestOrchestrator::new(timeout);
    fill(&orchestrator);
    orchestrator.submit().await;
    assert_eq!(orchestrator.last_error(), Some(ErrorInfo::Network));

    let garbage = Arc::new(ScriptedTransport::replying(200, "Internal Server Error"));
    let orchestrator = RequestOrchestrator::new(garbage);
    fill(&orchestrator);
    orchestrator.submit().await;
    assert_eq!(orchestrator.last_error(), Some(ErrorInfo::Network));
}

#[tokio::test]
async fn submit_while_in_flight_is_ignored() {
    let transport = Arc::new(GatedTransport::new(SUCCESS_BODY));
    let orchestrator = Arc::new(RequestOrchestrator::new(transport.clone()));
    fill(&orchestrator);

    let first = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.submit().await })
    };
    transport.entered.notified().await;

    assert_eq!(orchestrator.state(), SubmissionState::Submitting);
    for _ in 0..3 {
        assert_eq!(orchestrator.submit().await, SubmitOutcome::AlreadyInFlight);
    }

    transport.release.notify_one();
    let outcome = first.await.expect("submission task");

    assert_eq!(
        outcome,
        SubmitOutcome::Settled(SubmissionState::Succeeded(expected_result()))
    );
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn edits_during_flight_do_not_leak_into_the_request() {
    let transport = Arc::new(GatedTransport::new(SUCCESS_BODY));
    let orchestrator = Arc::new(RequestOrchestrator::new(transport.clone()));
    fill(&orchestrator);

    let first = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.submit().await })
    };
    transport.entered.notified().await;

    orchestrator.update_field(Attribute::Weight, "71");
    transport.release.notify_one();
    first.await.expect("submission task");

    assert_eq!(orchestrator.fields().get(Attribute::Weight), "71");
    assert!(orchestrator.last_result().is_some());
}

#[tokio::test]
async fn reset_during_flight_discards_late_response() {
    let transport = Arc::new(GatedTransport::new(SUCCESS_BODY));
    let log = EventLog::default();
    let orchestrator = Arc::new(
        RequestOrchestrator::new(transport.clone()).with_observer(Arc::new(log.clone())),
    );
    fill(&orchestrator);

    let first = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.submit().await })
    };
    transport.entered.notified().await;

    orchestrator.reset();
    assert_eq!(orchestrator.state(), SubmissionState::Idle);

    transport.release.notify_one();
    let outcome = first.await.expect("submission task");

    assert_eq!(outcome, SubmitOutcome::Discarded);
    assert_eq!(orchestrator.state(), SubmissionState::Idle);
    assert!(orchestrator.fields().is_empty());
    assert!(orchestrator.last_result().is_none());
    assert_eq!(log.state_labels(), vec!["validating", "submitting", "idle"]);
}

#[tokio::test]
async fn reset_returns_to_idle_from_every_terminal_state() {
    let success = Arc::new(ScriptedTransport::replying(200, SUCCESS_BODY));
    let orchestrator = RequestOrchestrator::new(success);
    fill(&orchestrator);
    orchestrator.submit().await;
    assert!(matches!(orchestrator.state(), SubmissionState::Succeeded(_)));
    orchestrator.reset();
    assert_eq!(orchestrator.state(), SubmissionState::Idle);
    assert!(orchestrator.fields().is_empty());
    assert!(orchestrator.last_result().is_none());

    let failure = Arc::new(ScriptedTransport::replying(400, r#"{"status":"error"}"#));
    let orchestrator = RequestOrchestrator::new(failure);
    fill(&orchestrator);
    orchestrator.submit().await;
    assert!(matches!(orchestrator.state(), SubmissionState::Failed(_)));
    orchestrator.reset();
    assert_eq!(orchestrator.state(), SubmissionState::Idle);
    assert!(orchestrator.fields().is_empty());
    assert!(orchestrator.last_error().is_none());

    let idle = RequestOrchestrator::new(Arc::new(ScriptedTransport::replying(200, "{}")));
    idle.reset();
    assert_eq!(idle.state(), SubmissionState::Idle);
}

#[tokio::test]
async fn failed_submission_can_be_retried_after_correction() {
    let transport = Arc::new(ScriptedTransport::replying(200, SUCCESS_BODY));
    let orchestrator = RequestOrchestrator::new(transport.clone());
    fill(&orchestrator);
    orchestrator.update_field(Attribute::Age, "");

    orchestrator.submit().await;
    assert!(matches!(
        orchestrator.last_error(),
        Some(ErrorInfo::Validation { .. })
    ));

    orchestrator.update_field(Attribute::Age, "30");
    orchestrator.submit().await;
    assert_eq!(orchestrator.last_result(), Some(expected_result()));
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn observers_see_field_edits_and_resets() {
    let log = EventLog::default();
    let orchestrator =
        RequestOrchestrator::new(Arc::new(ScriptedTransport::replying(200, SUCCESS_BODY)))
            .with_observer(Arc::new(log.clone()));

    orchestrator
        .update_named("MTRANS", "Bike")
        .expect("known attribute");
    assert!(orchestrator.update_named("shoeSize", "42").is_err());
    orchestrator.reset();

    assert_eq!(
        log.events(),
        vec![
            OrchestratorEvent::FieldChanged {
                attribute: Attribute::TransportMode,
                value: "Bike".to_string(),
            },
            OrchestratorEvent::FieldsReset,
            OrchestratorEvent::StateChanged(SubmissionState::Idle),
        ]
    );
}

#[tokio::test]
async fn stale_response_cannot_overwrite_a_newer_submission() {
    let transport = Arc::new(RelayTransport::new(&[SUCCESS_BODY, OVERWEIGHT_BODY]));
    let log = EventLog::default();
    let orchestrator = Arc::new(
        RequestOrchestrator::new(transport.clone()).with_observer(Arc::new(log.clone())),
    );
    fill(&orchestrator);

    let stale = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.submit().await })
    };
    transport.gates[0].entered.notified().await;

    orchestrator.reset();
    fill(&orchestrator);
    orchestrator.update_field(Attribute::Weight, "79");

    let fresh = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.submit().await })
    };
    transport.gates[1].entered.notified().await;
    transport.gates[1].release.notify_one();
    let fresh_outcome = fresh.await.expect("fresh submission task");

    let current = orchestrator.state();
    assert_eq!(fresh_outcome, SubmitOutcome::Settled(current.clone()));
    assert_eq!(
        orchestrator.last_result().map(|result| result.class_label),
        Some("Overweight_Level_II".to_string())
    );

    transport.gates[0].release.notify_one();
    assert_eq!(stale.await.expect("stale submission task"), SubmitOutcome::Discarded);

    assert_eq!(orchestrator.state(), current);
    assert_eq!(last_observed_state(&log), Some(current));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn observers_finish_on_the_current_state_when_reset_races_submit() {
    for round in 0..2_000 {
        let log = EventLog::default();
        let orchestrator = Arc::new(
            RequestOrchestrator::new(Arc::new(ScriptedTransport::replying(200, SUCCESS_BODY)))
                .with_observer(Arc::new(log.clone())),
        );
        fill(&orchestrator);

        let submitter = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.submit().await })
        };
        let resetter = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.reset() })
        };
        submitter.await.expect("submit task");
        resetter.await.expect("reset task");

        assert_eq!(
            last_observed_state(&log),
            Some(orchestrator.state()),
            "round {round}"
        );
    }
}
