use crate::infra::{load_fields_json, parse_field_assignment};
use clap::Args;
use obesity_predict::config::{AppConfig, PredictionServiceConfig};
use obesity_predict::error::AppError;
use obesity_predict::fields::{options_for, Attribute};
use obesity_predict::orchestrator::{
    RequestOrchestrator, SubmissionState, SubmitOutcome, TracingObserver,
};
use obesity_predict::telemetry;
use obesity_predict::transport::{HttpPredictionClient, PredictionTransport};
use obesity_predict::view::ResultView;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct PredictArgs {
    /// Answer one attribute, e.g. `--field Height=1.72` or `--field CAEC=Sometimes`
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field_assignment)]
    pub(crate) fields: Vec<(Attribute, String)>,
    /// JSON object of answers keyed by attribute name; `--field` entries override it
    #[arg(long, value_name = "PATH")]
    pub(crate) from_json: Option<PathBuf>,
    /// Prediction service to call instead of PREDICT_BASE_URL
    #[arg(long)]
    pub(crate) base_url: Option<String>,
    /// Color the risk badge and probability bars
    #[arg(long)]
    pub(crate) color: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct HealthArgs {
    /// Prediction service to check instead of PREDICT_BASE_URL
    #[arg(long)]
    pub(crate) base_url: Option<String>,
}

fn client_from(config: &mut AppConfig, base_url: Option<String>) -> Result<HttpPredictionClient, AppError> {
    if let Some(base_url) = base_url {
        config.prediction = PredictionServiceConfig {
            base_url: PredictionServiceConfig::normalize_base_url(&base_url)?,
            ..config.prediction.clone()
        };
    }
    Ok(HttpPredictionClient::new(&config.prediction)?)
}

pub(crate) async fn run_predict(mut args: PredictArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let client = client_from(&mut config, args.base_url.take())?;
    let orchestrator =
        RequestOrchestrator::new(Arc::new(client)).with_observer(Arc::new(TracingObserver));

    let mut answers = match &args.from_json {
        Some(path) => load_fields_json(path)?,
        None => Vec::new(),
    };
    answers.append(&mut args.fields);

    let state = submit_answers(&orchestrator, answers).await;
    print!("{}", ResultView::new(&state).with_ansi(args.color));

    match state {
        SubmissionState::Failed(error) => Err(AppError::Prediction(error)),
        _ => Ok(()),
    }
}

/// Fills the form in order and submits it once.
pub(crate) async fn submit_answers<T>(
    orchestrator: &RequestOrchestrator<T>,
    answers: Vec<(Attribute, String)>,
) -> SubmissionState
where
    T: PredictionTransport + 'static,
{
    for (attribute, value) in answers {
        orchestrator.update_field(attribute, value);
    }

    info!(endpoint = %orchestrator.transport().endpoint(), "submitting profile");
    match orchestrator.submit().await {
        SubmitOutcome::Settled(state) => state,
        SubmitOutcome::AlreadyInFlight | SubmitOutcome::Discarded => orchestrator.state(),
    }
}

pub(crate) fn run_options() {
    print!("{}", options_listing());
}

pub(crate) fn options_listing() -> String {
    let mut out = String::new();
    for attribute in Attribute::ALL {
        let _ = writeln!(out, "{} [{}]", attribute.label(), attribute.wire_key());
        match options_for(attribute) {
            Some(options) => {
                for option in options {
                    let _ = writeln!(out, "  {:<22} {}", option.value, option.label);
                }
            }
            None => {
                let _ = writeln!(out, "  (number)");
            }
        }
    }
    out
}

pub(crate) async fn run_health(mut args: HealthArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let client = client_from(&mut config, args.base_url.take())?;
    let health = client.check_health().await?;
    println!("{}: {}", client.base_url(), health.status);

    let info = client.model_info().await?;
    println!("features: {}", info.features.join(", "));
    println!("classes:  {}", info.classes.join(", "));
    if let Some(accuracy) = info.accuracy {
        println!("accuracy: {:.1}%", accuracy * 100.0);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use obesity_predict::orchestrator::ErrorInfo;
    use obesity_predict::service::prediction_router;
    use tokio::net::TcpListener;

    async fn orchestrator_for_reference_service() -> RequestOrchestrator<HttpPredictionClient> {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, prediction_router())
                .await
                .expect("serve");
        });
        let config = PredictionServiceConfig::new(&format!("http://{addr}")).expect("url");
        RequestOrchestrator::new(Arc::new(HttpPredictionClient::new(&config).expect("client")))
    }

    fn full_profile() -> Vec<(Attribute, String)> {
        [
            "Gender=Female",
            "Age=35",
            "Height=1.60",
            "Weight=90",
            "family_history_with_overweight=yes",
            "FAVC=yes",
            "FCVC=2",
            "NCP=3",
            "CAEC=Sometimes",
            "SMOKE=no",
            "CH2O=2",
            "SCC=no",
            "FAF=0",
            "TUE=1",
            "CALC=Sometimes",
            "MTRANS=Automobile",
        ]
        .into_iter()
        .map(|raw| parse_field_assignment(raw).expect("known attribute"))
        .collect()
    }

    #[tokio::test]
    async fn submits_a_complete_profile() {
        let orchestrator = orchestrator_for_reference_service().await;
        let state = submit_answers(&orchestrator, full_profile()).await;

        let result = state.result().expect("succeeded");
        assert_eq!(result.bmi, 35.16);
        assert_eq!(result.class_label, "Obesity_Type_II");
        let rendered = ResultView::new(&state).to_string();
        assert!(rendered.contains("Prediction: Obesity Type II"));
    }

    #[tokio::test]
    async fn later_answers_override_earlier_ones() {
        let orchestrator = orchestrator_for_reference_service().await;
        let mut answers = full_profile();
        answers.push((Attribute::Weight, "60".to_string()));

        let state = submit_answers(&orchestrator, answers).await;
        assert_eq!(
            state.result().map(|result| result.class_label.as_str()),
            Some("Normal_Weight")
        );
    }

    #[tokio::test]
    async fn partial_profile_fails_validation() {
        let orchestrator = orchestrator_for_reference_service().await;
        let answers = full_profile().into_iter().take(3).collect();

        let state = submit_answers(&orchestrator, answers).await;
        match state.error() {
            Some(ErrorInfo::Validation { missing }) => {
                assert_eq!(missing.len(), Attribute::COUNT - 3);
                assert_eq!(missing[0], Attribute::Weight);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn options_listing_covers_every_attribute() {
        let listing = options_listing();
        for attribute in Attribute::ALL {
            assert!(listing.contains(attribute.wire_key()), "{attribute}");
        }
        assert!(listing.contains("Public_Transportation"));
        assert!(listing.contains("(number)"));
    }
}
