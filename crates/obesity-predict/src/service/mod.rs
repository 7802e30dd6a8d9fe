//! Reference implementation of the prediction service's HTTP contract.
//!
//! Used for local demos and end-to-end tests of the client. The classifier
//! behind `/predict` is a deterministic BMI-band stand-in, not a trained model.

pub mod classifier;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::fields::options::is_offered;
use crate::fields::{Attribute, FieldSet};
use crate::risk::RiskLevel;
use crate::transport::models::{
    FailureEnvelope, HealthStatus, ModelInfo, PredictionSummary, ServiceBanner, SuccessEnvelope,
    STATUS_SUCCESS,
};

pub const SERVICE_VERSION: &str = "1.0";

/// Routes for `/`, `/health`, `/model-info` and `/predict`.
pub fn prediction_router() -> Router {
    Router::new()
        .route("/", get(banner_handler))
        .route("/health", get(health_handler))
        .route("/model-info", get(model_info_handler))
        .route("/predict", post(predict_handler))
}

/// Request rejected before classification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictRejection {
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    #[error("Invalid value for {0}")]
    InvalidValue(&'static str),
}

impl IntoResponse for PredictRejection {
    fn into_response(self) -> Response {
        let body = Json(FailureEnvelope::error(self.to_string()));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

pub(crate) async fn banner_handler() -> Json<ServiceBanner> {
    Json(ServiceBanner {
        message: "Obesity Prediction API".to_string(),
        status: "running".to_string(),
        model_accuracy: None,
        version: SERVICE_VERSION.to_string(),
    })
}

pub(crate) async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
    })
}

pub(crate) async fn model_info_handler() -> Json<ModelInfo> {
    Json(ModelInfo {
        features: Attribute::ALL
            .iter()
            .map(|attribute| attribute.wire_key().to_string())
            .collect(),
        classes: classifier::CLASSES.iter().map(|class| class.to_string()).collect(),
        accuracy: None,
        precision: None,
        recall: None,
        f1_score: None,
        cv_mean: None,
        cv_std: None,
        best_params: None,
    })
}

pub(crate) async fn predict_handler(
    Json(payload): Json<Map<String, Value>>,
) -> Result<Json<SuccessEnvelope>, PredictRejection> {
    let fields = read_fields(&payload)?;

    let height = read_measure(&fields, Attribute::Height)?;
    let weight = read_measure(&fields, Attribute::Weight)?;
    read_measure(&fields, Attribute::Age)?;

    let bmi = classifier::body_mass_index(height, weight);
    let classification = classifier::classify(bmi);
    let risk_level = RiskLevel::for_class(classification.class_label);

    info!(
        class = classification.class_label,
        bmi,
        confidence = classification.confidence,
        "prediction served"
    );

    Ok(Json(SuccessEnvelope {
        status: STATUS_SUCCESS.to_string(),
        prediction: PredictionSummary {
            class_label: classification.class_label.to_string(),
            confidence: classification.confidence,
            bmi,
        },
        risk_level,
        recommendation: classifier::recommendation_for(classification.class_label).to_string(),
        probabilities: classification.probabilities,
    }))
}

/// Pulls every attribute out of the request, checking presence and categorical tokens.
fn read_fields(payload: &Map<String, Value>) -> Result<FieldSet, PredictRejection> {
    let mut fields = FieldSet::new();
    for attribute in Attribute::ALL {
        let key = attribute.wire_key();
        let raw = match payload.get(key) {
            Some(Value::String(text)) => text.trim().to_string(),
            Some(Value::Number(number)) => number.to_string(),
            Some(_) => return Err(PredictRejection::InvalidValue(key)),
            None => {
                debug!(key, "prediction request missing field");
                return Err(PredictRejection::MissingField(key));
            }
        };

        if !is_offered(attribute, &raw) {
            return Err(PredictRejection::InvalidValue(key));
        }
        fields.update(attribute, raw);
    }
    Ok(fields)
}

fn read_measure(fields: &FieldSet, attribute: Attribute) -> Result<f64, PredictRejection> {
    fields
        .get(attribute)
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .ok_or(PredictRejection::InvalidValue(attribute.wire_key()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::json;
    use tower::ServiceExt;

    fn request_body() -> Value {
        json!({
            "Gender": "Female",
            "Age": "30",
            "Height": "1.65",
            "Weight": "60",
            "family_history_with_overweight": "yes",
            "FAVC": "no",
            "FCVC": "2",
            "NCP": "3",
            "CAEC": "Sometimes",
            "SMOKE": "no",
            "CH2O": "2",
            "SCC": "no",
            "FAF": "1",
            "TUE": "0",
            "CALC": "no",
            "MTRANS": "Walking"
        })
    }

    async fn post_predict(body: Value) -> (StatusCode, Value) {
        let request = Request::post("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds");
        let response = prediction_router()
            .oneshot(request)
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json payload"))
    }

    #[tokio::test]
    async fn predict_returns_success_envelope() {
        let (status, body) = post_predict(request_body()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["prediction"]["class"], "Normal_Weight");
        assert_eq!(body["prediction"]["bmi"], 22.04);
        assert_eq!(body["risk_level"], "normal");
        assert_eq!(
            body["probabilities"].as_object().map(|map| map.len()),
            Some(classifier::CLASSES.len())
        );
    }

    #[tokio::test]
    async fn predict_accepts_numeric_json_values() {
        let mut body = request_body();
        body["Weight"] = json!(95);
        body["Height"] = json!(1.7);
        let (status, body) = post_predict(body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"]["class"], "Obesity_Type_I");
        assert_eq!(body["risk_level"], "high");
    }

    #[tokio::test]
    async fn predict_reports_first_missing_field() {
        let mut body = request_body();
        let object = body.as_object_mut().expect("object");
        object.remove("CH2O");
        object.remove("MTRANS");
        let (status, body) = post_predict(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"status": "error", "error": "Missing field: CH2O"}));
    }

    #[tokio::test]
    async fn predict_rejects_unknown_categorical_token() {
        let mut body = request_body();
        body["CAEC"] = json!("Hourly");
        let (status, body) = post_predict(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid value for CAEC");
    }

    #[tokio::test]
    async fn predict_rejects_non_positive_height() {
        let mut body = request_body();
        body["Height"] = json!("0");
        let (status, body) = post_predict(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid value for Height");
    }

    #[tokio::test]
    async fn model_info_lists_wire_features_and_classes() {
        let Json(info) = model_info_handler().await;
        assert_eq!(info.features.len(), Attribute::COUNT);
        assert_eq!(info.features[4], "family_history_with_overweight");
        assert_eq!(info.classes.len(), 7);
        assert!(info.accuracy.is_none());
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let Json(health) = health_handler().await;
        assert_eq!(health.status, "healthy");
    }
}
