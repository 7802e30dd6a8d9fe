use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::risk::RiskLevel;

/// `status` value marking a successful prediction envelope.
pub const STATUS_SUCCESS: &str = "success";
/// `status` value the service uses for rejected requests.
pub const STATUS_ERROR: &str = "error";

/// Headline classification inside a successful `/predict` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSummary {
    #[serde(rename = "class")]
    pub class_label: String,
    pub confidence: f64,
    pub bmi: f64,
}

/// Body of a successful `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope {
    pub status: String,
    pub prediction: PredictionSummary,
    pub risk_level: RiskLevel,
    pub recommendation: String,
    pub probabilities: BTreeMap<String, f64>,
}

/// Body of a rejected `POST /predict`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEnvelope {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FailureEnvelope {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            error: Some(message.into()),
        }
    }
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Response of `GET /model-info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub features: Vec<String>,
    pub classes: Vec<String>,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub precision: Option<f64>,
    #[serde(default)]
    pub recall: Option<f64>,
    #[serde(default)]
    pub f1_score: Option<f64>,
    #[serde(default)]
    pub cv_mean: Option<f64>,
    #[serde(default)]
    pub cv_std: Option<f64>,
    #[serde(default)]
    pub best_params: Option<Value>,
}

/// Response of `GET /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceBanner {
    pub message: String,
    pub status: String,
    #[serde(default)]
    pub model_accuracy: Option<f64>,
    pub version: String,
}
