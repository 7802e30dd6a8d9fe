use std::collections::BTreeMap;

use serde::Serialize;

use crate::fields::Attribute;
use crate::risk::{Color, RiskLevel};
use crate::transport::SuccessEnvelope;

/// User-facing prompt shown when the service cannot be reached.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to connect to the prediction service. Make sure it is running and reachable, then try again.";

/// Shown when the service rejects a request without explaining why.
pub const APPLICATION_ERROR_FALLBACK: &str = "The prediction service could not process the request.";

/// Parsed outcome of a successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub class_label: String,
    pub confidence: f64,
    pub bmi: f64,
    pub risk_level: RiskLevel,
    pub recommendation: String,
    pub probabilities: BTreeMap<String, f64>,
}

impl PredictionResult {
    pub fn color(&self) -> Color {
        self.risk_level.color()
    }

    /// Class probabilities from most to least likely; ties keep label order.
    pub fn ranked_probabilities(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .probabilities
            .iter()
            .map(|(label, probability)| (label.as_str(), *probability))
            .collect();
        ranked.sort_by(|left, right| right.1.total_cmp(&left.1));
        ranked
    }
}

impl From<SuccessEnvelope> for PredictionResult {
    fn from(envelope: SuccessEnvelope) -> Self {
        Self {
            class_label: envelope.prediction.class_label,
            confidence: envelope.prediction.confidence,
            bmi: envelope.prediction.bmi,
            risk_level: envelope.risk_level,
            recommendation: envelope.recommendation,
            probabilities: envelope.probabilities,
        }
    }
}

/// Why a submission ended in [`SubmissionState::Failed`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorInfo {
    /// Blank attributes; no request was sent.
    #[error("{} required field(s) are missing", .missing.len())]
    Validation { missing: Vec<Attribute> },
    /// The service could not be reached or answered with something that is not JSON.
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network,
    /// The service answered but reported a failure.
    #[error("{0}")]
    Application(String),
}

impl ErrorInfo {
    /// Text to put in front of the user for this failure.
    pub fn prompt(&self) -> String {
        match self {
            ErrorInfo::Validation { missing } => {
                let labels: Vec<&str> = missing.iter().map(|attribute| attribute.label()).collect();
                format!("Please complete every field. Missing: {}", labels.join(", "))
            }
            ErrorInfo::Network => NETWORK_ERROR_MESSAGE.to_string(),
            ErrorInfo::Application(message) => message.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ErrorInfo::Validation { .. } => "validation",
            ErrorInfo::Network => "network",
            ErrorInfo::Application(_) => "application",
        }
    }
}

/// Lifecycle of the single outstanding prediction request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded(PredictionResult),
    Failed(ErrorInfo),
}

impl SubmissionState {
    /// `true` while a submission is being validated or awaiting the service.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SubmissionState::Validating | SubmissionState::Submitting)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            SubmissionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            SubmissionState::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Validating => "validating",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Succeeded(_) => "succeeded",
            SubmissionState::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> PredictionResult {
        PredictionResult {
            class_label: "Obesity_Type_I".to_string(),
            confidence: 0.61,
            bmi: 31.2,
            risk_level: RiskLevel::High,
            recommendation: "See a clinician.".to_string(),
            probabilities: BTreeMap::from([
                ("Normal_Weight".to_string(), 0.04),
                ("Obesity_Type_I".to_string(), 0.61),
                ("Obesity_Type_II".to_string(), 0.21),
                ("Overweight_Level_II".to_string(), 0.14),
            ]),
        }
    }

    #[test]
    fn ranks_probabilities_descending() {
        let result = result();
        let ranked = result.ranked_probabilities();
        let labels: Vec<&str> = ranked.iter().map(|(label, _)| *label).collect();
        assert_eq!(
            labels,
            vec![
                "Obesity_Type_I",
                "Obesity_Type_II",
                "Overweight_Level_II",
                "Normal_Weight"
            ]
        );
        assert_eq!(result.color(), Color::Red500);
    }

    #[test]
    fn every_error_has_a_prompt() {
        let validation = ErrorInfo::Validation {
            missing: vec![Attribute::Age, Attribute::TransportMode],
        };
        assert_eq!(
            validation.prompt(),
            "Please complete every field. Missing: Age (years), Transportation"
        );
        assert_eq!(ErrorInfo::Network.prompt(), NETWORK_ERROR_MESSAGE);
        assert_eq!(
            ErrorInfo::Application("model unavailable".to_string()).prompt(),
            "model unavailable"
        );
    }

    #[test]
    fn only_validating_and_submitting_are_in_flight() {
        assert!(!SubmissionState::Idle.is_in_flight());
        assert!(SubmissionState::Validating.is_in_flight());
        assert!(SubmissionState::Submitting.is_in_flight());
        assert!(!SubmissionState::Succeeded(result()).is_in_flight());
        assert!(!SubmissionState::Failed(ErrorInfo::Network).is_in_flight());
    }
}
