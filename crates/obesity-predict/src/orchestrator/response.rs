use serde_json::Value;

use super::state::{ErrorInfo, PredictionResult, APPLICATION_ERROR_FALLBACK};
use crate::transport::models::{SuccessEnvelope, STATUS_SUCCESS};
use crate::transport::TransportReply;

/// Classifies a reply from `POST /predict`.
///
/// The HTTP status is not consulted: a body that is not JSON is a network
/// failure, and otherwise the envelope's own `status` field decides.
pub(crate) fn interpret(reply: &TransportReply) -> Result<PredictionResult, ErrorInfo> {
    let payload: Value = serde_json::from_str(&reply.body).map_err(|_| ErrorInfo::Network)?;

    let status = payload.get("status").and_then(Value::as_str);
    if status == Some(STATUS_SUCCESS) {
        let envelope: SuccessEnvelope = serde_json::from_value(payload).map_err(|err| {
            ErrorInfo::Application(format!("malformed prediction response: {err}"))
        })?;
        return Ok(envelope.into());
    }

    let message = payload
        .get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or(APPLICATION_ERROR_FALLBACK);

    Err(ErrorInfo::Application(message.to_string()))
}
