use metrics_exporter_prometheus::PrometheusHandle;
use obesity_predict::error::AppError;
use obesity_predict::fields::{Attribute, FieldError};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// `KEY=VALUE` where KEY is an attribute name or wire key.
pub(crate) fn parse_field_assignment(raw: &str) -> Result<(Attribute, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| FieldError::MalformedAssignment(raw.to_string()).to_string())?;
    let attribute = key
        .parse::<Attribute>()
        .map_err(|err| err.to_string())?;
    Ok((attribute, value.trim().to_string()))
}

/// Reads a JSON object of answers, e.g. a saved request body.
pub(crate) fn load_fields_json(path: &Path) -> Result<Vec<(Attribute, String)>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    parse_fields_json(&raw)
}

pub(crate) fn parse_fields_json(raw: &str) -> Result<Vec<(Attribute, String)>, AppError> {
    let object: Map<String, Value> = serde_json::from_str(raw)?;
    object
        .into_iter()
        .map(|(key, value)| {
            let attribute = key.parse::<Attribute>()?;
            let value = match value {
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                other => {
                    return Err(FieldError::MalformedAssignment(format!("{key}={other}")).into())
                }
            };
            Ok((attribute, value))
        })
        .collect()
}
