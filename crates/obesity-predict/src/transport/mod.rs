//! Outbound boundary to the prediction service.
//!
//! The transport only moves bytes: it reports the HTTP status and raw body of
//! `POST /predict`, and leaves interpretation to the orchestrator so that stub
//! transports exercise the same parsing path as the real client.

pub mod client;
pub mod models;

use async_trait::async_trait;

use crate::fields::FieldSnapshot;

pub use client::HttpPredictionClient;
pub use models::{
    FailureEnvelope, HealthStatus, ModelInfo, PredictionSummary, ServiceBanner, SuccessEnvelope,
};

/// Raw reply of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReply {
    pub status: u16,
    pub body: String,
}

impl TransportReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Anything that can carry a prediction request to the service.
#[async_trait]
pub trait PredictionTransport: Send + Sync {
    /// Human-readable location of the service, used in logs and prompts.
    fn endpoint(&self) -> String;

    async fn send(&self, fields: &FieldSnapshot) -> Result<TransportReply, TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("unable to build HTTP client: {0}")]
    Client(String),
    #[error("could not reach {url}: {message}")]
    Unreachable { url: String, message: String },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("failed to read response from {url}: {message}")]
    Body { url: String, message: String },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("unexpected payload from {url}: {message}")]
    Decode { url: String, message: String },
}
