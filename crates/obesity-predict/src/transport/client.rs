use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{HealthStatus, ModelInfo};
use super::{PredictionTransport, TransportError, TransportReply};
use crate::config::PredictionServiceConfig;
use crate::fields::FieldSnapshot;

/// `reqwest`-backed client for the prediction service.
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPredictionClient {
    pub fn new(config: &PredictionServiceConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .pool_max_idle_per_host(2)
            .build()
            .map_err(|err| TransportError::Client(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET /health`.
    pub async fn check_health(&self) -> Result<HealthStatus, TransportError> {
        self.get_json("health").await
    }

    /// `GET /model-info`.
    pub async fn model_info(&self) -> Result<ModelInfo, TransportError> {
        self.get_json("model-info").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let url = self.url(path);
        debug!(%url, "querying prediction service");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| request_error(&url, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| TransportError::Decode {
                url,
                message: err.to_string(),
            })
    }
}

fn request_error(url: &str, err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransportError::Unreachable {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl PredictionTransport for HttpPredictionClient {
    fn endpoint(&self) -> String {
        self.url("predict")
    }

    async fn send(&self, fields: &FieldSnapshot) -> Result<TransportReply, TransportError> {
        let url = self.endpoint();
        debug!(%url, "dispatching prediction request");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(fields)
            .send()
            .await
            .map_err(|err| request_error(&url, err))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| {
            if err.is_timeout() {
                TransportError::Timeout { url: url.clone() }
            } else {
                TransportError::Body {
                    url: url.clone(),
                    message: err.to_string(),
                }
            }
        })?;

        Ok(TransportReply { status, body })
    }
}
