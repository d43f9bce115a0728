// src/client.rs
//! Classification transport.
//!
//! [`ClassifyTransport`] is the boundary the pipeline driver dispatches
//! windows through; [`HttpClassifyClient`] is the reqwest implementation
//! talking to the inference server.

use crate::config::ClientConfig;
use crate::error::{MetError, MetResult, TransportError};
use crate::types::{MetClass, PredictRequest, PredictResponse, Prediction, Window};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;

/// Async boundary that turns a window into a prediction.
#[async_trait]
pub trait ClassifyTransport: Send + Sync {
    /// Classify one window.
    async fn classify(&self, window: &Window) -> Result<Prediction, TransportError>;
}

/// HTTP transport against the inference server.
///
/// Fallback behavior on a well-formed `200`: a missing or unknown
/// `met_class` is substituted with `Sedentary` before it reaches the
/// smoothing filter — an explicit, specified default, not a silent drop.
pub struct HttpClassifyClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpClassifyClient {
    /// Build a client for the configured backend.
    pub fn new(config: &ClientConfig) -> MetResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_s))
            .build()
            .map_err(|e| MetError::configuration("client", e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Backend base URL with trailing slashes stripped.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Liveness probe against `GET /ping`.
    pub async fn ping(&self) -> Result<(), TransportError> {
        let url = format!("{}/ping", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(TransportError::Api {
                status: response.status().as_u16(),
            })
        }
    }
}

#[async_trait]
impl ClassifyTransport for HttpClassifyClient {
    async fn classify(&self, window: &Window) -> Result<Prediction, TransportError> {
        let url = format!("{}/predict", self.base_url);
        let body = PredictRequest::from_window(window);

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Api {
                status: status.as_u16(),
            });
        }

        let parsed: PredictResponse = response.json().await.map_err(|_| TransportError::Api {
            status: status.as_u16(),
        })?;

        Ok(prediction_from_response(parsed))
    }
}

/// Interpret a decoded `200` body, applying the Sedentary default.
pub fn prediction_from_response(response: PredictResponse) -> Prediction {
    let label = response
        .met_class
        .as_deref()
        .and_then(MetClass::from_label)
        .unwrap_or(MetClass::Sedentary);

    let probabilities = response.probabilities.map(|raw| {
        raw.into_iter()
            .filter_map(|(name, p)| MetClass::from_label(&name).map(|class| (class, p)))
            .collect::<BTreeMap<MetClass, f64>>()
    });

    Prediction {
        label,
        probabilities,
    }
}
