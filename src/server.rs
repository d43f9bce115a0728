// src/server.rs
//! Inference HTTP server.
//!
//! Stateless per request: calibration, feature extraction and the classifier
//! are pure or read-only, and the loaded model is shared across requests via
//! an `Arc`. Routes: `GET /ping` (liveness) and `POST /predict` (one window
//! in, one prediction out).

use crate::classify::MetClassifier;
use crate::error::MetError;
use crate::features::FeatureEngine;
use crate::types::{PredictRequest, PredictResponse, Sample, Window};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Calibration + feature extraction engine.
    pub engine: FeatureEngine,
    /// Loaded model, shared read-only.
    pub classifier: Arc<dyn MetClassifier>,
}

impl AppState {
    /// Assemble server state for windows of `win` samples.
    pub fn new(win: usize, classifier: Arc<dyn MetClassifier>) -> Self {
        Self {
            engine: FeatureEngine::new(win),
            classifier,
        }
    }
}

/// Request-level errors surfaced to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
    /// The body carried fewer samples than one window.
    TooFewSamples {
        /// Required window length.
        needed: usize,
        /// Samples received.
        got: usize,
    },
    /// The window failed validation inside the feature engine.
    InvalidWindow(MetError),
    /// The classifier backend failed.
    Classifier(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::TooFewSamples { needed, got } => (
                StatusCode::BAD_REQUEST,
                format!("Not enough samples ({}). Need at least {}.", got, needed),
            ),
            ApiError::InvalidWindow(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Classifier(reason) => {
                tracing::error!(%reason, "classifier failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal inference error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));
        (status, body).into_response()
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/predict", post(predict))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe.
pub async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Classify one window of accelerometer samples.
///
/// Bodies longer than one window are accepted; the most recent `WIN` samples
/// are used, which lets clients post from rolling buffers.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let win = state.engine.win();
    let samples: Vec<Sample> = request.samples.iter().map(|&s| s.into()).collect();

    if samples.len() < win {
        return Err(ApiError::TooFewSamples {
            needed: win,
            got: samples.len(),
        });
    }

    let window = Window::new(samples[samples.len() - win..].to_vec());
    let features = state
        .engine
        .extract(&window)
        .map_err(ApiError::InvalidWindow)?;

    let prediction = state
        .classifier
        .classify(&features)
        .map_err(|e| ApiError::Classifier(e.to_string()))?;

    Ok(Json(PredictResponse {
        met_class: Some(prediction.label.as_str().to_string()),
        probabilities: prediction.probabilities.map(|p| {
            p.into_iter()
                .map(|(class, prob)| (class.as_str().to_string(), prob))
                .collect()
        }),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::CutpointClassifier;
    use crate::types::AccelSample;

    fn test_state(win: usize) -> AppState {
        AppState::new(win, Arc::new(CutpointClassifier::default()))
    }

    fn still_samples(n: usize) -> Vec<AccelSample> {
        (0..n)
            .map(|_| AccelSample {
                accel_x: 0.0,
                accel_y: 0.0,
                accel_z: 1.0,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_ping_body() {
        let Json(body) = ping().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_predict_rejects_short_window() {
        let state = test_state(100);
        let request = PredictRequest {
            samples: still_samples(40),
        };
        let result = predict(State(state), Json(request)).await;
        assert!(matches!(
            result,
            Err(ApiError::TooFewSamples {
                needed: 100,
                got: 40
            })
        ));
    }

    #[tokio::test]
    async fn test_predict_rejects_non_finite() {
        let state = test_state(4);
        let mut samples = still_samples(4);
        samples[1].accel_y = f64::NAN;
        let result = predict(State(state), Json(PredictRequest { samples })).await;
        assert!(matches!(result, Err(ApiError::InvalidWindow(_))));
    }

    #[tokio::test]
    async fn test_predict_returns_label_and_distribution() {
        let state = test_state(4);
        let request = PredictRequest {
            samples: still_samples(4),
        };
        let Json(response) = predict(State(state), Json(request)).await.unwrap();

        assert_eq!(response.met_class.as_deref(), Some("Sedentary"));
        let probabilities = response.probabilities.unwrap();
        assert_eq!(probabilities.len(), 4);
        let sum: f64 = probabilities.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_predict_uses_most_recent_window() {
        let state = test_state(4);

        // Rolling buffer: old jittery readings followed by a still tail.
        let mut samples: Vec<AccelSample> = (0..6)
            .map(|i| AccelSample {
                accel_x: i as f64,
                accel_y: -(i as f64),
                accel_z: 0.5 * i as f64,
            })
            .collect();
        samples.extend(still_samples(4));

        let Json(oversized) = predict(State(state.clone()), Json(PredictRequest { samples }))
            .await
            .unwrap();
        let Json(exact) = predict(
            State(state),
            Json(PredictRequest {
                samples: still_samples(4),
            }),
        )
        .await
        .unwrap();

        assert_eq!(oversized.met_class, exact.met_class);
        assert_eq!(oversized.probabilities, exact.probabilities);
    }
}
