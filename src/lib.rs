//! met-core: real-time MET activity-intensity classification
//!
//! This library turns a continuous stream of tri-axial accelerometer samples
//! into a live activity-intensity label (Sedentary, Light, Moderate or
//! Vigorous) and accumulates per-class time statistics for a session. It
//! provides:
//!
//! - Sample buffering and fixed-overlap window extraction with a dispatch
//!   throttle and load-shedding backpressure
//! - Calibration and deterministic feature extraction matching the trained
//!   model's corpus
//! - A classifier trait boundary with a deterministic fallback and an
//!   optional ONNX backend
//! - Majority-vote smoothing over recent predictions
//! - Per-second session time aggregation with derived MVPA metrics
//! - An axum inference server and a reqwest classification client
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use met_core::config::PipelineConfig;
//! use met_core::pipeline::{Pipeline, PipelineEvent};
//! use met_core::types::Sample;
//! use met_core::utils::time::SystemTimeProvider;
//! use std::sync::Arc;
//!
//! let config = PipelineConfig::default();
//! let mut pipeline = Pipeline::new(config, Arc::new(SystemTimeProvider));
//!
//! // One event per sensor tick; a window comes back when one is due.
//! if let Some(window) = pipeline.handle(PipelineEvent::Sample(Sample::new(0.02, -0.01, 0.98))) {
//!     // hand the window to a ClassifyTransport and feed the outcome back
//!     // as PipelineEvent::Outcome
//!     let _ = window;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod server;
pub mod types;
pub mod utils;

// Re-export commonly used types for convenience
pub use classify::{CutpointClassifier, MetClassifier};
pub use client::{ClassifyTransport, HttpClassifyClient};
pub use config::{MetConfig, PipelineConfig};
pub use error::{MetError, MetResult, TransportError};
pub use features::{FeatureEngine, FeatureVector};
pub use pipeline::{
    majority_vote, pct, LinkStatus, Pipeline, PipelineEvent, SessionAggregator, SmoothingFilter,
};
pub use types::{MetClass, Prediction, Sample, Window};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "met-core");
    }
}
