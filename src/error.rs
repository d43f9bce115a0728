// src/error.rs
//! Unified error handling for the MET classification core.
//!
//! Two families: [`MetError`] covers local faults (malformed windows,
//! configuration, classifier failures) and [`TransportError`] covers faults
//! raised at the network boundary. Transport faults are always recoverable:
//! the pipeline keeps displaying the last known class and the windowing
//! cadence acts as the retry mechanism.

use thiserror::Error;

/// Result type alias for core operations.
pub type MetResult<T> = Result<T, MetError>;

/// Errors raised by the core pipeline components.
#[derive(Debug, Clone, Error)]
pub enum MetError {
    /// A window arrived with the wrong number of samples.
    #[error("invalid window: expected {expected} samples, got {actual}")]
    InvalidWindow {
        /// Required window length in samples.
        expected: usize,
        /// Length actually received.
        actual: usize,
    },

    /// A window contained a non-finite reading.
    #[error("invalid window: non-finite sample at index {index}")]
    NonFiniteSample {
        /// Position of the offending sample within the window.
        index: usize,
    },

    /// Configuration rejected at startup.
    #[error("configuration error in {component}: {reason}")]
    Configuration {
        /// Component whose configuration failed validation.
        component: String,
        /// Human-readable rejection reason.
        reason: String,
    },

    /// The classifier backend failed to produce a prediction.
    #[error("classifier error: {0}")]
    Classifier(String),
}

impl MetError {
    /// Shorthand for a [`MetError::Configuration`] value.
    pub fn configuration(component: &str, reason: impl Into<String>) -> Self {
        MetError::Configuration {
            component: component.to_string(),
            reason: reason.into(),
        }
    }
}

/// Faults raised by the classification transport.
///
/// `Network` means no usable response arrived at all; `Api` means the backend
/// answered but not with a decodable 2xx body (a 200 whose body cannot be
/// decoded maps to `Api { status: 200 }`).
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Transport-level failure: DNS, connect, timeout, broken stream.
    #[error("network error: {0}")]
    Network(String),

    /// The backend responded with a non-usable status or body.
    #[error("API {status}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
    },
}
