// src/config/mod.rs
//! Configuration management.
//!
//! All pipeline parameters are fixed at startup and read-only thereafter.
//! Defaults come from [`constants`]; files are TOML via [`loader`].

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{load_from_path, ConfigError};

use serde::{Deserialize, Serialize};

/// Complete system configuration.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct MetConfig {
    /// Client-side pipeline parameters.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Inference server parameters.
    #[serde(default)]
    pub server: ServerConfig,

    /// Classification client parameters.
    #[serde(default)]
    pub client: ClientConfig,
}

/// Windowing, throttling and smoothing parameters for the client-side
/// pipeline.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PipelineConfig {
    /// Sensor sampling rate in Hz.
    #[serde(default = "defaults::sampling_rate_hz")]
    pub sampling_rate_hz: u32,

    /// Window length in seconds.
    #[serde(default = "defaults::window_seconds")]
    pub window_seconds: f64,

    /// Fraction of each window retained as the start of the next, in [0, 1).
    #[serde(default = "defaults::overlap_fraction")]
    pub overlap_fraction: f64,

    /// Minimum interval between classification dispatches.
    #[serde(default = "defaults::throttle_ms")]
    pub throttle_ms: u64,

    /// Majority-vote history depth.
    #[serde(default = "defaults::smoothing_window")]
    pub smoothing_window: usize,

    /// Post-reset quiet period.
    #[serde(default = "defaults::reset_grace_ms")]
    pub reset_grace_ms: u64,
}

/// Inference server settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "defaults::bind_addr")]
    pub bind_addr: String,

    /// Listen port.
    #[serde(default = "defaults::port")]
    pub port: u16,
}

/// Classification client settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClientConfig {
    /// Backend base URL; trailing slashes are stripped before `/predict` is
    /// appended.
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "defaults::request_timeout_s")]
    pub request_timeout_s: u64,
}

/// Default value providers backed by [`constants`].
mod defaults {
    use super::constants;

    pub fn sampling_rate_hz() -> u32 {
        constants::signal::DEFAULT_SAMPLING_RATE_HZ
    }
    pub fn window_seconds() -> f64 {
        constants::signal::DEFAULT_WINDOW_SECONDS
    }
    pub fn overlap_fraction() -> f64 {
        constants::signal::DEFAULT_OVERLAP_FRACTION
    }
    pub fn throttle_ms() -> u64 {
        constants::timing::DEFAULT_THROTTLE_MS
    }
    pub fn smoothing_window() -> usize {
        constants::smoothing::DEFAULT_SMOOTHING_WINDOW
    }
    pub fn reset_grace_ms() -> u64 {
        constants::timing::DEFAULT_RESET_GRACE_MS
    }

    pub fn bind_addr() -> String {
        constants::server::DEFAULT_BIND_ADDR.to_string()
    }
    pub fn port() -> u16 {
        constants::server::DEFAULT_PORT
    }

    pub fn base_url() -> String {
        constants::client::DEFAULT_BASE_URL.to_string()
    }
    pub fn request_timeout_s() -> u64 {
        constants::client::DEFAULT_REQUEST_TIMEOUT_S
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sampling_rate_hz: defaults::sampling_rate_hz(),
            window_seconds: defaults::window_seconds(),
            overlap_fraction: defaults::overlap_fraction(),
            throttle_ms: defaults::throttle_ms(),
            smoothing_window: defaults::smoothing_window(),
            reset_grace_ms: defaults::reset_grace_ms(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: defaults::bind_addr(),
            port: defaults::port(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            request_timeout_s: defaults::request_timeout_s(),
        }
    }
}

impl PipelineConfig {
    /// Window length in samples: `WIN = sampling_rate_hz * window_seconds`.
    pub fn win_samples(&self) -> usize {
        (self.sampling_rate_hz as f64 * self.window_seconds) as usize
    }

    /// Hop between consecutive windows:
    /// `STEP = floor(WIN * (1 - overlap_fraction))`.
    pub fn step_samples(&self) -> usize {
        (self.win_samples() as f64 * (1.0 - self.overlap_fraction)).floor() as usize
    }

    /// Samples retained in the buffer after a dispatch: `WIN - STEP`.
    pub fn retained_tail(&self) -> usize {
        self.win_samples() - self.step_samples()
    }

    /// Validate parameter consistency.
    pub fn validate(&self) -> Result<(), String> {
        if self.sampling_rate_hz == 0 {
            return Err("Sampling rate must be greater than 0".to_string());
        }
        if self.window_seconds <= 0.0 {
            return Err("Window length must be positive".to_string());
        }
        if !(0.0..1.0).contains(&self.overlap_fraction) {
            return Err("Overlap fraction must be in [0, 1)".to_string());
        }
        if self.win_samples() == 0 {
            return Err("Window must contain at least one sample".to_string());
        }
        if self.step_samples() == 0 {
            return Err(format!(
                "Overlap of {} leaves an empty step for a {}-sample window",
                self.overlap_fraction,
                self.win_samples()
            ));
        }
        if self.smoothing_window == 0 {
            return Err("Smoothing window must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl MetConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), String> {
        self.pipeline.validate()?;
        if self.client.base_url.trim().is_empty() {
            return Err("Client base URL must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MetConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_window_geometry() {
        let config = PipelineConfig::default();
        assert_eq!(config.win_samples(), 100);
        assert_eq!(config.step_samples(), 50);
        assert_eq!(config.retained_tail(), 50);
    }

    #[test]
    fn test_win_tracks_rate_and_seconds() {
        let mut config = PipelineConfig::default();
        config.sampling_rate_hz = 50;
        config.window_seconds = 2.0;
        assert_eq!(config.win_samples(), 100);

        config.overlap_fraction = 0.25;
        assert_eq!(config.step_samples(), 75);
        assert_eq!(config.retained_tail(), 25);
    }

    #[test]
    fn test_invalid_overlap_rejected() {
        let mut config = PipelineConfig::default();
        config.overlap_fraction = 1.0;
        assert!(config.validate().is_err());

        config.overlap_fraction = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_degenerate_step_rejected() {
        let mut config = PipelineConfig::default();
        config.sampling_rate_hz = 1;
        config.window_seconds = 1.0;
        config.overlap_fraction = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = MetConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: MetConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(
            config.pipeline.sampling_rate_hz,
            deserialized.pipeline.sampling_rate_hz
        );
        assert_eq!(config.pipeline.throttle_ms, deserialized.pipeline.throttle_ms);
        assert_eq!(config.client.base_url, deserialized.client.base_url);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: MetConfig = toml::from_str("[pipeline]\nthrottle_ms = 500\n").unwrap();
        assert_eq!(parsed.pipeline.throttle_ms, 500);
        assert_eq!(parsed.pipeline.sampling_rate_hz, 20);
        assert_eq!(parsed.pipeline.smoothing_window, 3);
    }
}
