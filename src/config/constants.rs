// src/config/constants.rs
//! System-wide default constants, grouped by concern.
//!
//! The timing constants (throttle interval, smoothing depth, reset grace) are
//! empirically chosen; they are defaults only and every one of them is
//! overridable through [`crate::config::PipelineConfig`].

/// Signal acquisition defaults.
pub mod signal {
    /// Default accelerometer sampling rate (WISDM-compatible).
    pub const DEFAULT_SAMPLING_RATE_HZ: u32 = 20;

    /// Default window length in seconds.
    pub const DEFAULT_WINDOW_SECONDS: f64 = 5.0;

    /// Default fraction of a window retained as the start of the next one.
    pub const DEFAULT_OVERLAP_FRACTION: f64 = 0.5;
}

/// Pipeline timing defaults.
pub mod timing {
    /// Minimum enforced interval between classification dispatches.
    pub const DEFAULT_THROTTLE_MS: u64 = 1_000;

    /// Post-reset quiet period during which no window is dispatched.
    pub const DEFAULT_RESET_GRACE_MS: u64 = 1_500;

    /// Session aggregator tick period.
    pub const SESSION_TICK_MS: u64 = 1_000;
}

/// Prediction smoothing defaults.
pub mod smoothing {
    /// Majority-vote history depth.
    pub const DEFAULT_SMOOTHING_WINDOW: usize = 3;
}

/// Calibration constants matching the units and corpus characteristics the
/// statistical model was trained on.
pub mod calibration {
    /// Standard gravitational constant, g -> m/s^2.
    pub const STANDARD_GRAVITY: f64 = 9.81;

    /// Half-width of the z-mean band treated as "gravity missing from z".
    pub const Z_NEUTRAL_BAND: f64 = 3.0;

    /// DC offset added to z when the baseline sits inside the neutral band.
    pub const Z_GRAVITY_OFFSET: f64 = 9.0;

    /// Magnitude std below which a window counts as flat.
    pub const FLAT_MAGNITUDE_STD: f64 = 0.6;

    /// Target magnitude std for flat windows (walking-level motion).
    pub const TARGET_MAGNITUDE_STD: f64 = 2.0;

    /// Upper bound on the amplitude-boost factor.
    pub const MAX_AMPLITUDE_SCALE: f64 = 6.0;

    /// Floor for the measured std when computing the boost factor.
    pub const MIN_AMPLITUDE_STD: f64 = 1e-6;
}

/// Inference server defaults.
pub mod server {
    /// Default bind address.
    pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

    /// Default listen port.
    pub const DEFAULT_PORT: u16 = 8000;
}

/// Classification client defaults.
pub mod client {
    /// Default backend base URL.
    pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

    /// Request timeout in seconds.
    pub const DEFAULT_REQUEST_TIMEOUT_S: u64 = 30;
}
