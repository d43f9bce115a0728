// src/features/calibration.rs
//! Calibration of raw phone-accelerometer windows into the units and
//! amplitude characteristics of the corpus the statistical model was trained
//! on.
//!
//! Three steps, in order:
//! 1. scale g-units to m/s^2 by the standard gravitational constant;
//! 2. if the z baseline sits near 0 (the sensor reports gravity-compensated
//!    z), shift it toward the corpus' ~9 m/s^2 gravity DC offset;
//! 3. if the resultant magnitude is very flat, scale the whole window up
//!    toward a walking-level target std.
//!
//! Pure and deterministic: identical input windows yield identical output.

use crate::config::constants::calibration::*;
use crate::types::Sample;

/// Calibrate one window of raw g-unit samples. The input is not modified.
pub fn calibrate(samples: &[Sample]) -> Vec<Sample> {
    let mut out: Vec<Sample> = samples
        .iter()
        .map(|s| Sample::new(s.x * STANDARD_GRAVITY, s.y * STANDARD_GRAVITY, s.z * STANDARD_GRAVITY))
        .collect();

    if out.is_empty() {
        return out;
    }

    // Gravity alignment on z when the baseline is centered around ~0.
    let z_mean = out.iter().map(|s| s.z).sum::<f64>() / out.len() as f64;
    if z_mean > -Z_NEUTRAL_BAND && z_mean < Z_NEUTRAL_BAND {
        for s in &mut out {
            s.z += Z_GRAVITY_OFFSET;
        }
    }

    // Amplitude boost when the motion signal is too flat.
    let magnitudes: Vec<f64> = out.iter().map(Sample::magnitude).collect();
    let mag_mean = magnitudes.iter().sum::<f64>() / magnitudes.len() as f64;
    let mag_std = (magnitudes
        .iter()
        .map(|m| (m - mag_mean) * (m - mag_mean))
        .sum::<f64>()
        / magnitudes.len() as f64)
        .sqrt();
    if mag_std < FLAT_MAGNITUDE_STD {
        let scale = (TARGET_MAGNITUDE_STD / mag_std.max(MIN_AMPLITUDE_STD))
            .clamp(1.0, MAX_AMPLITUDE_SCALE);
        for s in &mut out {
            s.x *= scale;
            s.y *= scale;
            s.z *= scale;
        }
    }

    out
}
