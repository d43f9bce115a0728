// src/features/mod.rs
//! Feature extraction for MET classification.
//!
//! One window in, one [`FeatureVector`] out: per-axis mean, std, min, max,
//! median and interquartile range, plus resultant-magnitude mean and std —
//! 20 scalars, flattened in the order the model was trained on. Statistics
//! follow the training pipeline's semantics: population std and
//! linearly-interpolated percentiles.

pub mod calibration;

pub use calibration::calibrate;

use crate::error::{MetError, MetResult};
use crate::types::{Sample, Window};

/// Number of scalar features per window.
pub const FEATURE_COUNT: usize = 20;

/// Descriptive statistics of one axis over a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisStats {
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Minimum.
    pub min: f64,
    /// Maximum.
    pub max: f64,
    /// Median.
    pub median: f64,
    /// Interquartile range (p75 - p25).
    pub iqr: f64,
}

/// Named feature vector for one window. A deterministic pure function of the
/// window's samples.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    /// X-axis statistics.
    pub x: AxisStats,
    /// Y-axis statistics.
    pub y: AxisStats,
    /// Z-axis statistics.
    pub z: AxisStats,
    /// Mean of the per-sample resultant magnitude.
    pub magnitude_mean: f64,
    /// Population std of the per-sample resultant magnitude.
    pub magnitude_std: f64,
}

impl FeatureVector {
    /// Flatten into the training order: per axis
    /// `[mean, std, min, max, median, iqr]` for x, y, z, then magnitude mean
    /// and std.
    pub fn to_flat_vector(&self) -> Vec<f64> {
        let mut features = Vec::with_capacity(FEATURE_COUNT);
        for axis in [&self.x, &self.y, &self.z] {
            features.extend_from_slice(&[
                axis.mean,
                axis.std_dev,
                axis.min,
                axis.max,
                axis.median,
                axis.iqr,
            ]);
        }
        features.push(self.magnitude_mean);
        features.push(self.magnitude_std);
        features
    }

    /// Feature names matching [`FeatureVector::to_flat_vector`] positions.
    pub fn feature_names() -> Vec<String> {
        let mut names = Vec::with_capacity(FEATURE_COUNT);
        for axis in ["x", "y", "z"] {
            for stat in ["mean", "std", "min", "max", "median", "iqr"] {
                names.push(format!("{}_{}", axis, stat));
            }
        }
        names.push("mag_mean".to_string());
        names.push("mag_std".to_string());
        names
    }
}

/// Calibration and feature extraction engine for windows of a fixed length.
#[derive(Debug, Clone, Copy)]
pub struct FeatureEngine {
    win: usize,
}

impl FeatureEngine {
    /// Engine for windows of exactly `win` samples.
    pub fn new(win: usize) -> Self {
        Self { win }
    }

    /// Required window length.
    pub fn win(&self) -> usize {
        self.win
    }

    /// Calibrate the window and compute its feature vector.
    ///
    /// Fails with [`MetError::InvalidWindow`] on a length mismatch and
    /// [`MetError::NonFiniteSample`] on NaN/infinite readings; no partial
    /// result is produced.
    pub fn extract(&self, window: &Window) -> MetResult<FeatureVector> {
        if window.len() != self.win {
            return Err(MetError::InvalidWindow {
                expected: self.win,
                actual: window.len(),
            });
        }
        if let Some(index) = window.samples().iter().position(|s| !s.is_finite()) {
            return Err(MetError::NonFiniteSample { index });
        }

        let calibrated = calibrate(window.samples());

        let xs: Vec<f64> = calibrated.iter().map(|s| s.x).collect();
        let ys: Vec<f64> = calibrated.iter().map(|s| s.y).collect();
        let zs: Vec<f64> = calibrated.iter().map(|s| s.z).collect();
        let magnitudes: Vec<f64> = calibrated.iter().map(Sample::magnitude).collect();

        Ok(FeatureVector {
            x: axis_stats(&xs),
            y: axis_stats(&ys),
            z: axis_stats(&zs),
            magnitude_mean: scrub(mean(&magnitudes)),
            magnitude_std: scrub(std_pop(&magnitudes)),
        })
    }
}

fn axis_stats(data: &[f64]) -> AxisStats {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    AxisStats {
        mean: scrub(mean(data)),
        std_dev: scrub(std_pop(data)),
        min: scrub(sorted[0]),
        max: scrub(sorted[sorted.len() - 1]),
        median: scrub(percentile(&sorted, 50.0)),
        iqr: scrub(percentile(&sorted, 75.0) - percentile(&sorted, 25.0)),
    }
}

fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

fn std_pop(data: &[f64]) -> f64 {
    let m = mean(data);
    (data.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / data.len() as f64).sqrt()
}

/// Linearly-interpolated percentile over pre-sorted data.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;
    if lo + 1 < sorted.len() {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    } else {
        sorted[lo]
    }
}

/// Replace non-finite results with 0.0, as the training pipeline does.
fn scrub(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Sample, Window};

    fn window_of(values: impl Iterator<Item = (f64, f64, f64)>) -> Window {
        Window::new(values.map(|(x, y, z)| Sample::new(x, y, z)).collect())
    }

    #[test]
    fn test_wrong_length_rejected() {
        let engine = FeatureEngine::new(100);
        let window = window_of((0..40).map(|_| (0.0, 0.0, 1.0)));
        match engine.extract(&window) {
            Err(MetError::InvalidWindow { expected, actual }) => {
                assert_eq!(expected, 100);
                assert_eq!(actual, 40);
            }
            other => panic!("expected InvalidWindow, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        let engine = FeatureEngine::new(4);
        let mut samples: Vec<Sample> = (0..4).map(|_| Sample::new(0.0, 0.0, 1.0)).collect();
        samples[2] = Sample::new(f64::NAN, 0.0, 1.0);
        match engine.extract(&Window::new(samples)) {
            Err(MetError::NonFiniteSample { index }) => assert_eq!(index, 2),
            other => panic!("expected NonFiniteSample, got {:?}", other),
        }
    }

    #[test]
    fn test_feature_count_and_names_align() {
        let names = FeatureVector::feature_names();
        assert_eq!(names.len(), FEATURE_COUNT);
        assert_eq!(names[0], "x_mean");
        assert_eq!(names[5], "x_iqr");
        assert_eq!(names[18], "mag_mean");
        assert_eq!(names[19], "mag_std");

        let engine = FeatureEngine::new(10);
        let window = window_of((0..10).map(|i| (i as f64 * 0.1, 0.0, 1.0)));
        let features = engine.extract(&window).unwrap();
        assert_eq!(features.to_flat_vector().len(), FEATURE_COUNT);
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&sorted, 50.0) - 2.5).abs() < 1e-12);
        assert!((percentile(&sorted, 25.0) - 1.75).abs() < 1e-12);
        assert!((percentile(&sorted, 75.0) - 3.25).abs() < 1e-12);
        assert!((percentile(&sorted, 100.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_known_axis_statistics() {
        // Constant z keeps calibration's boost factor fully predictable:
        // magnitude std is 0, so the whole window is scaled by the clamp
        // maximum after the 1 g -> 9.81 m/s^2 conversion.
        let engine = FeatureEngine::new(4);
        let window = window_of((0..4).map(|_| (0.0, 0.0, 1.0)));
        let features = engine.extract(&window).unwrap();

        let z = 9.81 * 6.0;
        assert!((features.z.mean - z).abs() < 1e-9);
        assert!(features.z.std_dev.abs() < 1e-9);
        assert!((features.z.min - z).abs() < 1e-9);
        assert!((features.z.max - z).abs() < 1e-9);
        assert!((features.z.median - z).abs() < 1e-9);
        assert!(features.z.iqr.abs() < 1e-9);
        assert!((features.magnitude_mean - z).abs() < 1e-9);
        assert!(features.magnitude_std.abs() < 1e-9);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let engine = FeatureEngine::new(100);
        let window = window_of((0..100).map(|i| {
            let t = i as f64 / 20.0;
            (t.sin(), t.cos(), 1.0 + 0.5 * (2.0 * t).sin())
        }));
        let a = engine.extract(&window).unwrap().to_flat_vector();
        let b = engine.extract(&window).unwrap().to_flat_vector();
        assert_eq!(a, b);
    }
}
