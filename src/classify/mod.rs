// src/classify/mod.rs
//! Classifier boundary.
//!
//! The trained model is a black box behind [`MetClassifier`]: a feature
//! vector goes in, a label plus a probability distribution comes out, with
//! the label equal to the distribution's arg-max. [`CutpointClassifier`] is a
//! deterministic stand-in keyed on magnitude dynamics so the server runs
//! end-to-end without a model artifact; the real model loads through the
//! `onnx` feature.

#[cfg(feature = "onnx")]
pub mod onnx;

#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;

use crate::error::MetResult;
use crate::features::FeatureVector;
use crate::types::{MetClass, Prediction};
use std::collections::BTreeMap;

/// Maps a feature vector to an intensity class.
pub trait MetClassifier: Send + Sync {
    /// Classify one window's features.
    fn classify(&self, features: &FeatureVector) -> MetResult<Prediction>;
}

/// Deterministic classifier mapping calibrated magnitude variability onto the
/// four classes through per-class intensity centers.
#[derive(Debug, Clone)]
pub struct CutpointClassifier {
    centers: [f64; MetClass::COUNT],
    width: f64,
}

impl Default for CutpointClassifier {
    fn default() -> Self {
        // Magnitude-std centers in m/s^2: still phone, standing sway,
        // walking, jogging.
        Self {
            centers: [0.25, 1.2, 3.0, 6.5],
            width: 1.5,
        }
    }
}

impl MetClassifier for CutpointClassifier {
    fn classify(&self, features: &FeatureVector) -> MetResult<Prediction> {
        let s = features.magnitude_std;

        let scores: Vec<f64> = self
            .centers
            .iter()
            .map(|c| {
                let d = (s - c) / self.width;
                (-d * d).exp()
            })
            .collect();
        let total: f64 = scores.iter().sum();

        let mut probabilities = BTreeMap::new();
        let mut label = MetClass::Sedentary;
        let mut best = f64::MIN;
        for (class, score) in MetClass::ALL.iter().zip(&scores) {
            let p = score / total;
            probabilities.insert(*class, p);
            if p > best {
                best = p;
                label = *class;
            }
        }

        Ok(Prediction {
            label,
            probabilities: Some(probabilities),
        })
    }
}
