// src/types.rs
//! Core data types: samples, windows, MET classes and predictions, plus the
//! wire representation shared by the HTTP server and client.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Single tri-axial accelerometer reading, in g-units as delivered by the
/// sensor. Implicitly timestamped by arrival order; immutable once captured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Acceleration along the x axis.
    pub x: f64,
    /// Acceleration along the y axis.
    pub y: f64,
    /// Acceleration along the z axis.
    pub z: f64,
}

impl Sample {
    /// Create a sample from raw axis readings.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Resultant magnitude `sqrt(x^2 + y^2 + z^2)`.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// True when all three axes carry finite values.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// The four ordered activity-intensity classes, derived from
/// metabolic-equivalent ranges. The derive order gives
/// `Sedentary < Light < Moderate < Vigorous`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MetClass {
    /// Sitting, lying, phone at rest.
    Sedentary,
    /// Standing, slow movement.
    Light,
    /// Walking, stairs.
    Moderate,
    /// Running, jogging.
    Vigorous,
}

impl MetClass {
    /// All classes in intensity order.
    pub const ALL: [MetClass; 4] = [
        MetClass::Sedentary,
        MetClass::Light,
        MetClass::Moderate,
        MetClass::Vigorous,
    ];

    /// Number of classes.
    pub const COUNT: usize = 4;

    /// Canonical label string, as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetClass::Sedentary => "Sedentary",
            MetClass::Light => "Light",
            MetClass::Moderate => "Moderate",
            MetClass::Vigorous => "Vigorous",
        }
    }

    /// Parse a wire label. Returns `None` for unknown strings.
    pub fn from_label(label: &str) -> Option<MetClass> {
        match label {
            "Sedentary" => Some(MetClass::Sedentary),
            "Light" => Some(MetClass::Light),
            "Moderate" => Some(MetClass::Moderate),
            "Vigorous" => Some(MetClass::Vigorous),
            _ => None,
        }
    }

    /// Stable index of this class within [`MetClass::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for MetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fixed-length contiguous slice of the sample stream, the unit of
/// classification. A window is fully determined by its samples and carries no
/// identity beyond content; length validation against the configured `WIN`
/// happens in the feature engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    samples: Vec<Sample>,
}

impl Window {
    /// Wrap an ordered run of samples.
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Samples in arrival order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples in the window.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the window holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Output of the classifier: a label and, when the backend provides one, a
/// probability distribution over the four classes summing to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Arg-max class of `probabilities` when present.
    pub label: MetClass,
    /// Per-class probability mass.
    pub probabilities: Option<BTreeMap<MetClass, f64>>,
}

impl Prediction {
    /// Prediction carrying a bare label and no distribution.
    pub fn from_label(label: MetClass) -> Self {
        Self {
            label,
            probabilities: None,
        }
    }
}

// ---- Wire schema (shared by server and client) ----

/// One accelerometer reading as transmitted in a `/predict` body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AccelSample {
    /// Acceleration X in g.
    pub accel_x: f64,
    /// Acceleration Y in g.
    pub accel_y: f64,
    /// Acceleration Z in g.
    pub accel_z: f64,
}

impl From<AccelSample> for Sample {
    fn from(raw: AccelSample) -> Self {
        Sample::new(raw.accel_x, raw.accel_y, raw.accel_z)
    }
}

impl From<Sample> for AccelSample {
    fn from(sample: Sample) -> Self {
        AccelSample {
            accel_x: sample.x,
            accel_y: sample.y,
            accel_z: sample.z,
        }
    }
}

/// Body of `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// One window of samples, oldest first.
    pub samples: Vec<AccelSample>,
}

impl PredictRequest {
    /// Build a request body from a window.
    pub fn from_window(window: &Window) -> Self {
        Self {
            samples: window.samples().iter().map(|&s| s.into()).collect(),
        }
    }
}

/// Body of a `200` response from `/predict`.
///
/// `met_class` is optional on the read side: a well-formed response without it
/// is still accepted and the label defaults downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Predicted class label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub met_class: Option<String>,
    /// Per-class probabilities, keyed by label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<BTreeMap<String, f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_ordering() {
        assert!(MetClass::Sedentary < MetClass::Light);
        assert!(MetClass::Light < MetClass::Moderate);
        assert!(MetClass::Moderate < MetClass::Vigorous);
    }

    #[test]
    fn test_label_round_trip() {
        for class in MetClass::ALL {
            assert_eq!(MetClass::from_label(class.as_str()), Some(class));
        }
        assert_eq!(MetClass::from_label("Extreme"), None);
    }

    #[test]
    fn test_sample_magnitude() {
        let sample = Sample::new(3.0, 4.0, 0.0);
        assert!((sample.magnitude() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_sample_detected() {
        assert!(!Sample::new(f64::NAN, 0.0, 0.0).is_finite());
        assert!(!Sample::new(0.0, f64::INFINITY, 0.0).is_finite());
        assert!(Sample::new(0.0, 0.1, 1.0).is_finite());
    }

    #[test]
    fn test_predict_response_missing_class_deserializes() {
        let parsed: PredictResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.met_class.is_none());
        assert!(parsed.probabilities.is_none());
    }

    #[test]
    fn test_predict_request_wire_names() {
        let window = Window::new(vec![Sample::new(0.1, -0.2, 0.98)]);
        let json = serde_json::to_string(&PredictRequest::from_window(&window)).unwrap();
        assert!(json.contains("accel_x"));
        assert!(json.contains("accel_y"));
        assert!(json.contains("accel_z"));
    }
}
