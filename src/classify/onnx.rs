// src/classify/onnx.rs
//! ONNX Runtime classifier backend.
//!
//! Loads an exported model plus a class-index JSON (`{"index_to_class":
//! {"0": "Light", ...}}`) and serves `[1, FEATURE_COUNT]` float inputs.

use crate::error::{MetError, MetResult};
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::types::{MetClass, Prediction};
use ort::session::Session;
use ort::tensor::TensorElementType;
use ort::value::ValueType;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

#[derive(Debug, Deserialize)]
struct ClassesJson {
    index_to_class: HashMap<String, String>,
}

/// Classifier backed by an ONNX model file.
pub struct OnnxClassifier {
    // ort sessions take &mut self to run.
    session: Mutex<Session>,
    labels: Vec<MetClass>,
    input_name: String,
    prob_output_name: String,
}

impl OnnxClassifier {
    /// Load the model and its class mapping from disk.
    pub fn new(model_path: &str, classes_path: &str) -> MetResult<Self> {
        let labels = Self::load_classes(classes_path)?;

        let session = Session::builder()
            .and_then(|b| b.commit_from_file(model_path))
            .map_err(|e| MetError::Classifier(format!("failed to load {}: {}", model_path, e)))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| MetError::Classifier("model has no input".to_string()))?;

        // Prefer the float probability tensor over an integer label output.
        let prob_output_name = session
            .outputs
            .iter()
            .find(|output| {
                matches!(
                    output.output_type,
                    ValueType::Tensor {
                        ty: TensorElementType::Float32,
                        ..
                    }
                )
            })
            .or_else(|| session.outputs.first())
            .map(|output| output.name.clone())
            .ok_or_else(|| MetError::Classifier("model has no output".to_string()))?;

        tracing::info!(
            model = model_path,
            input = %input_name,
            output = %prob_output_name,
            classes = labels.len(),
            "ONNX classifier loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            labels,
            input_name,
            prob_output_name,
        })
    }

    fn load_classes(path: &str) -> MetResult<Vec<MetClass>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MetError::Classifier(format!("failed to read {}: {}", path, e)))?;
        let data: ClassesJson = serde_json::from_str(&content)
            .map_err(|e| MetError::Classifier(format!("bad class mapping {}: {}", path, e)))?;

        let mut pairs: Vec<(usize, String)> = data
            .index_to_class
            .into_iter()
            .filter_map(|(k, v)| k.parse::<usize>().ok().map(|idx| (idx, v)))
            .collect();
        pairs.sort_by_key(|(idx, _)| *idx);

        pairs
            .into_iter()
            .map(|(_, name)| {
                MetClass::from_label(&name)
                    .ok_or_else(|| MetError::Classifier(format!("unknown class label {:?}", name)))
            })
            .collect()
    }
}

impl super::MetClassifier for OnnxClassifier {
    fn classify(&self, features: &FeatureVector) -> MetResult<Prediction> {
        let input_data: Vec<f32> = features
            .to_flat_vector()
            .into_iter()
            .map(|v| v as f32)
            .collect();
        let shape = vec![1_usize, FEATURE_COUNT];

        let input_value = ort::value::Value::from_array((shape, input_data))
            .map_err(|e| MetError::Classifier(format!("input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| MetError::Classifier("session poisoned".to_string()))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => &input_value])
            .map_err(|e| MetError::Classifier(format!("inference: {}", e)))?;

        let (prob_shape, prob_data) = outputs[self.prob_output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| MetError::Classifier(format!("output tensor: {}", e)))?;

        let num_classes = if prob_shape.len() >= 2 {
            prob_shape[1] as usize
        } else {
            prob_shape[0] as usize
        };

        let mut probabilities = BTreeMap::new();
        let mut label = MetClass::Sedentary;
        let mut best = f32::MIN;
        for (i, class) in self.labels.iter().enumerate().take(num_classes) {
            let p = prob_data[i];
            probabilities.insert(*class, p as f64);
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
