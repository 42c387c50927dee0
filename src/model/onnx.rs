//! ONNX Runtime backend
//!
//! Expects a regressor exported with a single `[batch, 11]` f32 input.
//! The first output holds one score per row.

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use crate::features::{FeatureRow, FEATURE_COUNT};
use super::{InferenceError, LoadError, Predictor};

pub struct OnnxRegressor {
    // `Session::run` needs `&mut`
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxRegressor {
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self, LoadError> {
        tracing::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| LoadError::Onnx(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| LoadError::Onnx(format!("Optimization error: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| LoadError::Onnx(format!("Load from memory error: {}", e)))?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| LoadError::Onnx("No output defined".to_string()))?;

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl Predictor for OnnxRegressor {
    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, InferenceError> {
        let input_data: Vec<f32> = rows
            .iter()
            .flat_map(|row| row.values().iter().map(|v| *v as f32))
            .collect();

        let input_array = Array2::<f32>::from_shape_vec((rows.len(), FEATURE_COUNT), input_data)
            .map_err(|e| InferenceError::Backend(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::Backend(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Backend(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or(InferenceError::EmptyOutput)?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Backend(format!("Extract error: {}", e)))?;

        Ok(data.iter().map(|v| *v as f64).collect())
    }
}
