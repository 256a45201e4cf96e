use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;

use super::{fingerprint, ClassifierError, ModelInfo, Prediction, RiskClassifier};
use crate::models::patient::FEATURE_NAMES;
use crate::models::PatientRecord;

const NUM_CLASSES: usize = 2;
const THRESHOLD: f64 = 0.5;

/// Classifier exported to ONNX.
///
/// Expects a single `[1, 15]` f32 input holding the raw record in
/// `FEATURE_NAMES` order (categories as enumeration index) and a
/// `[1, 2]` class-probability output.
///
/// Uses interior mutability (Mutex) because ort::Session::run requires `&mut self`
/// but the RiskClassifier trait exposes `&self` for shared usage.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    info: ModelInfo,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        if !path.exists() {
            return Err(ClassifierError::ModelNotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;

        let session = Session::builder()
            .map_err(|e: ort::Error| ClassifierError::Incompatible(e.to_string()))?
            .with_intra_threads(1)
            .map_err(|e: ort::Error| ClassifierError::Incompatible(e.to_string()))?
            .commit_from_memory(&bytes)
            .map_err(|e: ort::Error| {
                ClassifierError::Incompatible(format!("ONNX load failed: {e}"))
            })?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("onnx_model")
            .to_string();
        let info = ModelInfo {
            name,
            version: "onnx".into(),
            kind: "onnx",
            fingerprint: fingerprint(&bytes),
        };

        tracing::info!(
            path = %path.display(),
            fingerprint = %info.fingerprint,
            "ONNX classifier loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            info,
        })
    }

    fn positive_probability(&self, record: &PatientRecord) -> Result<f64, ClassifierError> {
        use ort::value::TensorRef;

        let input = ndarray::Array2::from_shape_vec(
            (1, FEATURE_NAMES.len()),
            record.raw_features().to_vec(),
        )
        .map_err(|e| ClassifierError::Inference(e.to_string()))?;
        let tensor = TensorRef::from_array_view(&input)
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ClassifierError::Inference("Session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| ClassifierError::Inference(format!("ONNX inference failed: {e}")))?;

        let (shape, probs) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::Inference(format!("Output extraction: {e}")))?;

        if shape.len() != 2 || shape[1] as usize != NUM_CLASSES {
            return Err(ClassifierError::Inference(format!(
                "Unexpected output shape: {shape:?}, expected [1, {NUM_CLASSES}]"
            )));
        }
        Ok(f64::from(probs[1]))
    }
}

impl RiskClassifier for OnnxClassifier {
    fn predict(&self, record: &PatientRecord) -> Result<Prediction, ClassifierError> {
        let p = self.positive_probability(record)?;
        Ok(Prediction::from_probability(p, THRESHOLD))
    }

    fn info(&self) -> &ModelInfo {
        &self.info
    }
}
