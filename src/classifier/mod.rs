//! Model provider: loads the serialized classifier once and answers
//! `predict(record)` for the rest of the process lifetime.
//!
//! The loaded handle is returned to the caller and passed explicitly to
//! the serving layer. Nothing here caches it globally.

pub mod pipeline;

#[cfg(feature = "onnx-classifier")]
pub mod onnx;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::models::PatientRecord;

pub use pipeline::PipelineClassifier;

#[cfg(feature = "onnx-classifier")]
pub use onnx::OnnxClassifier;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Model artifact not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model artifact incompatible: {0}")]
    Incompatible(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

// ═══════════════════════════════════════════════════════════
// Prediction types
// ═══════════════════════════════════════════════════════════

/// Predicted class. Serialized as the training label `0` / `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Negative,
    Positive,
}

impl Verdict {
    pub fn label(self) -> u8 {
        match self {
            Verdict::Negative => 0,
            Verdict::Positive => 1,
        }
    }
}

impl Serialize for Verdict {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.label())
    }
}

/// Classifier output for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: Verdict,
    /// Probability of the predicted label, in [0, 1].
    pub confidence: f64,
}

impl Prediction {
    /// Derive label and confidence from the positive-class probability.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        let probability = probability.clamp(0.0, 1.0);
        if probability >= threshold {
            Self {
                label: Verdict::Positive,
                confidence: probability,
            }
        } else {
            Self {
                label: Verdict::Negative,
                confidence: 1.0 - probability,
            }
        }
    }
}

/// Identity of the loaded artifact, reported on the health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub kind: &'static str,
    pub fingerprint: String,
}

// ═══════════════════════════════════════════════════════════
// Provider trait
// ═══════════════════════════════════════════════════════════

/// A loaded, read-only classifier.
pub trait RiskClassifier: Send + Sync {
    fn predict(&self, record: &PatientRecord) -> Result<Prediction, ClassifierError>;

    fn info(&self) -> &ModelInfo;
}

/// Load the classifier at `path`, choosing the provider by extension.
pub fn load_classifier(path: &Path) -> Result<Arc<dyn RiskClassifier>, ClassifierError> {
    if !path.exists() {
        return Err(ClassifierError::ModelNotFound(path.to_path_buf()));
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => Ok(Arc::new(PipelineClassifier::load(path)?)),
        #[cfg(feature = "onnx-classifier")]
        Some("onnx") => Ok(Arc::new(OnnxClassifier::load(path)?)),
        _ => Err(ClassifierError::Incompatible(format!(
            "unsupported model file {}",
            path.display()
        ))),
    }
}

/// `sha256:<hex>` digest of the artifact bytes.
pub fn fingerprint(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};

    format!("sha256:{:x}", Sha256::digest(bytes))
}

/// Fixed-answer classifier for tests.
pub struct MockClassifier {
    prediction: Prediction,
    info: ModelInfo,
}

impl MockClassifier {
    pub fn new(prediction: Prediction) -> Self {
        Self {
            prediction,
            info: ModelInfo {
                name: "mock".into(),
                version: "0".into(),
                kind: "mock",
                fingerprint: fingerprint(b"mock"),
            },
        }
    }
}

impl RiskClassifier for MockClassifier {
    fn predict(&self, _record: &PatientRecord) -> Result<Prediction, ClassifierError> {
        Ok(self.prediction)
    }

    fn info(&self) -> &ModelInfo {
        &self.info
    }
}
