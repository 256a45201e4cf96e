//! JSON-serialized preprocessing + logistic regression pipeline.
//!
//! Encoding, in artifact order:
//! 1. numeric columns, standard-scaled: `(x - mean) / scale`
//! 2. categorical columns, one-hot over the declared `levels`
//!    (a level the pipeline never saw encodes as all zeros)
//!
//! `coefficients` must line up with the encoded vector.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{fingerprint, ClassifierError, ModelInfo, Prediction, RiskClassifier};
use crate::models::patient::FEATURE_NAMES;
use crate::models::{FeatureValue, PatientRecord};

/// Artifact layout version this loader understands.
pub const FORMAT_VERSION: u32 = 1;

const CATEGORICAL_COLUMNS: [&str; 2] = ["region", "season"];

fn default_threshold() -> f64 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericColumn {
    pub column: String,
    pub mean: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub column: String,
    pub levels: Vec<String>,
}

/// On-disk pipeline description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineArtifact {
    pub format_version: u32,
    pub name: String,
    pub version: String,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    pub numeric: Vec<NumericColumn>,
    #[serde(default)]
    pub categorical: Vec<CategoricalColumn>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl PipelineArtifact {
    /// Width of the encoded feature vector.
    pub fn encoded_width(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(|c| c.levels.len()).sum::<usize>()
    }

    /// Reject anything the predictor could not evaluate faithfully.
    pub fn check(&self) -> Result<(), ClassifierError> {
        let incompatible =
            |msg: String| -> Result<(), ClassifierError> { Err(ClassifierError::Incompatible(msg)) };

        if self.format_version != FORMAT_VERSION {
            return incompatible(format!(
                "format_version {} (supported: {FORMAT_VERSION})",
                self.format_version
            ));
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return incompatible(format!("threshold {} outside (0, 1)", self.threshold));
        }

        let mut seen = HashSet::new();
        for col in &self.numeric {
            let name = col.column.as_str();
            if !FEATURE_NAMES.contains(&name) || CATEGORICAL_COLUMNS.contains(&name) {
                return incompatible(format!("unknown numeric column {name:?}"));
            }
            if !seen.insert(name) {
                return incompatible(format!("duplicate column {name:?}"));
            }
            if !col.mean.is_finite() || !col.scale.is_finite() || col.scale == 0.0 {
                return incompatible(format!("bad scaler for {name:?}"));
            }
        }
        for col in &self.categorical {
            let name = col.column.as_str();
            if !CATEGORICAL_COLUMNS.contains(&name) {
                return incompatible(format!("unknown categorical column {name:?}"));
            }
            if !seen.insert(name) {
                return incompatible(format!("duplicate column {name:?}"));
            }
            if col.levels.is_empty() {
                return incompatible(format!("no levels for {name:?}"));
            }
        }

        let width = self.encoded_width();
        if self.coefficients.len() != width {
            return incompatible(format!(
                "{} coefficients for {width} encoded features",
                self.coefficients.len()
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|w| !w.is_finite()) {
            return incompatible("non-finite weights".into());
        }
        Ok(())
    }
}

/// Logistic regression over the encoded record.
pub struct PipelineClassifier {
    artifact: PipelineArtifact,
    info: ModelInfo,
}

impl std::fmt::Debug for PipelineClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineClassifier")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl PipelineClassifier {
    /// Read, verify, and fingerprint the artifact at `path`.
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        if !path.exists() {
            return Err(ClassifierError::ModelNotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        let artifact: PipelineArtifact = serde_json::from_slice(&bytes)?;
        let classifier = Self::from_artifact(artifact, fingerprint(&bytes))?;

        tracing::info!(
            path = %path.display(),
            name = %classifier.info.name,
            version = %classifier.info.version,
            fingerprint = %classifier.info.fingerprint,
            "Pipeline classifier loaded"
        );
        Ok(classifier)
    }

    pub fn from_artifact(
        artifact: PipelineArtifact,
        fingerprint: String,
    ) -> Result<Self, ClassifierError> {
        artifact.check()?;
        let info = ModelInfo {
            name: artifact.name.clone(),
            version: artifact.version.clone(),
            kind: "logistic_pipeline",
            fingerprint,
        };
        Ok(Self { artifact, info })
    }

    /// Scaled numeric columns followed by one-hot categorical columns.
    pub fn encode(&self, record: &PatientRecord) -> Result<Vec<f64>, ClassifierError> {
        let mut encoded = Vec::with_capacity(self.artifact.encoded_width());

        for col in &self.artifact.numeric {
            match record.feature(&col.column) {
                Some(FeatureValue::Numeric(v)) => encoded.push((v - col.mean) / col.scale),
                _ => {
                    return Err(ClassifierError::Inference(format!(
                        "column {:?} is not numeric",
                        col.column
                    )))
                }
            }
        }
        for col in &self.artifact.categorical {
            match record.feature(&col.column) {
                Some(FeatureValue::Category(level)) => {
                    encoded.extend(col.levels.iter().map(|l| if l == level { 1.0 } else { 0.0 }))
                }
                _ => {
                    return Err(ClassifierError::Inference(format!(
                        "column {:?} is not categorical",
                        col.column
                    )))
                }
            }
        }
        Ok(encoded)
    }

    /// Positive-class probability.
    pub fn probability(&self, record: &PatientRecord) -> Result<f64, ClassifierError> {
        let x = self.encode(record)?;
        let z = self.artifact.intercept
            + x.iter()
                .zip(&self.artifact.coefficients)
                .map(|(xi, wi)| xi * wi)
                .sum::<f64>();
        Ok(sigmoid(z))
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl RiskClassifier for PipelineClassifier {
    fn predict(&self, record: &PatientRecord) -> Result<Prediction, ClassifierError> {
        let p = self.probability(record)?;
        Ok(Prediction::from_probability(p, self.artifact.threshold))
    }

    fn info(&self) -> &ModelInfo {
        &self.info
    }
}
