//! Shared types for the HTTP layer.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::assessment::{Assessment, PatientSummary};
use crate::classifier::{RiskClassifier, Verdict};
use crate::presenter;

/// Shared context for all routes: the classifier loaded at startup.
#[derive(Clone)]
pub struct ApiContext {
    pub classifier: Arc<dyn RiskClassifier>,
}

impl ApiContext {
    pub fn new(classifier: Arc<dyn RiskClassifier>) -> Self {
        Self { classifier }
    }
}

/// `POST /api/predict` response body.
#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub assessment_id: Uuid,
    pub assessed_at: String,
    pub label: Verdict,
    pub confidence: f64,
    pub headline: &'static str,
    pub confidence_display: String,
    pub summary: PatientSummary,
    pub risk_factors: Vec<String>,
    pub protective_factors: Vec<String>,
    pub recommendations: &'static [&'static str],
    pub caution: &'static str,
    pub model_fingerprint: String,
}

impl AssessmentResponse {
    pub fn new(assessment_id: Uuid, assessment: Assessment, model_fingerprint: String) -> Self {
        let verdict = assessment.prediction.label;
        Self {
            assessment_id,
            assessed_at: chrono::Utc::now().to_rfc3339(),
            label: verdict,
            confidence: assessment.prediction.confidence,
            headline: presenter::headline(verdict),
            confidence_display: presenter::format_confidence(assessment.prediction.confidence),
            summary: assessment.summary,
            risk_factors: assessment.annotation.risk_factors,
            protective_factors: assessment.annotation.protective_factors,
            recommendations: presenter::recommendations(verdict),
            caution: presenter::caution(verdict),
            model_fingerprint,
        }
    }
}
