//! JSON prediction endpoint.
//!
//! - `POST /api/predict` — validate a patient, classify, annotate

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AssessmentResponse};
use crate::assessment::{self, Assessment};
use crate::models::{PatientInput, PatientRecord};

/// Validate `input`, logging only the names of rejected fields.
pub(crate) fn validate(input: &PatientInput) -> Result<PatientRecord, ApiError> {
    input.validate().map_err(|errors| {
        tracing::warn!(fields = ?errors.fields(), "Patient input rejected");
        ApiError::from(errors)
    })
}

/// Run one prediction cycle off the async executor.
pub(crate) async fn run_assessment(
    ctx: &ApiContext,
    record: PatientRecord,
) -> Result<(Uuid, Assessment), ApiError> {
    let classifier = ctx.classifier.clone();
    let assessment = tokio::task::spawn_blocking(move || {
        assessment::assess(classifier.as_ref(), &record)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("assessment task failed: {e}")))??;

    let id = Uuid::new_v4();
    tracing::info!(
        assessment_id = %id,
        label = assessment.prediction.label.label(),
        confidence = assessment.prediction.confidence,
        "Assessment completed"
    );
    Ok((id, assessment))
}

/// `POST /api/predict`
pub async fn predict(
    State(ctx): State<ApiContext>,
    payload: Result<Json<PatientInput>, JsonRejection>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let Json(input) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let record = validate(&input)?;
    let (id, assessment) = run_assessment(&ctx, record).await?;

    Ok(Json(AssessmentResponse::new(
        id,
        assessment,
        ctx.classifier.info().fingerprint.clone(),
    )))
}
