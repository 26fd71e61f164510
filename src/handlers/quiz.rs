// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{Json, extract::{State, rejection::JsonRejection}, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::submission::{SubmitRequest, SubmitResponse},
    pipeline::SubmissionPipeline,
};

/// Grades a quiz submission and mails the result report.
///
/// * Validates the email address.
/// * Scores the answers against the answer key (missing or invalid slots count as wrong).
/// * Stores the raw submission, then sends the report.
///
/// Any storage or delivery failure produces the same generic 500 response.
pub async fn submit_answers(
    State(pipeline): State<Arc<SubmissionPipeline>>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;

    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    tracing::info!("Submission received ({} answers)", req.answers.len());

    let outcome = pipeline.run(&req).await?;

    Ok(Json(SubmitResponse {
        message: "Your results have been emailed.".to_string(),
        score: outcome.result.correct_count,
        banded_score: outcome.result.banded_score,
    }))
}
