// src/pipeline/mod.rs

//! Grade, persist, notify.
//!
//! Each stage is a separate method so callers and tests can drive them individually.
//! `run` executes them in order: a storage failure stops the pipeline before any mail
//! is sent, and a delivery failure leaves the stored record in place.

pub mod notifier;
pub mod recorder;

use std::{fmt, sync::Arc};

use serde_json::Value;

use crate::{
    grading::{ScoringResult, score},
    models::{
        question::AnswerKey,
        submission::{Answer, SubmissionRecord, SubmitRequest},
    },
    report::{self, ReportDocument},
    utils::media::MediaResolver,
};

use notifier::{DeliveryError, Notifier};
use recorder::{StorageError, SubmissionRecorder};

#[derive(Debug)]
pub enum PipelineError {
    /// Nothing was stored and nothing was sent.
    Storage(StorageError),

    /// The submission was stored as `record_id` but the report never went out.
    Delivery { record_id: i64, source: DeliveryError },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Storage(e) => write!(f, "failed to persist submission: {}", e),
            PipelineError::Delivery { record_id, source } => write!(
                f,
                "submission {} stored but report not delivered: {}",
                record_id, source
            ),
        }
    }
}

impl std::error::Error for PipelineError {}

/// What a fully successful submission produced.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub result: ScoringResult,
    pub record: SubmissionRecord,
    pub report: ReportDocument,
}

pub struct SubmissionPipeline {
    key: Arc<AnswerKey>,
    recorder: Arc<dyn SubmissionRecorder>,
    notifier: Arc<dyn Notifier>,
    media: MediaResolver,
}

impl SubmissionPipeline {
    pub fn new(
        key: Arc<AnswerKey>,
        recorder: Arc<dyn SubmissionRecorder>,
        notifier: Arc<dyn Notifier>,
        media: MediaResolver,
    ) -> Self {
        Self {
            key,
            recorder,
            notifier,
            media,
        }
    }

    /// Stage 1: score the raw answer slots.
    pub fn grade(&self, answers: &[Value]) -> ScoringResult {
        score(&Answer::from_slots(answers), &self.key)
    }

    /// Stage 2: append the submission to the store.
    pub async fn persist(
        &self,
        submission: &SubmitRequest,
        result: &ScoringResult,
    ) -> Result<SubmissionRecord, PipelineError> {
        self.recorder
            .record(&submission.email, &submission.answers, result.correct_count)
            .await
            .map_err(|e| {
                tracing::error!("Failed to record submission: {}", e);
                PipelineError::Storage(e)
            })
    }

    /// Stage 3: render the report and mail it to the submitter.
    pub async fn notify(
        &self,
        recipient: &str,
        result: &ScoringResult,
        record_id: i64,
    ) -> Result<ReportDocument, PipelineError> {
        let report = report::build(result, self.key.len(), &self.media);
        tracing::debug!("Rendered report for submission {}: {}", record_id, report.html);

        self.notifier
            .notify(recipient, &report)
            .await
            .map_err(|source| {
                tracing::warn!(
                    "Submission {} was stored but its report was not delivered: {}",
                    record_id,
                    source
                );
                PipelineError::Delivery { record_id, source }
            })?;

        Ok(report)
    }

    pub async fn run(&self, submission: &SubmitRequest) -> Result<SubmissionOutcome, PipelineError> {
        let result = self.grade(&submission.answers);
        let record = self.persist(submission, &result).await?;
        let report = self.notify(&submission.email, &result, record.id).await?;

        tracing::info!(
            "Submission {} graded {}/{} (banded {})",
            record.id,
            result.correct_count,
            self.key.len(),
            result.banded_score
        );

        Ok(SubmissionOutcome {
            result,
            record,
            report,
        })
    }
}
