// src/pipeline/recorder.rs

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, types::Json};

use crate::models::submission::SubmissionRecord;

/// Persistence failures. Never retried by the pipeline.
#[derive(Debug)]
pub enum StorageError {
    /// The store could not be reached (pool exhausted, connection dropped, ...).
    Unavailable(String),
    /// The store was reached but refused the write.
    Rejected(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {}", msg),
            StorageError::Rejected(msg) => write!(f, "storage rejected write: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => StorageError::Rejected(db.to_string()),
            other => StorageError::Unavailable(other.to_string()),
        }
    }
}

/// Append-only store for graded submissions.
#[async_trait]
pub trait SubmissionRecorder: Send + Sync {
    /// Appends one record. `created_at` is assigned by the store.
    async fn record(
        &self,
        email: &str,
        answers: &[Value],
        correct_count: usize,
    ) -> Result<SubmissionRecord, StorageError>;
}

/// Postgres-backed recorder writing to the `submissions` table.
#[derive(Clone)]
pub struct PgSubmissionRecorder {
    pool: PgPool,
}

impl PgSubmissionRecorder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionRecorder for PgSubmissionRecorder {
    async fn record(
        &self,
        email: &str,
        answers: &[Value],
        correct_count: usize,
    ) -> Result<SubmissionRecord, StorageError> {
        let score = i32::try_from(correct_count)
            .map_err(|_| StorageError::Rejected(format!("score {} out of range", correct_count)))?;

        let record = sqlx::query_as::<_, SubmissionRecord>(
            r#"
            INSERT INTO submissions (email, answers, score)
            VALUES ($1, $2, $3)
            RETURNING id, email, answers, score, created_at
            "#,
        )
        .bind(email)
        .bind(Json(answers.to_vec()))
        .bind(score)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }
}
