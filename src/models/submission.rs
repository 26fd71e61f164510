// src/models/submission.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, types::Json};
use validator::Validate;

/// One submitted answer slot, normalized.
///
/// A slot is `Selected` only when it holds a non-negative whole number; an integral float
/// such as `2.0` selects choice 2. `null`, negatives, fractions, strings and slots past the
/// end of the submitted list are `Absent`. A selected index the question does not have
/// simply never matches the correct index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Selected(usize),
    Absent,
}

impl From<Option<i64>> for Answer {
    fn from(slot: Option<i64>) -> Self {
        match slot.and_then(|v| usize::try_from(v).ok()) {
            Some(index) => Answer::Selected(index),
            None => Answer::Absent,
        }
    }
}

impl From<&Value> for Answer {
    fn from(slot: &Value) -> Self {
        let Value::Number(n) = slot else {
            return Answer::Absent;
        };

        if let Some(v) = n.as_u64() {
            return usize::try_from(v).map_or(Answer::Absent, Answer::Selected);
        }

        match n.as_f64() {
            Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => {
                Answer::Selected(f as usize)
            }
            _ => Answer::Absent,
        }
    }
}

impl Answer {
    pub fn from_slots(slots: &[Value]) -> Vec<Answer> {
        slots.iter().map(Answer::from).collect()
    }
}

/// DTO for submitting quiz answers.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitRequest {
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,

    /// Selected choice index per question, by position.
    /// Example: `[0, 3, 2]`. Slots are kept as raw JSON so any value is accepted and stored.
    #[serde(default)]
    pub answers: Vec<Value>,
}

/// DTO returned once the submission is graded, stored and mailed.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub message: String,

    /// Number of correctly answered questions.
    pub score: usize,

    #[serde(rename = "bandedScore")]
    pub banded_score: u32,
}

/// Represents the 'submissions' table in the database.
/// Append-only; rows are never updated or deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubmissionRecord {
    pub id: i64,
    pub email: String,

    /// Verbatim copy of the submitted answers.
    pub answers: Json<Vec<Value>>,

    /// Correct count at the time of submission.
    pub score: i32,

    pub created_at: chrono::DateTime<chrono::Utc>,
}
