// src/grading/scoring.rs

use serde::Serialize;

use crate::{
    grading::band,
    models::{
        question::{AnswerKey, Content},
        submission::Answer,
    },
};

/// One incorrectly answered question, with what the submitter should have picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissRecord {
    /// 1-based position of the question in the key.
    pub question_number: usize,
    pub question_content: Content,
    pub correct_choice_content: Content,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringResult {
    pub correct_count: usize,

    /// Ascending by `question_number`, one entry per miss.
    pub miss_records: Vec<MissRecord>,

    pub banded_score: u32,
}

/// Grades `answers` position by position against `key`.
///
/// Positions past the end of `answers` count as [`Answer::Absent`]; extra answers beyond the
/// key are ignored. Never fails: every anomaly is a miss.
pub fn score(answers: &[Answer], key: &AnswerKey) -> ScoringResult {
    let mut correct_count = 0;
    let mut miss_records = Vec::new();

    for (i, question) in key.questions().iter().enumerate() {
        let answer = answers.get(i).copied().unwrap_or(Answer::Absent);

        if answer == Answer::Selected(question.correct_index) {
            correct_count += 1;
        } else {
            miss_records.push(MissRecord {
                question_number: i + 1,
                question_content: question.prompt.clone(),
                correct_choice_content: question.correct_choice().clone(),
            });
        }
    }

    ScoringResult {
        correct_count,
        banded_score: band(correct_count, key.len()),
        miss_records,
    }
}
