// src/models/question.rs

use std::{collections::HashSet, fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

/// A question prompt or a choice: either inline text or a path to an image.
///
/// Serialized externally tagged, e.g. `{"image": "images/problem1.png"}` or `{"text": "42"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Content {
    Text(String),
    Image(String),
}

/// A single multiple-choice question of the answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    pub prompt: Content,

    /// Ordered choices. The position of a choice is its identifier.
    pub choices: Vec<Content>,

    pub correct_index: usize,
}

impl Question {
    /// The choice at `correct_index`.
    ///
    /// Only call on questions owned by an [`AnswerKey`], which guarantees the index is in range.
    pub fn correct_choice(&self) -> &Content {
        &self.choices[self.correct_index]
    }
}

/// Reasons an answer key is rejected at load time.
#[derive(Debug)]
pub enum AnswerKeyError {
    Empty,
    InvalidId(i64),
    DuplicateId(i64),
    TooFewChoices { id: i64, count: usize },
    CorrectIndexOutOfRange { id: i64, index: usize, choices: usize },
    Io(String),
    Parse(String),
}

impl fmt::Display for AnswerKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerKeyError::Empty => write!(f, "answer key has no questions"),
            AnswerKeyError::InvalidId(id) => write!(f, "question id {} is not positive", id),
            AnswerKeyError::DuplicateId(id) => write!(f, "question id {} appears more than once", id),
            AnswerKeyError::TooFewChoices { id, count } => {
                write!(f, "question {} has {} choices, at least 2 required", id, count)
            }
            AnswerKeyError::CorrectIndexOutOfRange { id, index, choices } => write!(
                f,
                "question {} marks choice {} as correct but only has {} choices",
                id, index, choices
            ),
            AnswerKeyError::Io(msg) => write!(f, "failed to read answer key: {}", msg),
            AnswerKeyError::Parse(msg) => write!(f, "failed to parse answer key: {}", msg),
        }
    }
}

impl std::error::Error for AnswerKeyError {}

/// Ordered, validated, read-only catalog of questions.
///
/// Built once at startup and shared behind an `Arc`; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKey {
    questions: Vec<Question>,
}

impl AnswerKey {
    /// Validates and wraps `questions`, keeping their order.
    pub fn new(questions: Vec<Question>) -> Result<Self, AnswerKeyError> {
        if questions.is_empty() {
            return Err(AnswerKeyError::Empty);
        }

        let mut seen = HashSet::new();
        for q in &questions {
            if q.id <= 0 {
                return Err(AnswerKeyError::InvalidId(q.id));
            }
            if !seen.insert(q.id) {
                return Err(AnswerKeyError::DuplicateId(q.id));
            }
            if q.choices.len() < 2 {
                return Err(AnswerKeyError::TooFewChoices {
                    id: q.id,
                    count: q.choices.len(),
                });
            }
            if q.correct_index >= q.choices.len() {
                return Err(AnswerKeyError::CorrectIndexOutOfRange {
                    id: q.id,
                    index: q.correct_index,
                    choices: q.choices.len(),
                });
            }
        }

        Ok(Self { questions })
    }

    /// Parses a JSON array of questions.
    pub fn from_json(raw: &str) -> Result<Self, AnswerKeyError> {
        let questions: Vec<Question> =
            serde_json::from_str(raw).map_err(|e| AnswerKeyError::Parse(e.to_string()))?;
        Self::new(questions)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnswerKeyError> {
        let raw = fs::read_to_string(path).map_err(|e| AnswerKeyError::Io(e.to_string()))?;
        Self::from_json(&raw)
    }

    /// The three-question image quiz shipped with the service.
    pub fn builtin() -> Self {
        let choices: Vec<Content> = (1..=5)
            .map(|n| Content::Image(format!("images/answer1-{}.png", n)))
            .collect();

        let questions = (1..=3)
            .map(|id| Question {
                id,
                prompt: Content::Image(format!("images/problem{}.png", id)),
                choices: choices.clone(),
                correct_index: 0,
            })
            .collect();

        Self { questions }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
