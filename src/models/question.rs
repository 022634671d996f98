// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,

    pub test_id: String,

    /// The text content of the question.
    pub question_text: String,

    /// Workplace scenario the question is set in, if any.
    pub scenario: Option<String>,

    /// The four answer options, stored as a JSON array in the database.
    pub options: Json<Vec<AnswerOption>>,

    /// Option id ('a'..'d') of the correct answer.
    /// Invariant: always matches one of the option ids.
    pub correct_answer: String,

    /// Topic label: one of the five ethical dimensions, or free-form.
    pub category: String,

    /// Explanation of why the correct answer is correct.
    pub explanation: Option<String>,

    /// Difficulty 1-5.
    pub difficulty: i64,

    pub order_index: i64,
}

/// A single answer option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
}

/// A candidate question as produced by the generation adapter.
/// Also the shape accepted when publishing a test, before it gets an id
/// and an order index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question_text: String,
    #[serde(default)]
    pub scenario: Option<String>,
    pub options: Vec<AnswerOption>,
    pub correct_answer: String,
    pub category: String,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub difficulty: Option<i64>,
}

impl GeneratedQuestion {
    /// Structural validation: exactly four options with non-empty unique ids,
    /// and a correct answer that matches one of them.
    pub fn validate_shape(&self) -> Result<(), String> {
        if self.options.len() != 4 {
            return Err(format!("expected 4 options, got {}", self.options.len()));
        }
        for (i, opt) in self.options.iter().enumerate() {
            if opt.id.trim().is_empty() {
                return Err(format!("option {} has an empty id", i + 1));
            }
            if self.options[..i].iter().any(|prev| prev.id == opt.id) {
                return Err(format!("duplicate option id '{}'", opt.id));
            }
        }
        if !self.options.iter().any(|opt| opt.id == self.correct_answer) {
            return Err(format!(
                "correct answer '{}' does not match any option id",
                self.correct_answer
            ));
        }
        Ok(())
    }
}
