// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

use crate::models::analysis::AiAnalysis;
use crate::models::question::AnswerOption;

/// An attempt row joined with its user and test, as returned by the
/// attempts listing and detail endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSummary {
    pub id: String,
    pub score: Option<i64>,
    pub status: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub total_time_taken: Option<i64>,
    pub ai_analysis: Option<Json<AiAnalysis>>,
    pub user_name: String,
    pub user_email: String,
    pub user_department: String,
    pub test_id: String,
    pub test_title: String,
    pub test_category: String,
}

/// An answer row joined with its question, for the attempt detail view.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDetail {
    pub id: String,
    pub selected_answer: String,
    pub is_correct: bool,
    pub justification: Option<String>,
    pub question_text: String,
    pub scenario: Option<String>,
    pub options: Json<Vec<AnswerOption>>,
    pub correct_answer: String,
    pub category: String,
    pub explanation: Option<String>,
}

/// Represents the 'ethics_scores' table: the per-dimension profile of one
/// completed attempt, used for the spider chart.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EthicsScores {
    pub id: String,
    pub user_id: String,
    pub attempt_id: String,
    pub integrity: i64,
    pub fairness: i64,
    pub accountability: i64,
    pub transparency: i64,
    pub respect: i64,
    pub overall_score: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for submitting a test attempt.
/// Missing ids deserialize to empty strings and are rejected by validation,
/// so a malformed body surfaces as a 400 rather than a deserialization error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptRequest {
    #[serde(default)]
    pub test_id: String,
    #[serde(default)]
    pub user_id: String,

    /// One entry per question, in question order. Shorter lists are allowed;
    /// questions without an entry are scored as unanswered.
    #[serde(default)]
    pub answers: Vec<SubmittedAnswer>,

    /// Total time taken in seconds.
    #[serde(default)]
    pub time_taken: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    /// Selected option id; empty string when unanswered.
    #[serde(default)]
    pub selected_answer: String,

    /// Optional free-text reasoning for the choice.
    #[serde(default)]
    pub justification: String,
}
