// src/models/analysis.rs

use serde::{Deserialize, Serialize};

/// Qualitative analysis of a completed attempt, either produced by the AI
/// adapter or by the deterministic fallback. Persisted as the attempt's
/// `ai_analysis` JSON payload, so the field names are part of the stored
/// format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    pub overall_score: i64,
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub cognitive_profile: String,
    pub risk_level: RiskLevel,
    pub per_question_analysis: Vec<QuestionFeedback>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionFeedback {
    pub question_number: i64,
    pub verdict: Verdict,
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_reading: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    PartiallyUnderstood,
}
