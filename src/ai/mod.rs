// src/ai/mod.rs

pub mod groq;
pub mod prompts;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::analysis::AiAnalysis;
use crate::models::question::GeneratedQuestion;
use crate::scoring::ScoredAttempt;

pub use groq::GroqClient;

/// Errors from the external text-generation service.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("AI request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid AI response: {message}")]
    InvalidResponse { message: String },
}

/// Parameters for a question generation call. Count is clamped to the range
/// the generator behaves sanely for.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub category: String,
    pub difficulty: String,
    pub count: u32,
}

impl GenerationRequest {
    pub fn new(category: String, difficulty: String, count: u32) -> Self {
        Self {
            category,
            difficulty,
            count: count.clamp(3, 20),
        }
    }
}

/// Everything the analysis adapter needs about a scored submission.
#[derive(Debug)]
pub struct AnalysisInput<'a> {
    pub test_title: &'a str,
    pub scored: &'a ScoredAttempt,
}

/// Seam between the submission pipeline and the text-generation service.
/// The production implementation is [`GroqClient`]; tests substitute stubs.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Produce candidate questions for human review. Nothing is persisted.
    async fn generate_questions(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<GeneratedQuestion>, AiError>;

    /// Produce a qualitative analysis of a scored attempt. Callers fall back
    /// to `scoring::fallback_analysis` on any error.
    async fn analyze_attempt(&self, input: &AnalysisInput<'_>) -> Result<AiAnalysis, AiError>;
}

/// Strips markdown code fences the model often wraps JSON payloads in.
fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parses generator output into validated question candidates.
///
/// Accepts either a top-level JSON array or an object with a `questions`
/// key, with or without markdown fencing. Anything else is a parse failure
/// surfaced to the caller, never a silent empty list.
fn parse_generated_questions(raw: &str) -> Result<Vec<GeneratedQuestion>, AiError> {
    let cleaned = strip_code_fences(raw);
    let value: serde_json::Value =
        serde_json::from_str(&cleaned).map_err(|e| AiError::InvalidResponse {
            message: format!("generator returned invalid JSON: {}", e),
        })?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("questions") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                return Err(AiError::InvalidResponse {
                    message: "expected an array of questions".to_string(),
                });
            }
        },
        _ => {
            return Err(AiError::InvalidResponse {
                message: "expected an array of questions".to_string(),
            });
        }
    };

    if items.is_empty() {
        return Err(AiError::InvalidResponse {
            message: "generator returned no questions".to_string(),
        });
    }

    let mut questions = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let question: GeneratedQuestion =
            serde_json::from_value(item).map_err(|e| AiError::InvalidResponse {
                message: format!("question {}: {}", i + 1, e),
            })?;
        question
            .validate_shape()
            .map_err(|msg| AiError::InvalidResponse {
                message: format!("question {}: {}", i + 1, msg),
            })?;
        questions.push(question);
    }
    Ok(questions)
}

/// Parses analyzer output into the fixed-shape analysis record.
fn parse_analysis(raw: &str) -> Result<AiAnalysis, AiError> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(&cleaned).map_err(|e| AiError::InvalidResponse {
        message: format!("analysis payload did not match expected shape: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::RiskLevel;

    const QUESTION_ARRAY: &str = r#"[
        {
            "questionText": "A colleague asks you to backdate a report. What do you do?",
            "scenario": "Quarter close is tomorrow and the report is late.",
            "options": [
                {"id": "a", "text": "Refuse and escalate"},
                {"id": "b", "text": "Backdate it once"},
                {"id": "c", "text": "Ignore the request"},
                {"id": "d", "text": "Delegate the decision"}
            ],
            "correctAnswer": "a",
            "category": "Integrity",
            "explanation": "Escalation preserves the audit trail.",
            "difficulty": 3
        }
    ]"#;

    #[test]
    fn strips_fences_and_whitespace() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn parses_plain_question_array() {
        let questions = parse_generated_questions(QUESTION_ARRAY).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_answer, "a");
        assert_eq!(questions[0].options.len(), 4);
    }

    #[test]
    fn parses_fenced_question_array() {
        let fenced = format!("```json\n{}\n```", QUESTION_ARRAY);
        assert_eq!(parse_generated_questions(&fenced).unwrap().len(), 1);
    }

    #[test]
    fn parses_object_with_questions_key() {
        let wrapped = format!("{{\"questions\": {}}}", QUESTION_ARRAY);
        assert_eq!(parse_generated_questions(&wrapped).unwrap().len(), 1);
    }

    #[test]
    fn prose_is_a_parse_failure() {
        let err = parse_generated_questions("Here are some questions for you!").unwrap_err();
        assert!(matches!(err, AiError::InvalidResponse { .. }));
    }

    #[test]
    fn empty_array_is_a_parse_failure() {
        assert!(parse_generated_questions("[]").is_err());
    }

    #[test]
    fn invalid_correct_answer_is_rejected() {
        let bad = QUESTION_ARRAY.replace("\"correctAnswer\": \"a\"", "\"correctAnswer\": \"z\"");
        assert!(parse_generated_questions(&bad).is_err());
    }

    #[test]
    fn parses_fenced_analysis() {
        let payload = r#"```json
{
    "overallScore": 80,
    "summary": "Solid ethical judgement overall.",
    "strengths": ["s1", "s2", "s3"],
    "improvements": ["i1", "i2", "i3"],
    "cognitiveProfile": "Careful, rule-oriented reasoning.",
    "riskLevel": "low",
    "perQuestionAnalysis": [
        {"questionNumber": 1, "verdict": "correct", "feedback": "Good call."}
    ]
}
```"#;
        let analysis = parse_analysis(payload).unwrap();
        assert_eq!(analysis.overall_score, 80);
        assert_eq!(analysis.risk_level, RiskLevel::Low);
        assert_eq!(analysis.per_question_analysis.len(), 1);
        assert_eq!(analysis.per_question_analysis[0].recommended_reading, None);
    }

    #[test]
    fn truncated_analysis_is_a_parse_failure() {
        assert!(parse_analysis("{\"overallScore\": 80, \"summary\":").is_err());
    }

    #[test]
    fn generation_count_is_clamped() {
        let req = GenerationRequest::new("Integrity".into(), "Medium".into(), 100);
        assert_eq!(req.count, 20);
        let req = GenerationRequest::new("Integrity".into(), "Medium".into(), 0);
        assert_eq!(req.count, 3);
        let req = GenerationRequest::new("Integrity".into(), "Medium".into(), 5);
        assert_eq!(req.count, 5);
    }
}
