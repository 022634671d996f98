// src/scoring.rs

use std::collections::HashMap;

use crate::models::analysis::{AiAnalysis, QuestionFeedback, RiskLevel, Verdict};
use crate::models::attempt::SubmittedAnswer;
use crate::models::question::Question;

/// Running {correct, total} tally for one question category.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryTally {
    pub correct: u32,
    pub total: u32,
}

/// One scored question with everything the analysis adapter and the answer
/// rows need: selected vs correct option text, correctness, justification.
#[derive(Debug, Clone)]
pub struct ScoredAnswer {
    pub question_id: String,
    pub question_number: u32,
    pub question_text: String,
    pub scenario: Option<String>,
    pub selected_answer: String,
    pub selected_option_text: String,
    pub correct_answer: String,
    pub correct_option_text: String,
    pub is_correct: bool,
    pub justification: Option<String>,
    pub category: String,
}

/// The fully scored submission, computed in memory before anything is
/// persisted.
#[derive(Debug, Clone)]
pub struct ScoredAttempt {
    pub correct_count: u32,
    pub total_questions: u32,
    pub overall_score: i64,
    pub answers: Vec<ScoredAnswer>,
    pub category_tallies: HashMap<String, CategoryTally>,
}

/// Per-dimension scores for the spider chart profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionScores {
    pub integrity: i64,
    pub fairness: i64,
    pub accountability: i64,
    pub transparency: i64,
    pub respect: i64,
}

/// Rounded percentage in [0, 100]. Callers guarantee `total > 0`.
pub fn percentage(correct: u32, total: u32) -> i64 {
    ((correct as f64 / total as f64) * 100.0).round() as i64
}

/// Scores a submission against the test's answer keys.
///
/// Answers are matched to questions by position. A missing or empty
/// selection is always scored incorrect; the id comparison is
/// case-sensitive. Whitespace-only justifications are normalized to None.
pub fn score_attempt(questions: &[Question], answers: &[SubmittedAnswer]) -> ScoredAttempt {
    let mut correct_count = 0u32;
    let mut category_tallies: HashMap<String, CategoryTally> = HashMap::new();
    let mut scored = Vec::with_capacity(questions.len());

    for (i, question) in questions.iter().enumerate() {
        let submitted = answers.get(i).cloned().unwrap_or_default();
        let selected = submitted.selected_answer;
        let is_correct = selected == question.correct_answer;
        if is_correct {
            correct_count += 1;
        }

        let tally = category_tallies.entry(question.category.clone()).or_default();
        tally.total += 1;
        if is_correct {
            tally.correct += 1;
        }

        let justification = match submitted.justification.trim() {
            "" => None,
            text => Some(text.to_string()),
        };

        scored.push(ScoredAnswer {
            question_id: question.id.clone(),
            question_number: (i + 1) as u32,
            question_text: question.question_text.clone(),
            scenario: question.scenario.clone(),
            selected_option_text: option_text(question, &selected),
            correct_option_text: option_text(question, &question.correct_answer),
            correct_answer: question.correct_answer.clone(),
            selected_answer: selected,
            is_correct,
            justification,
            category: question.category.clone(),
        });
    }

    let total_questions = questions.len() as u32;
    ScoredAttempt {
        correct_count,
        total_questions,
        overall_score: percentage(correct_count, total_questions),
        answers: scored,
        category_tallies,
    }
}

/// Resolves an option id to its text, falling back to the raw id when it
/// matches no option (including the empty unanswered id).
fn option_text(question: &Question, option_id: &str) -> String {
    question
        .options
        .iter()
        .find(|opt| opt.id == option_id)
        .map(|opt| opt.text.clone())
        .unwrap_or_else(|| option_id.to_string())
}

/// Maps category tallies onto the five canonical dimensions.
///
/// A dimension whose category has no questions in the test defaults to the
/// overall score, so the profile never shows a spuriously low value for
/// topics the test did not cover. An earned zero (all questions of a mapped
/// category answered wrong) is kept as zero.
pub fn dimension_scores(
    tallies: &HashMap<String, CategoryTally>,
    overall_score: i64,
) -> DimensionScores {
    let dim = |label: &str| match tallies.get(label) {
        Some(tally) if tally.total > 0 => percentage(tally.correct, tally.total),
        _ => overall_score,
    };

    DimensionScores {
        integrity: dim("Integrity"),
        fairness: dim("Fairness"),
        accountability: dim("Accountability"),
        transparency: dim("Transparency"),
        respect: dim("Respect"),
    }
}

/// Risk banding used by the fallback analysis.
pub fn risk_level_for(score: i64) -> RiskLevel {
    if score >= 80 {
        RiskLevel::Low
    } else if score >= 60 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Deterministic analysis built purely from the computed scoring data.
/// Substituted whenever the AI analysis call fails, so every completed
/// attempt always carries a non-null analysis payload.
pub fn fallback_analysis(scored: &ScoredAttempt) -> AiAnalysis {
    AiAnalysis {
        overall_score: scored.overall_score,
        summary: format!(
            "Scored {}% with {}/{} correct answers.",
            scored.overall_score, scored.correct_count, scored.total_questions
        ),
        strengths: vec![
            "Completed the assessment".to_string(),
            "Demonstrated engagement".to_string(),
            "Answered all questions".to_string(),
        ],
        improvements: vec![
            "Review incorrect answers".to_string(),
            "Practice reasoning skills".to_string(),
            "Study key concepts".to_string(),
        ],
        cognitive_profile: "Analysis could not be generated automatically.".to_string(),
        risk_level: risk_level_for(scored.overall_score),
        per_question_analysis: scored
            .answers
            .iter()
            .map(|answer| QuestionFeedback {
                question_number: answer.question_number as i64,
                verdict: if answer.is_correct {
                    Verdict::Correct
                } else {
                    Verdict::Incorrect
                },
                feedback: if answer.is_correct {
                    "Answered correctly.".to_string()
                } else {
                    format!(
                        "Selected \"{}\" instead of \"{}\".",
                        answer.selected_option_text, answer.correct_option_text
                    )
                },
                recommended_reading: None,
            })
            .collect(),
    }
}
