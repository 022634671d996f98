// src/ai/prompts.rs

use super::AnalysisInput;

/// Prompt for generating scenario-based multiple choice questions.
/// The expected output shape matches `GeneratedQuestion`.
pub fn generation_prompt(category: &str, difficulty: &str, count: u32) -> String {
    format!(
        r#"Generate {count} ethical scenario-based multiple choice questions for employee ethics testing.

Category focus: {category}
Difficulty: {difficulty}

Each question MUST follow this exact JSON format. Return ONLY a JSON array, no extra text:
[
  {{
    "questionText": "Clear ethical dilemma question",
    "scenario": "A detailed workplace scenario (2-3 sentences) describing an ethical situation",
    "options": [
      {{"id": "a", "text": "Option text"}},
      {{"id": "b", "text": "Option text"}},
      {{"id": "c", "text": "Option text"}},
      {{"id": "d", "text": "Option text"}}
    ],
    "correctAnswer": "a",
    "category": "Integrity",
    "explanation": "Why this answer is the most ethical choice",
    "difficulty": 3
  }}
]

Ethics dimensions:
- Integrity: Honesty, moral principles, doing the right thing
- Fairness: Equitable treatment, unbiased decisions
- Accountability: Taking responsibility, owning consequences
- Transparency: Open communication, honesty about processes
- Respect: Dignity, inclusivity, valuing others

Make scenarios realistic workplace situations. Vary categories across: Integrity, Fairness, Accountability, Transparency, Respect."#
    )
}

/// System prompt for the per-question cognitive analysis of a scored
/// attempt. The expected output shape matches `AiAnalysis`.
pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an expert assessment analyst. Analyze a test submission with detailed per-question cognitive analysis.

The user selected specific options and may have written justifications explaining their reasoning. Analyze:
1. WHY they chose what they chose (based on their justification and the option selected)
2. What their choice reveals about their thinking patterns
3. Where their reasoning was strong vs where it had gaps

Return ONLY valid JSON with this structure:
{
  "overallScore": number,
  "summary": "2-3 sentence personalized overview of this person's performance and cognitive patterns",
  "strengths": ["3 specific strengths based on their actual answers and reasoning"],
  "improvements": ["3 specific, actionable improvement areas"],
  "cognitiveProfile": "A paragraph describing this person's thinking style, decision-making patterns, and reasoning approach based on their answers and justifications",
  "riskLevel": "low" | "medium" | "high",
  "perQuestionAnalysis": [
    {
      "questionNumber": number,
      "verdict": "correct" | "incorrect" | "partially_understood",
      "feedback": "1-2 sentence personalized feedback about why they chose what they chose and what this reveals",
      "recommendedReading": "optional brief suggestion for improvement"
    }
  ]
}
Return ONLY the JSON. No markdown, no extra text."#;

/// User prompt carrying the full per-question detail of a scored attempt.
pub fn analysis_user_prompt(input: &AnalysisInput<'_>) -> String {
    let scored = input.scored;
    let details = scored
        .answers
        .iter()
        .map(|a| {
            format!(
                "Q{}: \"{}\"\n  Selected: {} - \"{}\"\n  Correct: {} - \"{}\"\n  Result: {}\n  User's Justification: \"{}\"\n  Topic: {}",
                a.question_number,
                a.question_text,
                a.selected_answer.to_uppercase(),
                a.selected_option_text,
                a.correct_answer.to_uppercase(),
                a.correct_option_text,
                if a.is_correct { "CORRECT" } else { "INCORRECT" },
                a.justification.as_deref().unwrap_or("No justification provided"),
                a.category
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Test: \"{}\"\nScore: {}% ({}/{})\n\nDetailed Answers:\n{}",
        input.test_title,
        scored.overall_score,
        scored.correct_count,
        scored.total_questions,
        details
    )
}
