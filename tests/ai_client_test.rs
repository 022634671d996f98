// tests/ai_client_test.rs

use std::collections::HashMap;

use ethos::ai::{AiError, AiProvider, AnalysisInput, GenerationRequest, GroqClient};
use ethos::config::Config;
use ethos::models::analysis::RiskLevel;
use ethos::scoring::{ScoredAnswer, ScoredAttempt};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        groq_api_key: "test_key".to_string(),
        groq_base_url: server.uri(),
        groq_model: "test-model".to_string(),
        ai_timeout_secs: 5,
        rust_log: "error".to_string(),
    }
}

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

fn scored_attempt() -> ScoredAttempt {
    ScoredAttempt {
        correct_count: 1,
        total_questions: 2,
        overall_score: 50,
        answers: vec![
            ScoredAnswer {
                question_id: "q1".to_string(),
                question_number: 1,
                question_text: "What do you do?".to_string(),
                scenario: None,
                selected_answer: "a".to_string(),
                selected_option_text: "Refuse and escalate".to_string(),
                correct_answer: "a".to_string(),
                correct_option_text: "Refuse and escalate".to_string(),
                is_correct: true,
                justification: Some("it keeps the record honest".to_string()),
                category: "Integrity".to_string(),
            },
            ScoredAnswer {
                question_id: "q2".to_string(),
                question_number: 2,
                question_text: "Who do you tell?".to_string(),
                scenario: None,
                selected_answer: "b".to_string(),
                selected_option_text: "Nobody".to_string(),
                correct_answer: "c".to_string(),
                correct_option_text: "Your manager".to_string(),
                is_correct: false,
                justification: None,
                category: "Transparency".to_string(),
            },
        ],
        category_tallies: HashMap::new(),
    }
}

#[tokio::test]
async fn analyze_attempt_strips_markdown_fences() {
    let server = MockServer::start().await;

    let fenced = "```json\n{\n  \"overallScore\": 50,\n  \"summary\": \"Mixed performance.\",\n  \"strengths\": [\"s1\", \"s2\", \"s3\"],\n  \"improvements\": [\"i1\", \"i2\", \"i3\"],\n  \"cognitiveProfile\": \"Cautious reasoning.\",\n  \"riskLevel\": \"medium\",\n  \"perQuestionAnalysis\": [\n    {\"questionNumber\": 1, \"verdict\": \"correct\", \"feedback\": \"Good call.\"},\n    {\"questionNumber\": 2, \"verdict\": \"incorrect\", \"feedback\": \"Escalation was expected.\", \"recommendedReading\": \"Escalation policy\"}\n  ]\n}\n```";

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(fenced)))
        .expect(1)
        .mount(&server)
        .await;

    let client = GroqClient::new(&config_for(&server)).unwrap();
    let scored = scored_attempt();
    let analysis = client
        .analyze_attempt(&AnalysisInput {
            test_title: "Workplace Ethics Fundamentals",
            scored: &scored,
        })
        .await
        .expect("fenced JSON should parse");

    assert_eq!(analysis.overall_score, 50);
    assert_eq!(analysis.risk_level, RiskLevel::Medium);
    assert_eq!(analysis.per_question_analysis.len(), 2);
    assert_eq!(
        analysis.per_question_analysis[1].recommended_reading.as_deref(),
        Some("Escalation policy")
    );
}

#[tokio::test]
async fn analyze_attempt_rejects_prose() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("I'm sorry, I can't help with that.")),
        )
        .mount(&server)
        .await;

    let client = GroqClient::new(&config_for(&server)).unwrap();
    let scored = scored_attempt();
    let result = client
        .analyze_attempt(&AnalysisInput {
            test_title: "Workplace Ethics Fundamentals",
            scored: &scored,
        })
        .await;

    assert!(matches!(result, Err(AiError::InvalidResponse { .. })));
}

#[tokio::test]
async fn generate_questions_accepts_object_with_questions_key() {
    let server = MockServer::start().await;

    let content = r#"{"questions": [
        {
            "questionText": "A vendor offers you tickets. What do you do?",
            "scenario": "The vendor is bidding on a contract you influence.",
            "options": [
                {"id": "a", "text": "Decline politely"},
                {"id": "b", "text": "Accept quietly"},
                {"id": "c", "text": "Accept and disclose later"},
                {"id": "d", "text": "Ask for cash instead"}
            ],
            "correctAnswer": "a",
            "category": "Integrity",
            "explanation": "Declining avoids a conflict of interest.",
            "difficulty": 2
        }
    ]}"#;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .mount(&server)
        .await;

    let client = GroqClient::new(&config_for(&server)).unwrap();
    let request = GenerationRequest::new("Integrity".to_string(), "Medium".to_string(), 5);
    let questions = client.generate_questions(&request).await.unwrap();

    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].correct_answer, "a");
    assert_eq!(questions[0].options.len(), 4);
}

#[tokio::test]
async fn upstream_error_status_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = GroqClient::new(&config_for(&server)).unwrap();
    let request = GenerationRequest::new("Integrity".to_string(), "Medium".to_string(), 5);
    let result = client.generate_questions(&request).await;

    match result {
        Err(AiError::Api { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected Api error, got {:?}", other.map(|q| q.len())),
    }
}
