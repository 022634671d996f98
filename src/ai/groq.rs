// src/ai/groq.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{
    AiError, AiProvider, AnalysisInput, GenerationRequest, parse_analysis,
    parse_generated_questions, prompts,
};
use crate::config::Config;
use crate::models::analysis::AiAnalysis;
use crate::models::question::GeneratedQuestion;

/// Client for an OpenAI-compatible chat completions API (Groq).
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl GroqClient {
    pub fn new(config: &Config) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.ai_timeout_secs))
            .build()
            .map_err(AiError::Http)?;

        Ok(Self {
            client,
            base_url: config.groq_base_url.trim_end_matches('/').to_string(),
            api_key: config.groq_api_key.clone(),
            model: config.groq_model.clone(),
            timeout_secs: config.ai_timeout_secs,
        })
    }

    /// One blocking chat completion call; returns the first choice's content.
    async fn chat(
        &self,
        messages: Vec<ChatMessage<'_>>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, AiError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout {
                        timeout_secs: self.timeout_secs,
                    }
                } else {
                    AiError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Chat completion request failed");
            return Err(AiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| AiError::InvalidResponse {
            message: format!("failed to parse completion response: {}", e),
        })?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AiError::InvalidResponse {
                message: "completion had no content".to_string(),
            })
    }
}

#[async_trait]
impl AiProvider for GroqClient {
    async fn generate_questions(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<GeneratedQuestion>, AiError> {
        debug!(
            category = %request.category,
            difficulty = %request.difficulty,
            count = request.count,
            "Generating questions"
        );

        let prompt = prompts::generation_prompt(&request.category, &request.difficulty, request.count);
        let content = self
            .chat(
                vec![ChatMessage {
                    role: "user",
                    content: &prompt,
                }],
                0.7,
                4000,
            )
            .await?;

        let questions = parse_generated_questions(&content)?;
        info!(count = questions.len(), "Question generation succeeded");
        Ok(questions)
    }

    async fn analyze_attempt(&self, input: &AnalysisInput<'_>) -> Result<AiAnalysis, AiError> {
        debug!(
            test = %input.test_title,
            questions = input.scored.total_questions,
            "Requesting attempt analysis"
        );

        let user_prompt = prompts::analysis_user_prompt(input);
        let content = self
            .chat(
                vec![
                    ChatMessage {
                        role: "system",
                        content: prompts::ANALYSIS_SYSTEM_PROMPT,
                    },
                    ChatMessage {
                        role: "user",
                        content: &user_prompt,
                    },
                ],
                0.4,
                4000,
            )
            .await?;

        parse_analysis(&content)
    }
}
