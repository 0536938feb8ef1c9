//! OpenAI-compatible chat-completions client.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::NarrativeConfig;
use crate::error::AppError;
use crate::narrative::NarrativeService;

const API_URL: &str = "https://api.openai.com/v1/chat/completions";
const SYSTEM_PROMPT: &str =
    "You are a senior business analyst specializing in automotive sales.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
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
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}

/// Blocking client for the narrative service.
///
/// Errors here are reported but never fatal: the caller falls back to the
/// mock generator.
pub struct OpenAiNarrative {
    client: Client,
    config: NarrativeConfig,
}

impl OpenAiNarrative {
    pub fn new(config: NarrativeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

impl NarrativeService for OpenAiNarrative {
    fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::input("Missing OPENAI_API_KEY in environment (.env)."))?;

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(API_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|e| AppError::input(format!("Narrative service request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::input(format!(
                "Narrative service returned HTTP {status}."
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| AppError::input(format!("Invalid narrative service response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::input("Narrative service returned no choices."))
    }
}
