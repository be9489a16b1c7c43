use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::llm_interface::{LLMInterface, MAX_TOKENS, TEMPERATURE};
use crate::error::ChatError;
use crate::prompt::{AssembledPrompt, PromptMessage, PromptStyle};

pub const OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Same bound the official OpenAI SDKs apply by default
pub const OPENAI_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// OpenAI chat completion backend
/// Sends the structured message list and returns the first choice
pub struct OpenAILLM {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAILLM {
    pub fn new(base_url: String, api_key: String) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, api_key, OPENAI_TIMEOUT)
    }

    pub fn with_timeout(base_url: String, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.trim_end_matches('/').to_string();
        info!(
            "Initialized OpenAILLM: model={}, base_url={}, timeout={:?}",
            OPENAI_MODEL, base_url, timeout
        );
        Ok(Self {
            client,
            base_url,
            api_key,
            model: OPENAI_MODEL.to_string(),
        })
    }

    async fn chat_completion(&self, messages: &[PromptMessage]) -> Result<String, ChatError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        debug!("OpenAI request: {} messages to {}", messages.len(), url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::Backend(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(ChatError::Backend(format!(
                "OpenAI returned {}: {}",
                status, detail
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Backend(format!("Invalid OpenAI response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ChatError::Backend("OpenAI response contained no choices".to_string()))
    }
}

#[async_trait]
impl LLMInterface for OpenAILLM {
    fn name(&self) -> &str {
        "openai"
    }

    fn prompt_style(&self) -> PromptStyle {
        PromptStyle::Messages
    }

    async fn generate(&self, prompt: &AssembledPrompt) -> Result<String, ChatError> {
        match prompt {
            AssembledPrompt::Messages(messages) => self.chat_completion(messages).await,
            AssembledPrompt::Text(_) => Err(ChatError::Backend(
                "OpenAI backend requires a message list prompt".to_string(),
            )),
        }
    }
}
