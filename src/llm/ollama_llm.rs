use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::llm_interface::{LLMInterface, MAX_TOKENS, TEMPERATURE};
use crate::error::ChatError;
use crate::prompt::{AssembledPrompt, PromptStyle};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama2";
/// Local models can take a while to load on first use
pub const GENERATE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Ollama text generation backend
/// Sends one flattened prompt to `/api/generate` with streaming disabled
pub struct OllamaLLM {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaLLM {
    pub fn new(base_url: String, model: String) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, model, GENERATE_TIMEOUT)
    }

    pub fn with_timeout(base_url: String, model: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.trim_end_matches('/').to_string();
        info!(
            "Initialized OllamaLLM: model={}, base_url={}, timeout={:?}",
            model, base_url, timeout
        );
        Ok(Self {
            client,
            base_url,
            model,
        })
    }

    async fn complete(&self, prompt: &str) -> Result<String, ChatError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
                num_predict: MAX_TOKENS,
            },
        };
        debug!("Ollama request: {} prompt bytes to {}", prompt.len(), url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Backend(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response.json().await.map_err(transport_error)?;
        Ok(generated.response.trim().to_string())
    }
}

fn transport_error(err: reqwest::Error) -> ChatError {
    if err.is_timeout() {
        ChatError::Timeout(format!("Ollama request timed out: {}", err))
    } else {
        ChatError::Backend(format!("Ollama request failed: {}", err))
    }
}

#[async_trait]
impl LLMInterface for OllamaLLM {
    fn name(&self) -> &str {
        "ollama"
    }

    fn prompt_style(&self) -> PromptStyle {
        PromptStyle::Text
    }

    async fn generate(&self, prompt: &AssembledPrompt) -> Result<String, ChatError> {
        match prompt {
            AssembledPrompt::Text(text) => self.complete(text).await,
            AssembledPrompt::Messages(_) => Err(ChatError::Backend(
                "Ollama backend requires a flattened text prompt".to_string(),
            )),
        }
    }
}
