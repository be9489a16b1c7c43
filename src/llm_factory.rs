use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::{BackendKind, Settings};
use crate::llm::{LLMInterface, OllamaLLM, OpenAILLM};

/// Factory for creating the LLM backend of this deployment
pub struct LLMFactory;

impl LLMFactory {
    /// Create the backend selected by `LLM_BACKEND`.
    ///
    /// Only one backend is active per process; there is no fallback between them.
    pub fn create_llm(settings: &Settings) -> Result<Arc<dyn LLMInterface>> {
        let kind = settings.backend_kind()?;
        info!("Initializing LLM: {:?}", kind);

        match kind {
            BackendKind::OpenAI => {
                let api_key = settings
                    .openai_api_key
                    .clone()
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY must be set for the openai backend"))?;
                Ok(Arc::new(OpenAILLM::new(
                    settings.openai_base_url.clone(),
                    api_key,
                )?))
            }
            BackendKind::Ollama => Ok(Arc::new(OllamaLLM::new(
                settings.ollama_url.clone(),
                settings.ollama_model.clone(),
            )?)),
        }
    }
}
