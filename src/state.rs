use std::sync::Arc;

use crate::config::Settings;
use crate::llm::LLMInterface;
use crate::llm_factory::LLMFactory;
use crate::prompt::SYSTEM_PROMPT;

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub system_prompt: &'static str,
    pub llm: Arc<dyn LLMInterface>,
}

impl AppState {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let llm = LLMFactory::create_llm(&settings)?;
        Ok(Self::with_llm(settings, llm))
    }

    pub fn with_llm(settings: Settings, llm: Arc<dyn LLMInterface>) -> Self {
        Self {
            settings: Arc::new(settings),
            system_prompt: SYSTEM_PROMPT,
            llm,
        }
    }
}
