use async_trait::async_trait;

use crate::error::ChatError;
use crate::prompt::{AssembledPrompt, PromptStyle};

/// Sampling temperature sent with every generation request
pub const TEMPERATURE: f32 = 0.7;
/// Upper bound on generated tokens
pub const MAX_TOKENS: u32 = 1000;

/// Interface for a stateless language model backend
/// Stateless means the backend keeps no conversation; every call carries the full prompt
#[async_trait]
pub trait LLMInterface: Send + Sync {
    /// Short provider label for logs
    fn name(&self) -> &str;

    /// Prompt representation this backend consumes
    fn prompt_style(&self) -> PromptStyle;

    /// Generate the assistant reply for an assembled prompt.
    ///
    /// Fails with `ChatError::Timeout` when the backend does not answer in time
    /// and `ChatError::Backend` for every other upstream failure.
    async fn generate(&self, prompt: &AssembledPrompt) -> Result<String, ChatError>;
}
