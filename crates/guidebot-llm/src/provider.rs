use async_trait::async_trait;

use crate::error::Result;
use crate::types::GenerationConfig;

/// Single-turn text generation against a hosted model.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider name used in logs (e.g. "gemini", "openai").
    fn name(&self) -> &str;

    /// Generate a completion for `prompt`. Returns the raw model text.
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String>;
}
