//! Hosted LLM clients behind one async trait.
//!
//! The answer layer only sees [`LlmClient`]; [`client_from_settings`] picks
//! Gemini or an OpenAI-compatible endpoint from `[llm]` config.

use std::sync::Arc;
use std::time::Duration;

use guidebot_core::config::{LlmProviderKind, LlmSettings};

pub mod error;
pub mod gemini;
pub mod openai;
pub mod provider;
pub mod types;

pub use error::{LlmError, Result};
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use provider::LlmClient;
pub use types::GenerationConfig;

/// Build the configured client. A missing API key is not an error here;
/// it surfaces as [`LlmError::MissingApiKey`] on the first call.
pub fn client_from_settings(settings: &LlmSettings) -> Result<Arc<dyn LlmClient>> {
    let timeout = Duration::from_secs(settings.timeout_secs);
    let client: Arc<dyn LlmClient> = match settings.provider {
        LlmProviderKind::Gemini => {
            let key = settings.api_key.clone().or_else(|| std::env::var(gemini::API_KEY_ENV).ok());
            Arc::new(GeminiClient::new(&settings.model, key, settings.base_url.clone(), timeout)?)
        }
        LlmProviderKind::OpenAi => {
            let key = settings.api_key.clone().or_else(|| std::env::var(openai::API_KEY_ENV).ok());
            Arc::new(OpenAiClient::new(&settings.model, key, settings.base_url.clone(), timeout)?)
        }
    };
    tracing::info!(provider = client.name(), model = %settings.model, "llm client ready");
    Ok(client)
}
