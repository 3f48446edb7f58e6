use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{LlmError, Result};
use crate::provider::LlmClient;
use crate::types::GenerationConfig;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Any OpenAI-compatible `/v1/chat/completions` endpoint (OpenAI, LM Studio, vLLM...).
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    require_key: bool,
}

impl OpenAiClient {
    pub fn new(model: impl Into<String>, api_key: Option<String>, base_url: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        // Local servers usually run without auth.
        let require_key = base_url.is_none();
        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            require_key,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        if self.require_key && self.api_key.is_none() {
            return Err(LlmError::MissingApiKey { provider: "openai", env_var: API_KEY_ENV });
        }
        tracing::debug!(model = %self.model, temperature = ?config.temperature, "openai request");

        let mut req = self.client.post(self.endpoint()).json(&build_request(&self.model, prompt, config));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key.trim());
        }
        let res = req.send().await?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(LlmError::Status { provider: "openai", status, body });
        }
        let payload: ChatResponse = res
            .json()
            .await
            .map_err(|e| LlmError::Malformed(e.to_string()))?;
        extract_text(payload)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<AssistantMessage>,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

pub(crate) fn build_request<'a>(model: &'a str, prompt: &'a str, config: &GenerationConfig) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![ChatMessage { role: "user", content: prompt }],
        max_tokens: config.max_output_tokens,
        temperature: config.temperature,
    }
}

/// Content of the first choice; a missing, null or blank message is an error.
pub(crate) fn extract_text(payload: ChatResponse) -> Result<String> {
    payload
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(LlmError::EmptyResponse("openai"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_carries_single_user_message() {
        let body = serde_json::to_value(build_request("gpt-4o-mini", "hi", &GenerationConfig::new(500, 0.7))).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["messages"][0]["content"], "hi");
        assert_eq!(body["max_tokens"], 500);
    }

    #[test]
    fn default_config_omits_knobs() {
        let body = serde_json::to_value(build_request("m", "hi", &GenerationConfig::default())).unwrap();
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn extracts_first_choice() {
        let payload: ChatResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": "yes" } }]
        }))
        .unwrap();
        assert_eq!(extract_text(payload).unwrap(), "yes");
        let empty: ChatResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(matches!(extract_text(empty), Err(LlmError::EmptyResponse("openai"))));
    }

    #[test]
    fn null_or_blank_message_is_empty_response() {
        for payload in [
            json!({ "choices": [{ "message": null, "finish_reason": "content_filter" }] }),
            json!({ "choices": [{ "message": { "role": "assistant", "content": null } }] }),
            json!({ "choices": [{ "message": { "role": "assistant", "content": "" } }] }),
        ] {
            let parsed: ChatResponse = serde_json::from_value(payload).unwrap();
            assert!(matches!(extract_text(parsed), Err(LlmError::EmptyResponse("openai"))));
        }
    }

    #[tokio::test]
    async fn hosted_endpoint_requires_key() {
        let client = OpenAiClient::new("m", None, None, Duration::from_secs(1)).unwrap();
        let err = client.generate("hi", &GenerationConfig::default()).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey { provider: "openai", .. }));
    }
}
