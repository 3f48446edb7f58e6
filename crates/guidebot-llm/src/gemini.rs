use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{LlmError, Result};
use crate::provider::LlmClient;
use crate::types::GenerationConfig;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Google Gemini `generateContent` client.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(model: impl Into<String>, api_key: Option<String>, base_url: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey { provider: "gemini", env_var: API_KEY_ENV })?;
        tracing::debug!(model = %self.model, temperature = ?config.temperature, "gemini request");

        let res = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key.trim())
            .json(&build_request(prompt, config))
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(LlmError::Status { provider: "gemini", status, body });
        }
        let payload: GenerateResponse = res
            .json()
            .await
            .map_err(|e| LlmError::Malformed(e.to_string()))?;
        extract_text(payload)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

pub(crate) fn build_request<'a>(prompt: &'a str, config: &GenerationConfig) -> GenerateRequest<'a> {
    let generation_config = if config.max_output_tokens.is_none() && config.temperature.is_none() {
        None
    } else {
        Some(WireGenerationConfig {
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
        })
    };
    GenerateRequest {
        contents: vec![Content { role: "user", parts: vec![Part { text: prompt }] }],
        generation_config,
    }
}

/// Text of the first candidate, all parts concatenated. A candidate without
/// text (blocked, or cut off before any output) is an error.
pub(crate) fn extract_text(payload: GenerateResponse) -> Result<String> {
    let candidate = payload
        .candidates
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyResponse("gemini"))?;
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse("gemini"));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_uses_camel_case_generation_config() {
        let body = serde_json::to_value(build_request("hi", &GenerationConfig::new(500, 0.3))).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 500);
        let temp = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temp - 0.3).abs() < 1e-6);
    }

    #[test]
    fn default_config_omits_generation_config() {
        let body = serde_json::to_value(build_request("hi", &GenerationConfig::default())).unwrap();
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn extracts_and_joins_parts() {
        let payload: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello, " }, { "text": "Delhi" }] } }]
        }))
        .unwrap();
        assert_eq!(extract_text(payload).unwrap(), "Hello, Delhi");
    }

    #[test]
    fn no_candidates_is_empty_response() {
        let payload: GenerateResponse = serde_json::from_value(json!({ "promptFeedback": {} })).unwrap();
        assert!(matches!(extract_text(payload), Err(LlmError::EmptyResponse("gemini"))));
    }

    #[test]
    fn blocked_or_blank_candidate_is_empty_response() {
        let blocked: GenerateResponse =
            serde_json::from_value(json!({ "candidates": [{ "finishReason": "SAFETY" }] })).unwrap();
        assert!(matches!(extract_text(blocked), Err(LlmError::EmptyResponse("gemini"))));

        let blank: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] } }]
        }))
        .unwrap();
        assert!(matches!(extract_text(blank), Err(LlmError::EmptyResponse("gemini"))));
    }

    #[tokio::test]
    async fn missing_key_fails_at_call_time() {
        let client = GeminiClient::new("gemini-2.0-flash", None, None, Duration::from_secs(1)).unwrap();
        let err = client.generate("hi", &GenerationConfig::default()).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey { provider: "gemini", .. }));
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = GeminiClient::new("m", Some("k".into()), Some("http://localhost:9/".into()), Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9/v1beta/models/m:generateContent");
    }
}
