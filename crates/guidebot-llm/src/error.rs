use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No API key configured for {provider}; set {env_var} or llm.api_key")]
    MissingApiKey { provider: &'static str, env_var: &'static str },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned {status}: {body}")]
    Status { provider: &'static str, status: u16, body: String },

    #[error("{0} returned no text")]
    EmptyResponse(&'static str),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, LlmError>;
