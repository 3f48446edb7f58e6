#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use guidebot_core::traits::Retriever;
use guidebot_core::{Chunk, Document, SourceType};
use guidebot_llm::{GenerationConfig, LlmClient, LlmError};

/// Replays queued replies in order and records every prompt it sees.
/// Once the queue is empty every call answers `default_reply`.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    default_reply: String,
    calls: Mutex<Vec<(String, GenerationConfig)>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self { replies: Mutex::new(replies.into()), default_reply: "default answer".into(), calls: Mutex::new(Vec::new()) }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn calls(&self) -> Vec<(String, GenerationConfig)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn prompts_containing(&self, needle: &str) -> usize {
        self.calls().iter().filter(|(p, _)| p.contains(needle)).count()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push((prompt.to_string(), *config));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_reply.clone()))
    }
}

pub enum StubRetriever {
    Chunks(Vec<Chunk>),
    Fails,
}

impl Retriever for StubRetriever {
    fn retrieve(&self, _query: &str, k: usize) -> anyhow::Result<Vec<Chunk>> {
        match self {
            StubRetriever::Chunks(chunks) => Ok(chunks.iter().take(k).cloned().collect()),
            StubRetriever::Fails => Err(anyhow::anyhow!("Index not initialized")),
        }
    }
}

pub fn chunk(text: &str) -> Chunk {
    Chunk::new(text, Document::new(text, "Delhi Tourism PDF", SourceType::Pdf).metadata)
}

pub fn delhi_chunks() -> Vec<Chunk> {
    vec![
        chunk("Red Fort was built by Shah Jahan in 1639."),
        chunk("Humayun's Tomb is a UNESCO World Heritage Site."),
        chunk("India Gate is a war memorial on Rajpath."),
    ]
}

pub const FALLBACK_MARKER: &str = "You are a friendly tourism and culture guide.";
pub const GROUNDED_MARKER: &str = "You are a helpful tourism and culture guide.";
pub const JUDGE_MARKER: &str = "checks if context is relevant";
pub const DIRECT_MARKER: &str = "You are a helpful travel assistant.";

pub fn status_error() -> LlmError {
    LlmError::Status { provider: "scripted", status: 500, body: "boom".into() }
}
