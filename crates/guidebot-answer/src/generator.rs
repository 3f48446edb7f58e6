use std::sync::Arc;

use guidebot_core::Chunk;
use guidebot_llm::{GenerationConfig, LlmClient, LlmError};

use crate::prompts::{self, FALLBACK_TEMPERATURE, GROUNDED_TEMPERATURE};
use crate::relevance::judged_irrelevant;

/// Which branch produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerPath {
    Grounded,
    NoContextFallback,
    IrrelevantContextFallback,
}

impl AnswerPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerPath::Grounded => "grounded",
            AnswerPath::NoContextFallback => "no_context_fallback",
            AnswerPath::IrrelevantContextFallback => "irrelevant_context_fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub path: AnswerPath,
}

/// Answers a question from retrieved chunks, or from the model's own
/// knowledge when the chunks are empty or judged irrelevant.
#[derive(Clone)]
pub struct AnswerGenerator {
    llm: Arc<dyn LlmClient>,
}

impl AnswerGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub fn llm(&self) -> &Arc<dyn LlmClient> {
        &self.llm
    }

    pub async fn generate_answer(&self, query: &str, chunks: &[Chunk], max_output_tokens: u32) -> Result<Answer, LlmError> {
        let context = chunks.iter().map(|c| c.content.as_str()).collect::<Vec<_>>().join("\n");

        if context.trim().is_empty() {
            tracing::warn!("no retrieved context; answering from general knowledge");
            return self.fallback(query, max_output_tokens, AnswerPath::NoContextFallback).await;
        }

        let verdict = self
            .llm
            .generate(&prompts::judge_prompt(query, &context), &GenerationConfig::default())
            .await?;
        if judged_irrelevant(&verdict) {
            tracing::warn!(verdict = %verdict.trim(), "retrieved context judged irrelevant; answering from general knowledge");
            return self.fallback(query, max_output_tokens, AnswerPath::IrrelevantContextFallback).await;
        }

        tracing::debug!(chunks = chunks.len(), context_chars = context.chars().count(), "grounded answer");
        let text = self
            .llm
            .generate(
                &prompts::grounded_prompt(query, &context),
                &GenerationConfig::new(max_output_tokens, GROUNDED_TEMPERATURE),
            )
            .await?;
        Ok(Answer { text: text.trim().to_string(), path: AnswerPath::Grounded })
    }

    async fn fallback(&self, query: &str, max_output_tokens: u32, path: AnswerPath) -> Result<Answer, LlmError> {
        let text = self
            .llm
            .generate(
                &prompts::fallback_prompt(query),
                &GenerationConfig::new(max_output_tokens, FALLBACK_TEMPERATURE),
            )
            .await?;
        Ok(Answer { text: text.trim().to_string(), path })
    }
}
