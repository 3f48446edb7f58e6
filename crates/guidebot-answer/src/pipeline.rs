use std::sync::Arc;

use guidebot_core::config::{Settings, DEFAULT_TOP_K};
use guidebot_core::traits::Retriever;
use guidebot_core::Chunk;
use guidebot_llm::{GenerationConfig, LlmClient};

use crate::generator::{AnswerGenerator, AnswerPath};
use crate::prompts::{self, APOLOGY, DEFAULT_MAX_OUTPUT_TOKENS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub top_k: usize,
    pub max_output_tokens: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { top_k: DEFAULT_TOP_K, max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS }
    }
}

impl From<&Settings> for PipelineOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            top_k: settings.retrieval.top_k,
            max_output_tokens: settings.generation.max_output_tokens,
        }
    }
}

/// How a query was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The generator answered, grounded or from its own fallback.
    Answered(AnswerPath),
    /// Retrieval succeeded but returned nothing.
    NoContext,
    RetrievalFailed,
    GenerationFailed,
}

impl Resolution {
    pub fn used_direct_fallback(&self) -> bool {
        !matches!(self, Resolution::Answered(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub response: String,
    pub resolution: Resolution,
}

/// Retrieve, generate, and fall back to a direct LLM call or a fixed apology.
/// Every query ends with some text.
#[derive(Clone)]
pub struct QueryPipeline {
    retriever: Arc<dyn Retriever>,
    generator: AnswerGenerator,
    options: PipelineOptions,
}

impl QueryPipeline {
    pub fn new(retriever: Arc<dyn Retriever>, llm: Arc<dyn LlmClient>, options: PipelineOptions) -> Self {
        Self { retriever, generator: AnswerGenerator::new(llm), options }
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    pub async fn answer(&self, query: &str) -> QueryOutcome {
        let resolution = match self.retrieve(query).await {
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "retrieval failed; using direct fallback");
                Resolution::RetrievalFailed
            }
            Ok(chunks) if chunks.is_empty() => {
                tracing::warn!("no relevant documents found; using direct fallback");
                Resolution::NoContext
            }
            Ok(chunks) => {
                match self
                    .generator
                    .generate_answer(query, &chunks, self.options.max_output_tokens)
                    .await
                {
                    Ok(answer) => {
                        tracing::info!(path = answer.path.as_str(), "answered query");
                        return QueryOutcome { response: answer.text, resolution: Resolution::Answered(answer.path) };
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "generation failed; using direct fallback");
                        Resolution::GenerationFailed
                    }
                }
            }
        };
        QueryOutcome { response: self.direct_fallback(query).await, resolution }
    }

    async fn retrieve(&self, query: &str) -> anyhow::Result<Vec<Chunk>> {
        let retriever = Arc::clone(&self.retriever);
        let query = query.to_string();
        let k = self.options.top_k;
        tokio::task::spawn_blocking(move || retriever.retrieve(&query, k)).await?
    }

    async fn direct_fallback(&self, query: &str) -> String {
        match self
            .generator
            .llm()
            .generate(&prompts::direct_prompt(query), &GenerationConfig::default())
            .await
        {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => APOLOGY.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "direct fallback failed");
                APOLOGY.to_string()
            }
        }
    }
}
