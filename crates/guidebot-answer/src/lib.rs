//! Answer generation: relevance-gated grounded answers with two fallback tiers.
//!
//! [`AnswerGenerator`] owns the per-query decision (no context, irrelevant
//! context, grounded). [`QueryPipeline`] wraps retrieval around it and
//! converts every failure into the direct-fallback answer.

pub mod generator;
pub mod pipeline;
pub mod prompts;
pub mod relevance;

pub use generator::{Answer, AnswerGenerator, AnswerPath};
pub use pipeline::{PipelineOptions, QueryOutcome, QueryPipeline, Resolution};
pub use prompts::{APOLOGY, DEFAULT_MAX_OUTPUT_TOKENS};
