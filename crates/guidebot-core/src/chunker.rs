//! Recursive character splitter.
//!
//! Splits on the coarsest separator present (`"\n\n"`, `"\n"`, `" "`, then
//! single characters), greedily merges the pieces up to `chunk_size`
//! characters, and carries at most `chunk_overlap` characters of tail into
//! the next chunk. Lengths are counted in `char`s, not bytes.

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::types::{Chunk, Document};

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 800, chunk_overlap: 150 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextSplitter {
    config: ChunkingConfig,
}

impl TextSplitter {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        if config.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be at least 1".into()));
        }
        if config.chunk_overlap >= config.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> ChunkingConfig {
        self.config
    }

    pub fn chunk_documents(&self, docs: &[Document]) -> Vec<Chunk> {
        let mut all_chunks = Vec::new();
        for doc in docs {
            let pieces = self.split_text(&doc.content);
            let total_chunks = pieces.len();
            all_chunks.extend(pieces.into_iter().enumerate().map(|(chunk_index, content)| Chunk {
                content,
                metadata: doc.metadata.clone(),
                chunk_index,
                total_chunks,
            }));
        }
        tracing::info!(documents = docs.len(), chunks = all_chunks.len(), "split documents into chunks");
        all_chunks
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        let mut chunks = self.split_recursive(text, &SEPARATORS);
        chunks.retain(|c| !c.is_empty());
        chunks
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let mut separator = "";
        let mut finer: &[&str] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() {
                separator = sep;
                break;
            }
            if text.contains(sep) {
                separator = sep;
                finer = &separators[i + 1..];
                break;
            }
        }

        // "".split("") yields one piece per char, wrapped in empty strings.
        let pieces = text.split(separator).filter(|p| !p.is_empty());

        let mut out = Vec::new();
        let mut pending: Vec<&str> = Vec::new();
        for piece in pieces {
            if char_len(piece) < self.config.chunk_size {
                pending.push(piece);
                continue;
            }
            if !pending.is_empty() {
                out.extend(self.merge(&pending, separator));
                pending.clear();
            }
            if finer.is_empty() {
                out.push(piece.trim().to_string());
            } else {
                out.extend(self.split_recursive(piece, finer));
            }
        }
        if !pending.is_empty() {
            out.extend(self.merge(&pending, separator));
        }
        out
    }

    fn merge(&self, pieces: &[&str], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let ChunkingConfig { chunk_size, chunk_overlap } = self.config;
        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);
            let joiner = if current.is_empty() { 0 } else { sep_len };
            if total + len + joiner > chunk_size && !current.is_empty() {
                push_joined(&mut docs, &current, separator);
                loop {
                    let joiner = if current.is_empty() { 0 } else { sep_len };
                    let over_budget = total + len + joiner > chunk_size && total > 0;
                    if total <= chunk_overlap && !over_budget {
                        break;
                    }
                    let Some(first) = current.pop_front() else { break };
                    let removed = char_len(first) + if current.is_empty() { 0 } else { sep_len };
                    total = total.saturating_sub(removed);
                }
            }
            let joiner = if current.is_empty() { 0 } else { sep_len };
            current.push_back(piece);
            total += len + joiner;
        }
        push_joined(&mut docs, &current, separator);
        docs
    }
}

fn push_joined(docs: &mut Vec<String>, current: &VecDeque<&str>, separator: &str) {
    let joined = current.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        docs.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
