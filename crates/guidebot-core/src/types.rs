//! Domain types shared by the ingest, store and answer layers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a document's text came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Html,
    Pdf,
    Text,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Html => "html",
            SourceType::Pdf => "pdf",
            SourceType::Text => "text",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origin tag carried by a document and by every chunk cut from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentMeta {
    pub source: String,
    #[serde(rename = "type")]
    pub kind: SourceType,
}

/// Raw text produced by a source adapter. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMeta,
}

impl Document {
    pub fn new(content: impl Into<String>, source: impl Into<String>, kind: SourceType) -> Self {
        Self {
            content: content.into(),
            metadata: DocumentMeta { source: source.into(), kind },
        }
    }
}

/// A bounded-length segment of a [`Document`].
///
/// - `content`: the text payload that gets embedded
/// - `metadata`: copied verbatim from the parent document
/// - `chunk_index`/`total_chunks`: position within the parent document
///
/// Chunks are stored in the vector store's metadata list; a chunk's position
/// in that list is its only link to its embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub content: String,
    pub metadata: DocumentMeta,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

impl Chunk {
    /// A chunk that stands for a whole (short) document.
    pub fn new(content: impl Into<String>, metadata: DocumentMeta) -> Self {
        Self { content: content.into(), metadata, chunk_index: 0, total_chunks: 1 }
    }

    pub fn source(&self) -> &str {
        &self.metadata.source
    }
}
