use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

use guidebot_core::config::StoreSettings;
use guidebot_core::traits::Embedder;
use guidebot_core::Chunk;

use crate::error::{Result, VectorStoreError};
use crate::index::FlatL2Index;

const EMBED_BATCH_SIZE: usize = 32;

/// Embedding index plus the chunk list it was built from.
///
/// Row `i` of the index is the embedding of `chunks[i]`; every mutation
/// touches both together.
pub struct VectorStore {
    embedder: Arc<dyn Embedder>,
    index: Option<FlatL2Index>,
    chunks: Vec<Chunk>,
    index_path: PathBuf,
    meta_path: PathBuf,
}

impl VectorStore {
    pub fn new(embedder: Arc<dyn Embedder>, index_path: impl Into<PathBuf>, meta_path: impl Into<PathBuf>) -> Self {
        Self {
            embedder,
            index: None,
            chunks: Vec::new(),
            index_path: index_path.into(),
            meta_path: meta_path.into(),
        }
    }

    pub fn from_settings(embedder: Arc<dyn Embedder>, settings: &StoreSettings) -> Self {
        Self::new(embedder, settings.index_path(), settings.meta_path())
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> { &self.embedder }
    pub fn index_path(&self) -> &Path { &self.index_path }
    pub fn meta_path(&self) -> &Path { &self.meta_path }
    pub fn chunks(&self) -> &[Chunk] { &self.chunks }
    pub fn len(&self) -> usize { self.chunks.len() }
    pub fn is_empty(&self) -> bool { self.chunks.is_empty() }
    pub fn is_initialized(&self) -> bool { self.index.is_some() }
    pub fn dim(&self) -> usize { self.embedder.dim() }

    /// Embed `chunks` and index them.
    ///
    /// With `rebuild` (or no existing index) the store is replaced; otherwise
    /// the new rows and chunks are appended. Nothing changes if embedding fails.
    pub fn build_index(&mut self, chunks: Vec<Chunk>, rebuild: bool) -> Result<()> {
        tracing::info!(chunks = chunks.len(), rebuild, "building vector index");
        let embeddings = self.embed_chunks(&chunks)?;

        if rebuild || self.index.is_none() {
            let mut index = FlatL2Index::new(self.embedder.dim());
            index.add(&embeddings)?;
            self.index = Some(index);
            self.chunks = chunks;
        } else if let Some(index) = self.index.as_mut() {
            index.add(&embeddings)?;
            self.chunks.extend(chunks);
        }
        tracing::info!(total = self.chunks.len(), "vector index ready");
        Ok(())
    }

    fn embed_chunks(&self, chunks: &[Chunk]) -> Result<Vec<Vec<f32>>> {
        let pb = ProgressBar::new(chunks.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%)")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        let mut out = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let vectors = self
                .embedder
                .embed_batch(&texts)
                .map_err(|e| VectorStoreError::Embedding(format!("{:#}", e)))?;
            if vectors.len() != batch.len() {
                return Err(VectorStoreError::Embedding(format!(
                    "embedder returned {} vectors for {} texts",
                    vectors.len(),
                    batch.len()
                )));
            }
            out.extend(vectors);
            pb.inc(batch.len() as u64);
        }
        pb.finish_and_clear();
        Ok(out)
    }

    /// Persist the index and chunk metadata, defaulting to the configured paths.
    pub fn save(&self, index_path: Option<&Path>, meta_path: Option<&Path>) -> Result<()> {
        let index = self.index.as_ref().ok_or(VectorStoreError::NoIndex)?;
        let index_path = index_path.unwrap_or(&self.index_path);
        let meta_path = meta_path.unwrap_or(&self.meta_path);

        index.save(index_path)?;
        if let Some(parent) = meta_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        serde_json::to_writer(BufWriter::new(fs::File::create(meta_path)?), &self.chunks)?;
        tracing::info!(
            index = %index_path.display(),
            meta = %meta_path.display(),
            chunks = self.chunks.len(),
            "saved vector store"
        );
        Ok(())
    }

    /// Restore a persisted store. In-memory state is only replaced on success.
    pub fn load(&mut self, index_path: Option<&Path>, meta_path: Option<&Path>) -> Result<()> {
        let index_path = index_path.unwrap_or(&self.index_path).to_path_buf();
        let meta_path = meta_path.unwrap_or(&self.meta_path).to_path_buf();
        if !index_path.exists() || !meta_path.exists() {
            return Err(VectorStoreError::NotFound { index_path, meta_path });
        }

        let index = FlatL2Index::load(&index_path)?;
        let chunks: Vec<Chunk> = serde_json::from_reader(BufReader::new(fs::File::open(&meta_path)?))?;
        if index.len() != chunks.len() {
            return Err(VectorStoreError::Desynchronized { vectors: index.len(), chunks: chunks.len() });
        }
        if !index.is_empty() && index.dim() != self.embedder.dim() {
            return Err(VectorStoreError::DimensionMismatch { expected: self.embedder.dim(), actual: index.dim() });
        }

        tracing::info!(chunks = chunks.len(), index = %index_path.display(), "loaded vector store");
        self.index = Some(index);
        self.chunks = chunks;
        Ok(())
    }

    /// Up to `k` chunks nearest to `query`, closest first.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<Chunk>> {
        Ok(self.search_scored(query, k)?.into_iter().map(|(chunk, _)| chunk).collect())
    }

    /// Like [`search`](Self::search) but keeps each hit's squared L2 distance.
    pub fn search_scored(&self, query: &str, k: usize) -> Result<Vec<(Chunk, f32)>> {
        let index = self.index.as_ref().ok_or(VectorStoreError::NotInitialized)?;
        if k == 0 {
            return Ok(Vec::new());
        }
        let embedding = self
            .embedder
            .embed_one(query)
            .map_err(|e| VectorStoreError::Embedding(format!("{:#}", e)))?;
        let hits = index.search(&embedding, k)?;
        let mut out = Vec::with_capacity(hits.len());
        for hit in hits {
            match self.chunks.get(hit.position) {
                Some(chunk) => out.push((chunk.clone(), hit.distance)),
                None => tracing::warn!(position = hit.position, chunks = self.chunks.len(), "index position without metadata; skipped"),
            }
        }
        tracing::debug!(k, hits = out.len(), "vector search");
        Ok(out)
    }
}
