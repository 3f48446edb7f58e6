use guidebot_core::traits::Retriever;
use guidebot_core::Chunk;

use crate::error::Result;
use crate::shared::SharedStore;
use crate::store::VectorStore;

/// Top-`k` chunks for `query`; a thin pass-through to [`VectorStore::search`].
pub fn retrieve_top_chunks(store: &VectorStore, query: &str, k: usize) -> Result<Vec<Chunk>> {
    store.search(query, k)
}

impl Retriever for VectorStore {
    fn retrieve(&self, query: &str, k: usize) -> anyhow::Result<Vec<Chunk>> {
        Ok(retrieve_top_chunks(self, query, k)?)
    }
}

impl Retriever for SharedStore {
    fn retrieve(&self, query: &str, k: usize) -> anyhow::Result<Vec<Chunk>> {
        Ok(retrieve_top_chunks(&self.read(), query, k)?)
    }
}
