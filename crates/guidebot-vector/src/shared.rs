use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use guidebot_core::Chunk;

use crate::error::Result;
use crate::store::VectorStore;

/// Process-wide handle to one [`VectorStore`], cheap to clone.
///
/// Searches hold the read lock. `reload` reads the persisted files into a
/// fresh store first and only takes the write lock for the swap.
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<RwLock<VectorStore>>,
}

impl SharedStore {
    pub fn new(store: VectorStore) -> Self {
        Self { inner: Arc::new(RwLock::new(store)) }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, VectorStore> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, VectorStore> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn search(&self, query: &str, k: usize) -> Result<Vec<Chunk>> {
        self.read().search(query, k)
    }

    pub fn len(&self) -> usize { self.read().len() }
    pub fn is_empty(&self) -> bool { self.read().is_empty() }
    pub fn is_initialized(&self) -> bool { self.read().is_initialized() }

    /// Reload from the configured paths; returns the new chunk count.
    /// On error the current store keeps serving.
    pub fn reload(&self) -> Result<usize> {
        let mut fresh = {
            let current = self.read();
            VectorStore::new(
                Arc::clone(current.embedder()),
                current.index_path().to_path_buf(),
                current.meta_path().to_path_buf(),
            )
        };
        fresh.load(None, None)?;
        let count = fresh.len();
        *self.write() = fresh;
        tracing::info!(chunks = count, "vector store reloaded");
        Ok(count)
    }
}
