//! Shared wiring for the guidebot binaries.

use std::sync::Arc;

use anyhow::Result;

use guidebot_answer::{PipelineOptions, QueryPipeline};
use guidebot_core::config::{Config, Settings};
use guidebot_core::traits::Retriever;
use guidebot_embed::get_default_embedder;
use guidebot_llm::client_from_settings;
use guidebot_vector::{SharedStore, VectorStore, VectorStoreError};

pub mod logging {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    /// Install the fmt subscriber. `RUST_LOG` overrides the `info` default.
    pub fn init() {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init();
    }
}

/// Load layered settings for `env_name` (dev, prod or test).
pub fn load_settings(env_name: &str) -> Result<Settings> {
    let config = Config::load_for_env(env_name).map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    config.settings()
}

/// An empty store wired to the configured embedder and paths.
pub fn build_store(settings: &Settings) -> Result<VectorStore> {
    let embedder = get_default_embedder(&settings.store)?;
    Ok(VectorStore::from_settings(embedder, &settings.store))
}

/// Load the persisted index into `store`. Returns `false` when there is none
/// yet; a corrupt or mismatched index is an error, never silently replaced.
pub fn load_if_present(store: &mut VectorStore) -> Result<bool> {
    match store.load(None, None) {
        Ok(()) => Ok(true),
        Err(e @ VectorStoreError::NotFound { .. }) => {
            tracing::warn!(error = %e, "no persisted index");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Load the persisted index if there is one. A missing index is not fatal:
/// queries then go straight to the direct fallback until `/reload`.
pub fn open_store(settings: &Settings) -> Result<SharedStore> {
    let mut store = build_store(settings)?;
    if !load_if_present(&mut store)? {
        tracing::warn!("serving without an index; run guidebot-indexer first");
    }
    Ok(SharedStore::new(store))
}

pub fn build_pipeline(settings: &Settings, retriever: Arc<dyn Retriever>) -> Result<QueryPipeline> {
    let llm = client_from_settings(&settings.llm)?;
    Ok(QueryPipeline::new(retriever, llm, PipelineOptions::from(settings)))
}
