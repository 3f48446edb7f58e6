use guidebot_answer::QueryPipeline;
use guidebot_vector::SharedStore;

/// Everything a handler needs, shared behind one `Arc`.
pub struct AppState {
    pub pipeline: QueryPipeline,
    pub store: SharedStore,
    pub banner: String,
}

impl AppState {
    pub fn new(pipeline: QueryPipeline, store: SharedStore, banner: impl Into<String>) -> Self {
        Self { pipeline, store, banner: banner.into() }
    }
}
