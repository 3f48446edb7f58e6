//! HTTP front-end for the tourism QA pipeline.

pub mod handlers;
pub mod router;
pub mod state;

pub use handlers::{QueryRequest, QueryResponse};
pub use router::{router, serve};
pub use state::AppState;
