//! Flat L2 vector store over chunk embeddings.
//!
//! - `index`: exact k-NN index and its binary file format
//! - `store`: `VectorStore`, the index paired with its chunk metadata
//! - `shared`: `SharedStore`, the lock-guarded handle the server reloads
//! - `retrieve`: `retrieve_top_chunks` and the `Retriever` impls

pub mod error;
pub mod index;
pub mod retrieve;
pub mod shared;
pub mod store;

pub use error::{Result, VectorStoreError};
pub use index::{FlatL2Index, Neighbor};
pub use retrieve::retrieve_top_chunks;
pub use shared::SharedStore;
pub use store::VectorStore;
