//! Document source adapters: web articles, PDF brochures, plain-text URLs,
//! and the city catalogue walker that drives them during ingestion.

pub mod catalog;
pub mod error;
pub mod html;
pub mod http;
pub mod pdf;
pub mod text;

pub use catalog::{collect_documents, collect_documents_with};
pub use error::{Result, SourceError};
pub use html::{extract_paragraphs, fetch_web_page};
pub use http::build_http_client;
pub use pdf::load_pdf;
pub use text::fetch_plain_text;
