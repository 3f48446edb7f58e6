use std::path::Path;

use reqwest::Client;

use guidebot_core::config::{resolve_with_base, CitySource};
use guidebot_core::Document;

use crate::error::Result;
use crate::html::fetch_web_page;
use crate::http::build_http_client;
use crate::pdf::load_pdf;
use crate::text::fetch_plain_text;

/// Gather every document the catalogue points at. Unreachable pages and
/// missing or unreadable PDFs are logged and skipped.
pub async fn collect_documents(cities: &[CitySource], base_dir: &Path) -> Result<Vec<Document>> {
    let client = build_http_client()?;
    Ok(collect_documents_with(&client, cities, base_dir).await)
}

pub async fn collect_documents_with(client: &Client, cities: &[CitySource], base_dir: &Path) -> Vec<Document> {
    let mut docs = Vec::new();
    for city in cities {
        let before = docs.len();

        if let Some(url) = &city.web {
            match fetch_web_page(client, url).await {
                Ok(doc) => docs.push(doc),
                Err(e) => tracing::warn!(city = %city.name, url = %url, error = %e, "failed to fetch web page"),
            }
        }

        let source = format!("{} Tourism PDF", city.name);
        for pdf in city.pdf.iter() {
            let path = resolve_with_base(base_dir, pdf);
            if !path.exists() {
                tracing::warn!(city = %city.name, path = %path.display(), "missing PDF");
                continue;
            }
            let tag = source.clone();
            let loaded = tokio::task::spawn_blocking(move || load_pdf(&path, Some(tag.as_str()))).await;
            match loaded {
                Ok(Ok(Some(doc))) => docs.push(doc),
                Ok(Ok(None)) => {}
                Ok(Err(e)) => tracing::warn!(city = %city.name, error = %e, "failed to load PDF"),
                Err(e) => tracing::warn!(city = %city.name, error = %e, "PDF task panicked"),
            }
        }

        if let Some(url) = &city.text_url {
            match fetch_plain_text(client, url).await {
                Ok(doc) => docs.push(doc),
                Err(e) => tracing::warn!(city = %city.name, url = %url, error = %e, "failed to fetch text"),
            }
        }

        tracing::info!(city = %city.name, documents = docs.len() - before, "collected city sources");
    }
    docs
}
