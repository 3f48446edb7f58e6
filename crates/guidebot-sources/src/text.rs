use reqwest::Client;

use guidebot_core::{Document, SourceType};

use crate::error::{Result, SourceError};

/// Fetch a plain-text resource verbatim.
pub async fn fetch_plain_text(client: &Client, url: &str) -> Result<Document> {
    let res = client.get(url).send().await?;
    if !res.status().is_success() {
        return Err(SourceError::Status { url: url.to_string(), status: res.status().as_u16() });
    }
    let body = res.text().await?;
    tracing::info!(url, chars = body.chars().count(), "fetched text");
    Ok(Document::new(body, url, SourceType::Text))
}
