use std::path::Path;

use guidebot_core::{Document, SourceType};

use crate::error::{Result, SourceError};

/// Extract a PDF's text page by page. Pages without text are skipped; a PDF
/// with no text at all yields no document.
pub fn load_pdf(path: &Path, source: Option<&str>) -> Result<Option<Document>> {
    let path_str = path.display().to_string();
    if !path.exists() {
        return Err(SourceError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path_str),
        )));
    }
    let doc = lopdf::Document::load(path)
        .map_err(|e| SourceError::Pdf { path: path_str.clone(), message: e.to_string() })?;

    let mut page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    page_numbers.sort_unstable();

    let mut pages = Vec::new();
    for page in page_numbers {
        match doc.extract_text(&[page]) {
            Ok(text) if !text.trim().is_empty() => pages.push(text.trim().to_string()),
            Ok(_) => {}
            Err(e) => tracing::debug!(path = %path_str, page, error = %e, "no text on page"),
        }
    }
    if pages.is_empty() {
        tracing::warn!(path = %path_str, "PDF has no extractable text");
        return Ok(None);
    }
    tracing::info!(path = %path_str, pages = pages.len(), "loaded PDF");
    Ok(Some(Document::new(pages.join("\n\n"), source.unwrap_or(path_str.as_str()), SourceType::Pdf)))
}
