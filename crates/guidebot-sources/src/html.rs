use reqwest::header::{ACCEPT_LANGUAGE as ACCEPT_LANGUAGE_HEADER, USER_AGENT};
use reqwest::Client;
use scraper::{Html, Selector};

use guidebot_core::{Document, SourceType};

use crate::error::{Result, SourceError};
use crate::http::{ACCEPT_LANGUAGE, BROWSER_USER_AGENT};

/// Fetch an article page and keep the text of its `<p>` elements.
pub async fn fetch_web_page(client: &Client, url: &str) -> Result<Document> {
    let res = client
        .get(url)
        .header(USER_AGENT, BROWSER_USER_AGENT)
        .header(ACCEPT_LANGUAGE_HEADER, ACCEPT_LANGUAGE)
        .send()
        .await?;
    if !res.status().is_success() {
        return Err(SourceError::Status { url: url.to_string(), status: res.status().as_u16() });
    }
    let body = res.text().await?;
    let text = extract_paragraphs(&body);
    tracing::info!(url, chars = text.chars().count(), "fetched web page");
    Ok(Document::new(text, url, SourceType::Html))
}

/// Trimmed text of every non-empty `<p>`, separated by blank lines.
pub fn extract_paragraphs(html: &str) -> String {
    let Ok(selector) = Selector::parse("p") else {
        return String::new();
    };
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::extract_paragraphs;

    #[test]
    fn keeps_only_non_empty_paragraphs() {
        let html = r#"<html><head><title>Delhi</title></head><body>
            <div class="nav">Menu</div>
            <p>  Delhi is the capital of <b>India</b>. </p>
            <p>   </p>
            <table><tr><td>not a paragraph</td></tr></table>
            <p>It has three UNESCO sites.</p>
        </body></html>"#;
        assert_eq!(extract_paragraphs(html), "Delhi is the capital of India.\n\nIt has three UNESCO sites.");
    }

    #[test]
    fn page_without_paragraphs_is_empty() {
        assert_eq!(extract_paragraphs("<html><body><div>hi</div></body></html>"), "");
    }
}
