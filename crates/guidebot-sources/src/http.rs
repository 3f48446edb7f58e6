use std::time::Duration;

use reqwest::Client;

use crate::error::Result;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Client shared by the fetchers; every request times out after 15s.
pub fn build_http_client() -> Result<Client> {
    Ok(Client::builder().timeout(FETCH_TIMEOUT).build()?)
}
