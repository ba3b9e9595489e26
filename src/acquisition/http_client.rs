//! Single-shot HTTP fetcher with a browser identity.
//!
//! Deliberately stateless: every call builds its own client, so no
//! connection or cookie state survives between fetches. There are no
//! retries either. A failed fetch falls straight through to the caller,
//! which decides between cached data and an empty result.

use std::time::Duration;

use thiserror::Error;

/// Browser-identity headers. The source site alters or rejects responses
/// for clients that do not look like a desktop browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "ru-RU,ru;q=0.8,en-US;q=0.5,en;q=0.3";

/// Why a fetch produced no body.
///
/// The split between `Timeout` and the rest only matters for logging;
/// callers treat every variant the same way (no retry, immediate
/// fallback to cached data).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout)
    }
}

/// Fetch one page and return its body text.
///
/// Only status 200 counts as success; every other status and any
/// transport condition is classified into a [`FetchError`].
pub async fn fetch(url: &str, timeout: Duration) -> Result<String, FetchError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(classify)?;

    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, ACCEPT)
        .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
        .send()
        .await
        .map_err(classify)?;

    let status = response.status().as_u16();
    if status != 200 {
        return Err(FetchError::Status(status));
    }

    response.text().await.map_err(classify)
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(err.to_string())
    }
}
