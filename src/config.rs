//! Service configuration: source-site endpoints, fetch timeouts, and the
//! cache location.
//!
//! Everything here is fixed per deployment; operations never negotiate
//! these values at runtime. Environment variables override the defaults so
//! tests and staging setups can point the pipeline at another origin.

use std::path::PathBuf;
use std::time::Duration;

/// Hard cap on articles returned by search and topic operations.
pub const MAX_ARTICLES: usize = 10;

/// Configuration for the acquisition service.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Russian-language site root, with trailing slash.
    pub base_url_ru: String,
    /// Uzbek-language site root, with trailing slash.
    pub base_url_uz: String,
    /// Timeout for listing, search, and topic pages.
    pub listing_timeout: Duration,
    /// Timeout for article bodies (larger pages, slower renders).
    pub article_timeout: Duration,
    /// Path of the persisted JSON cache document.
    pub cache_path: PathBuf,
    /// Freshness window: entries older than this are refetched.
    pub cache_ttl: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url_ru: "https://kadrovik.uz/".to_string(),
            base_url_uz: "https://kadrovik.uz/uz/".to_string(),
            listing_timeout: Duration::from_secs(6),
            article_timeout: Duration::from_secs(10),
            cache_path: default_cache_path(),
            cache_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl FeedConfig {
    /// Defaults with `KADROVIK_FEED_BASE_URL` / `KADROVIK_FEED_CACHE`
    /// overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base) = std::env::var("KADROVIK_FEED_BASE_URL") {
            let base = ensure_trailing_slash(&base);
            config.base_url_uz = format!("{base}uz/");
            config.base_url_ru = base;
        }
        if let Ok(path) = std::env::var("KADROVIK_FEED_CACHE") {
            config.cache_path = PathBuf::from(path);
        }
        config
    }

    /// Site root for the given language. Anything other than `"uz"` is
    /// served from the Russian variant.
    pub fn base_url(&self, lang: &str) -> &str {
        if lang == "uz" {
            &self.base_url_uz
        } else {
            &self.base_url_ru
        }
    }
}

/// Default cache location: `~/.kadrovik-feed/cache.json`.
fn default_cache_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".kadrovik-feed")
        .join("cache.json")
}

fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}
