//! Operation-level orchestration: the cache policy wrapped around
//! fetch + extract.
//!
//! Every operation follows the same shape: compute the cache key,
//! short-circuit on a fresh entry where the operation has a freshness
//! check, otherwise fetch and extract, persist the result, and on any
//! fetch failure serve whatever the cache holds for that key. Nothing
//! above this layer ever sees a network or parse error. Callers get a
//! list (possibly empty), or `None` for missing article text.

use tracing::{debug, warn};
use url::Url;

use crate::acquisition::article::{self, ArticleText};
use crate::acquisition::http_client::{self, FetchError};
use crate::acquisition::listing;
use crate::cache::{self, CacheEntry, CacheStore};
use crate::config::{FeedConfig, MAX_ARTICLES};
use crate::types::{ArticleRecord, PageKind, Record, TopicRecord};

/// The content-acquisition service.
///
/// Holds only configuration and the cache handle: no connection pools,
/// no in-memory cache. Cheap to construct and safe to share behind a
/// reference across tasks.
pub struct FeedService {
    config: FeedConfig,
    store: CacheStore,
}

impl FeedService {
    pub fn new(config: FeedConfig) -> Self {
        let store = CacheStore::new(config.cache_path.clone());
        Self { config, store }
    }

    /// Service with environment-derived configuration.
    pub fn from_env() -> Self {
        Self::new(FeedConfig::from_env())
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Newest articles from the language's home listing.
    pub async fn get_latest(&self, lang: &str, limit: usize) -> Vec<ArticleRecord> {
        let lang = normalize_lang(lang);
        let key = cache::latest_key(lang);
        if let Some(data) = self.fresh_entry(&key) {
            return into_articles(data);
        }
        let url = self.config.base_url(lang).to_string();
        self.acquire(&key, &url, PageKind::Listing, limit, lang)
            .await
    }

    /// Articles matching a search query.
    pub async fn search(&self, query: &str, lang: &str) -> Vec<ArticleRecord> {
        let lang = normalize_lang(lang);
        let key = cache::search_key(query, lang);
        if let Some(data) = self.fresh_entry(&key) {
            return into_articles(data);
        }
        let url = self.search_url(query, lang);
        self.acquire(&key, &url, PageKind::SearchResults, MAX_ARTICLES, lang)
            .await
    }

    /// The site's topic index. No freshness short-circuit: topics are
    /// always refetched, and the cache is fallback only.
    pub async fn get_topics(&self) -> Vec<TopicRecord> {
        let key = cache::topics_key();
        let url = self.config.base_url("ru").to_string();
        let records = self
            .acquire_records(&key, &url, PageKind::TopicIndex, MAX_ARTICLES, "ru")
            .await;
        records.into_iter().filter_map(Record::into_topic).collect()
    }

    /// Articles listed on a topic page. Like topics, fallback-only
    /// caching.
    pub async fn get_topic_articles(&self, topic_url: &str, limit: usize) -> Vec<ArticleRecord> {
        let key = cache::topic_key(topic_url);
        let lang = lang_of_url(topic_url);
        let records = self
            .acquire_records(&key, topic_url, PageKind::TopicArticles, limit, lang)
            .await;
        into_articles(records)
    }

    /// Full text of one article. Uncached: the output is a rendered
    /// string, not a record list, so it does not fit the cache entry
    /// model. `None` means no text could be produced, distinct from an
    /// article whose body happens to be empty prose.
    pub async fn get_article_text(&self, url: &str) -> Option<ArticleText> {
        match http_client::fetch(url, self.config.article_timeout).await {
            Ok(html) => article::extract_article(&html),
            Err(err) => {
                log_fetch_failure(url, &err);
                None
            }
        }
    }

    // ── Shared plumbing ──────────────────────────────────────────────────

    async fn acquire(
        &self,
        key: &str,
        url: &str,
        kind: PageKind,
        limit: usize,
        lang: &str,
    ) -> Vec<ArticleRecord> {
        into_articles(self.acquire_records(key, url, kind, limit, lang).await)
    }

    /// Fetch + extract, persist on success, fall back to the cache on
    /// failure. An empty extraction is a success and overwrites the
    /// entry.
    async fn acquire_records(
        &self,
        key: &str,
        url: &str,
        kind: PageKind,
        limit: usize,
        lang: &str,
    ) -> Vec<Record> {
        let base = self.config.base_url(lang).to_string();
        match http_client::fetch(url, self.config.listing_timeout).await {
            Ok(html) => {
                let records = listing::extract(&html, kind, limit, &base);
                debug!(key, count = records.len(), "extraction finished");
                self.store_records(key, &records);
                records
            }
            Err(err) => {
                log_fetch_failure(url, &err);
                self.cached(key)
            }
        }
    }

    fn fresh_entry(&self, key: &str) -> Option<Vec<Record>> {
        let map = self.store.load();
        let entry = map.get(key)?;
        if !entry.is_fresh(self.config.cache_ttl) {
            return None;
        }
        debug!(key, "serving fresh cache entry");
        Some(entry.data.clone())
    }

    fn cached(&self, key: &str) -> Vec<Record> {
        self.store
            .load()
            .get(key)
            .map(|entry| entry.data.clone())
            .unwrap_or_default()
    }

    fn store_records(&self, key: &str, records: &[Record]) {
        let mut map = self.store.load();
        map.insert(key.to_string(), CacheEntry::now(records.to_vec()));
        if let Err(err) = self.store.save(&map) {
            // Never let a cache-write failure block fresh data.
            warn!(key, "cache write failed: {err:#}");
        }
    }

    fn search_url(&self, query: &str, lang: &str) -> String {
        let base = self.config.base_url(lang);
        match Url::parse(base).and_then(|u| u.join("search")) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair("q", query);
                url.to_string()
            }
            Err(_) => format!("{base}search?q={query}"),
        }
    }
}

fn normalize_lang(lang: &str) -> &'static str {
    if lang == "uz" {
        "uz"
    } else {
        "ru"
    }
}

/// Language variant implied by a caller-supplied site URL.
fn lang_of_url(url: &str) -> &'static str {
    let is_uz = Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next().map(|s| s == "uz"))
        })
        .unwrap_or(false);
    if is_uz {
        "uz"
    } else {
        "ru"
    }
}

fn into_articles(records: Vec<Record>) -> Vec<ArticleRecord> {
    records
        .into_iter()
        .filter_map(Record::into_article)
        .collect()
}

fn log_fetch_failure(url: &str, err: &FetchError) {
    if err.is_timeout() {
        warn!(%url, "fetch timed out, serving cached data");
    } else {
        warn!(%url, "fetch failed ({err}), serving cached data");
    }
}
