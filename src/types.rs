//! Record types and shared constants for the acquisition pipeline.
//!
//! Records are created fresh on every extraction and never mutated; the
//! serialized field set matches the historical `cache.json` layout so old
//! cache files stay readable across upgrades.

use serde::{Deserialize, Serialize};

/// Placeholder title for items whose heading could not be extracted.
pub const DEFAULT_TITLE: &str = "Без заголовка";

/// Marker attached to every article record.
pub const ARTICLE_EMOJI: &str = "📰";

/// Content snippets are cut at this many characters (plus an ellipsis).
/// Consumers display records inside size-constrained messages.
pub const SNIPPET_MAX_CHARS: usize = 200;

/// A single article or news item extracted from a listing, search, or
/// topic page.
///
/// Identity is the absolute `url`; there is no dedup by title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Never empty; falls back to [`DEFAULT_TITLE`].
    pub title: String,
    /// Snippet text, possibly empty, truncated at [`SNIPPET_MAX_CHARS`].
    pub content: String,
    /// Site-native date string, or an RFC 3339 timestamp fallback.
    pub date: String,
    pub emoji: String,
    /// Absolute URL of the article on the source site.
    pub url: String,
}

/// A taxonomy entry from the site's topic index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    pub title: String,
    pub url: String,
}

/// Either record shape, as persisted in one cache entry.
///
/// Untagged so the on-disk form is the plain record object. Article is
/// tried first: a topic object lacks the article-only fields and falls
/// through to the second variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    Article(ArticleRecord),
    Topic(TopicRecord),
}

impl Record {
    pub fn into_article(self) -> Option<ArticleRecord> {
        match self {
            Record::Article(a) => Some(a),
            Record::Topic(_) => None,
        }
    }

    pub fn into_topic(self) -> Option<TopicRecord> {
        match self {
            Record::Topic(t) => Some(t),
            Record::Article(_) => None,
        }
    }
}

/// Which template a fetched page is expected to follow.
///
/// Chosen by the caller per operation; the extractor never guesses the
/// page shape from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Home page with the main posts list.
    Listing,
    /// Search results page.
    SearchResults,
    /// Taxonomy index listing topics.
    TopicIndex,
    /// Per-topic page with its selected articles.
    TopicArticles,
}
