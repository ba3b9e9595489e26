//! Disk-backed feed cache.
//!
//! One JSON document maps cache keys to timestamped record lists. The
//! store is read in full before every lookup and rewritten in full after
//! every write; there is no long-lived in-memory copy, so staleness is
//! bounded by the entry timestamps alone, not by process lifetime. A
//! missing or corrupt file is simply an empty cache.
//!
//! Freshness is a property of an entry, evaluated by the service against
//! its configured TTL. The store itself never drops stale entries: they
//! remain the fallback data when a live fetch fails.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::Record;

/// One timestamped extraction result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// RFC 3339 timestamp of the extraction that produced `data`.
    pub timestamp: String,
    pub data: Vec<Record>,
}

impl CacheEntry {
    /// Entry stamped with the current time.
    pub fn now(data: Vec<Record>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            data,
        }
    }

    /// Whether the entry is still usable without a refetch.
    ///
    /// Unparseable timestamps count as stale, never as errors. Naive
    /// timestamps (older deployments wrote local time without an offset)
    /// are read as UTC.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        let Some(stamp) = parse_timestamp(&self.timestamp) else {
            return false;
        };
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return false;
        };
        Utc::now().signed_duration_since(stamp) < ttl
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Whole-file JSON store.
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the entire store. Absent or unreadable files are an empty
    /// store, never an error.
    pub fn load(&self) -> HashMap<String, CacheEntry> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no cache file yet");
                return HashMap::new();
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "cache read failed: {err}");
                return HashMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "cache file corrupt, starting empty: {err}");
                HashMap::new()
            }
        }
    }

    /// Rewrite the entire store.
    pub fn save(&self, map: &HashMap<String, CacheEntry>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create cache dir: {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(map).context("failed to serialize cache")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write cache file: {}", self.path.display()))
    }

    /// Remove the backing file. Absence is fine.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| {
                format!("failed to remove cache file: {}", self.path.display())
            }),
        }
    }
}

// ── Cache keys ───────────────────────────────────────────────────────────────
//
// Deterministic strings from (operation, normalized query, language). A key
// always maps to the most recent successful extraction for its triple.

pub fn latest_key(lang: &str) -> String {
    format!("latest_{lang}")
}

pub fn search_key(query: &str, lang: &str) -> String {
    format!("search_{}_{}", normalize_query(query), lang)
}

pub fn topics_key() -> String {
    "topics".to_string()
}

/// Keyed by the topic's URL slug so the same topic hits the same entry
/// regardless of how the caller spelled the rest of the URL.
pub fn topic_key(topic_url: &str) -> String {
    let slug = Url::parse(topic_url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
                .map(str::to_string)
        })
        .unwrap_or_else(|| topic_url.trim_matches('/').to_string());
    format!("topic_{slug}")
}

fn normalize_query(query: &str) -> String {
    query
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
