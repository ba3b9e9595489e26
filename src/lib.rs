// Copyright 2026 Kadrovik Feed Contributors
// SPDX-License-Identifier: Apache-2.0

//! Content-acquisition library for kadrovik.uz.
//!
//! Fetches the site's listing, search, topic, and article pages, extracts
//! structured records through cascading selector fallbacks, and keeps a
//! disk-backed TTL cache that doubles as the degraded-mode data source
//! when the site is unreachable.

#![allow(dead_code, unused_imports)]

pub mod acquisition;
pub mod cache;
pub mod cli;
pub mod config;
pub mod service;
pub mod types;

pub use acquisition::article::ArticleText;
pub use config::FeedConfig;
pub use service::FeedService;
pub use types::{ArticleRecord, Record, TopicRecord};
