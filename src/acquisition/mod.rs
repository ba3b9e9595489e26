//! HTTP-based acquisition engine for the source site.
//!
//! Three layers: a single-shot [`http_client`] fetch with a browser
//! identity, list-record extraction over the known page shapes
//! ([`listing`]), and full-text extraction for a single article page
//! ([`article`]). Extraction is pure and synchronous; only the fetch
//! suspends.

pub mod article;
pub mod http_client;
pub mod listing;
