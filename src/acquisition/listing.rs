//! List-record extraction over the site's known page shapes.
//!
//! One entry point, four page kinds. Each kind tries its primary selector
//! pattern first; the home listing additionally falls back through
//! progressively more generic link patterns when the primary yields
//! nothing. The fallback chain is fixed-priority and short-circuits on the
//! first pattern that matches anything.
//!
//! Missing sub-elements never fail extraction: they reduce the result
//! count or fall back to placeholder values. All entry points are
//! **synchronous** because the `scraper` document types are `!Send`;
//! callers must not hold a parsed document across an await point.

use std::collections::HashSet;

use chrono::{Local, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::types::{
    ArticleRecord, PageKind, Record, TopicRecord, ARTICLE_EMOJI, DEFAULT_TITLE, SNIPPET_MAX_CHARS,
};

// ── Selector patterns ────────────────────────────────────────────────────────

/// Primary home-listing pattern: both card wrapper shapes the site uses.
const LISTING_ITEMS: &str = "ul.posts-list li.post-card-wrapper, \
     ul.posts-list li.post-card--horizontal-wrapper";
const LISTING_TITLE: &str = "h4.post-card__title";
const LISTING_DATE: &str = "time.longread-post__time-published";

const SEARCH_ITEMS: &str = "ol.results li";
const SEARCH_DATE: &str = "span.date";

const TOPIC_INDEX_LINKS: &str = "ul.taxonomies-list a[href]";
const TOPIC_ARTICLE_LINKS: &str = "ul.selected-posts-list li a[href]";
const TOPIC_ARTICLE_TITLE: &str = "h4";

/// The topic index never returns more than this many entries.
const TOPIC_INDEX_CAP: usize = 10;

/// Fallback link patterns for the home listing, most specific first. The
/// first pattern that matches any anchors wins.
const LISTING_FALLBACK_PATTERNS: &[&str] = &[
    "a[href*='/publish/']",
    "a[href*='/article/']",
    ".article-link",
    ".publication-link",
    "article a",
    ".content a[href]",
    "main a[href]",
];

/// URL substrings that mark an anchor as article-like in the last-resort
/// scan over every link on the page.
const ARTICLE_HREF_MARKERS: &[&str] = &["/publish/", "/article/", "/news/"];

/// URL substrings that disqualify an anchor in the last-resort scan.
const ARTICLE_HREF_SKIP: &[&str] = &["search", "group", "recent_publications"];

/// Russian genitive month names, for free-text date detection.
const MONTH_NAMES: &[&str] = &[
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Sibling text fragments shorter than this are ignored when building a
/// content snippet.
const SNIPPET_MIN_FRAGMENT_CHARS: usize = 10;

// ── Main entry point ─────────────────────────────────────────────────────────

/// Extract structured records from raw HTML for the given page kind.
///
/// Never fails: a document matching none of the kind's patterns yields an
/// empty vector, and individual items missing sub-elements are defaulted
/// or skipped rather than aborting the rest.
pub fn extract(html: &str, kind: PageKind, limit: usize, base_url: &str) -> Vec<Record> {
    let document = Html::parse_document(html);
    match kind {
        PageKind::Listing => extract_listing(&document, limit, base_url)
            .into_iter()
            .map(Record::Article)
            .collect(),
        PageKind::SearchResults => extract_search(&document, limit, base_url)
            .into_iter()
            .map(Record::Article)
            .collect(),
        PageKind::TopicIndex => extract_topic_index(&document, limit, base_url)
            .into_iter()
            .map(Record::Topic)
            .collect(),
        PageKind::TopicArticles => extract_topic_articles(&document, limit, base_url)
            .into_iter()
            .map(Record::Article)
            .collect(),
    }
}

// ── Home listing ─────────────────────────────────────────────────────────────

/// Primary strategy: the structured posts list. Falls back to the generic
/// link chain when it matches nothing.
fn extract_listing(document: &Html, limit: usize, base_url: &str) -> Vec<ArticleRecord> {
    let mut articles = Vec::new();

    if let Ok(item_sel) = Selector::parse(LISTING_ITEMS) {
        let link_sel = Selector::parse("a[href]").expect("link selector is valid");
        let title_sel = Selector::parse(LISTING_TITLE).expect("title selector is valid");
        let date_sel = Selector::parse(LISTING_DATE).expect("date selector is valid");

        for item in document.select(&item_sel).take(limit) {
            let href = item
                .select(&link_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .unwrap_or("");
            let title = item
                .select(&title_sel)
                .next()
                .map(|el| element_text(&el))
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string());
            let date = item
                .select(&date_sel)
                .next()
                .map(|el| element_text(&el))
                .filter(|d| !d.is_empty())
                .unwrap_or_else(today_site_format);

            articles.push(ArticleRecord {
                title,
                content: String::new(),
                date,
                emoji: ARTICLE_EMOJI.to_string(),
                url: absolutize(base_url, href),
            });
        }
    }

    if articles.is_empty() {
        articles = listing_fallback(document, limit, base_url);
    }
    articles
}

/// Fallback chain for the home listing: try each pattern in
/// [`LISTING_FALLBACK_PATTERNS`] in order, then a last-resort scan over
/// every anchor with an article-like href. Candidate links are deduplicated
/// by absolute URL and at most `2 × limit` of them are examined.
fn listing_fallback(document: &Html, limit: usize, base_url: &str) -> Vec<ArticleRecord> {
    let mut candidates: Vec<ElementRef<'_>> = Vec::new();

    for pattern in LISTING_FALLBACK_PATTERNS {
        if let Ok(sel) = Selector::parse(pattern) {
            let links: Vec<_> = document.select(&sel).collect();
            if !links.is_empty() {
                tracing::debug!(pattern, count = links.len(), "listing fallback pattern matched");
                candidates = links;
                break;
            }
        }
    }

    if candidates.is_empty() {
        if let Ok(sel) = Selector::parse("a[href]") {
            candidates = document
                .select(&sel)
                .filter(|a| {
                    let href = a.value().attr("href").unwrap_or("");
                    ARTICLE_HREF_MARKERS.iter().any(|m| href.contains(m))
                        && !ARTICLE_HREF_SKIP.iter().any(|s| href.contains(s))
                })
                .collect();
            tracing::debug!(count = candidates.len(), "last-resort anchor scan");
        }
    }

    let mut articles = Vec::new();
    let mut seen = HashSet::new();

    for link in candidates.into_iter().take(limit * 2) {
        if articles.len() >= limit {
            break;
        }
        let href = link.value().attr("href").unwrap_or("");
        if href.is_empty() {
            continue;
        }
        let url = absolutize(base_url, href);
        if !seen.insert(url.clone()) {
            continue;
        }

        let title = element_text(&link);
        if title.is_empty() {
            continue;
        }

        let parent = link.parent().and_then(ElementRef::wrap);
        let date = parent
            .and_then(find_nearby_date)
            .unwrap_or_else(|| Utc::now().to_rfc3339());
        let content = parent
            .map(|p| sibling_snippet(p, &title))
            .unwrap_or_default();

        articles.push(ArticleRecord {
            title,
            content,
            date,
            emoji: ARTICLE_EMOJI.to_string(),
            url,
        });
    }
    articles
}

/// Look for a date near a candidate link: a `time` element, a
/// `.date`-classed element, or free text containing a month name.
fn find_nearby_date(parent: ElementRef<'_>) -> Option<String> {
    let time_sel = Selector::parse("time").expect("time selector is valid");
    if let Some(el) = parent.select(&time_sel).next() {
        let text = element_text(&el);
        if !text.is_empty() {
            return Some(text);
        }
    }

    let date_sel = Selector::parse(".date").expect("date selector is valid");
    if let Some(el) = parent.select(&date_sel).next() {
        let text = element_text(&el);
        if !text.is_empty() {
            return Some(text);
        }
    }

    let month_re = Regex::new(&format!(
        r"\d{{1,2}}\s+(?:{})(?:\s+\d{{4}})?",
        MONTH_NAMES.join("|")
    ))
    .expect("month regex is valid");
    for chunk in parent.text() {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        if let Some(found) = month_re.find(chunk) {
            return Some(found.as_str().to_string());
        }
        if MONTH_NAMES.iter().any(|name| chunk.contains(name)) {
            return Some(collapse_ws(chunk));
        }
    }
    None
}

/// Build a content snippet from up to two text fragments under the link's
/// parent, skipping the title itself and anything too short to be prose.
fn sibling_snippet(parent: ElementRef<'_>, title: &str) -> String {
    let mut parts = Vec::new();
    for chunk in parent.text() {
        let chunk = chunk.trim();
        if chunk.is_empty() || chunk == title {
            continue;
        }
        if chunk.chars().count() <= SNIPPET_MIN_FRAGMENT_CHARS {
            continue;
        }
        parts.push(chunk.to_string());
        if parts.len() == 2 {
            break;
        }
    }
    truncate_snippet(&collapse_ws(&parts.join(" ")))
}

// ── Search results ───────────────────────────────────────────────────────────

/// Search results keep the site's older structure: an ordered list where
/// each item holds the link, a date span, and loose snippet text.
fn extract_search(document: &Html, limit: usize, base_url: &str) -> Vec<ArticleRecord> {
    let Ok(item_sel) = Selector::parse(SEARCH_ITEMS) else {
        return Vec::new();
    };
    let link_sel = Selector::parse("a").expect("link selector is valid");
    let date_sel = Selector::parse(SEARCH_DATE).expect("date selector is valid");

    let mut articles = Vec::new();
    for item in document.select(&item_sel).take(limit) {
        let link = item.select(&link_sel).next();
        let date_el = item.select(&date_sel).next();

        let href = link.and_then(|a| a.value().attr("href")).unwrap_or("");
        let title = link
            .map(|a| element_text(&a))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let date = date_el
            .map(|el| element_text(&el))
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        // The snippet is whatever text remains once the link and the date
        // span are taken out of the item.
        let content = truncate_snippet(&text_excluding(item, &[link, date_el]));

        articles.push(ArticleRecord {
            title,
            content,
            date,
            emoji: ARTICLE_EMOJI.to_string(),
            url: absolutize(base_url, href),
        });
    }
    articles
}

/// Collect an item's text while skipping the subtrees of the given
/// elements.
fn text_excluding(item: ElementRef<'_>, excluded: &[Option<ElementRef<'_>>]) -> String {
    let excluded_ids: Vec<_> = excluded.iter().flatten().map(|el| el.id()).collect();
    let mut parts = Vec::new();
    for node in item.descendants() {
        if let Some(text) = node.value().as_text() {
            if node.ancestors().any(|a| excluded_ids.contains(&a.id())) {
                continue;
            }
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
    }
    collapse_ws(&parts.join(" "))
}

// ── Topic index ──────────────────────────────────────────────────────────────

/// Taxonomy anchors, title and URL only, hard-capped at
/// [`TOPIC_INDEX_CAP`].
fn extract_topic_index(document: &Html, limit: usize, base_url: &str) -> Vec<TopicRecord> {
    let Ok(sel) = Selector::parse(TOPIC_INDEX_LINKS) else {
        return Vec::new();
    };

    document
        .select(&sel)
        .filter_map(|a| {
            let title = element_text(&a);
            if title.is_empty() {
                return None;
            }
            let href = a.value().attr("href").unwrap_or("");
            Some(TopicRecord {
                title,
                url: absolutize(base_url, href),
            })
        })
        .take(limit.min(TOPIC_INDEX_CAP))
        .collect()
}

// ── Topic articles ───────────────────────────────────────────────────────────

/// Per-topic "selected content" anchors. The page exposes no per-article
/// date, so records carry today's date and an empty snippet.
fn extract_topic_articles(document: &Html, limit: usize, base_url: &str) -> Vec<ArticleRecord> {
    let Ok(sel) = Selector::parse(TOPIC_ARTICLE_LINKS) else {
        return Vec::new();
    };
    let title_sel = Selector::parse(TOPIC_ARTICLE_TITLE).expect("title selector is valid");

    document
        .select(&sel)
        .take(limit)
        .map(|a| {
            let title = a
                .select(&title_sel)
                .next()
                .map(|el| element_text(&el))
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string());
            let href = a.value().attr("href").unwrap_or("");
            ArticleRecord {
                title,
                content: String::new(),
                date: today_site_format(),
                emoji: ARTICLE_EMOJI.to_string(),
                url: absolutize(base_url, href),
            }
        })
        .collect()
}

// ── Shared helpers ───────────────────────────────────────────────────────────

/// Visible text of an element, trimmed and whitespace-collapsed.
pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    collapse_ws(&el.text().collect::<Vec<_>>().join(" "))
}

pub(crate) fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Prefix root-relative hrefs with the site origin; absolute URLs pass
/// through untouched.
pub(crate) fn absolutize(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        href.trim_start_matches('/')
    )
}

fn truncate_snippet(text: &str) -> String {
    if text.chars().count() > SNIPPET_MAX_CHARS {
        let cut: String = text.chars().take(SNIPPET_MAX_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Today in the site's own date format.
fn today_site_format() -> String {
    Local::now().format("%d.%m.%Y").to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────
