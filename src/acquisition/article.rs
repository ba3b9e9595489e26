//! Full-text extraction for a single article page.
//!
//! Unlike the listing extractor this is not list-based: one page yields at
//! most one [`ArticleText`]. Paragraphs and emphasized lead-ins are walked
//! in document order; the site habitually repeats lead-ins back to back,
//! so consecutive duplicate segments are dropped. A result whose combined
//! body is shorter than [`MIN_BODY_CHARS`] is treated as an extraction
//! failure, not as content.

use scraper::{Html, Selector};

use super::listing::element_text;
use crate::types::DEFAULT_TITLE;

const ARTICLE_DATE: &str = "time.longread-post__time-published";
const ARTICLE_BODY: &str = "section.longread-block";
const BODY_ELEMENTS: &str = "p, strong";

/// Bodies shorter than this are rejected as extraction misses.
const MIN_BODY_CHARS: usize = 50;

/// Marker prefixed to emphasized lead-in lines.
const LEAD_IN_MARKER: &str = "🔹";

/// Full text of one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleText {
    /// First top-level heading, or the placeholder title.
    pub title: String,
    /// Machine-readable publish timestamp, empty when the page has none.
    pub date: String,
    /// Rendered body: paragraphs interleaved with marked lead-in lines.
    pub body: String,
}

/// Extract the article body, or `None` when the page yields nothing
/// usable.
pub fn extract_article(html: &str) -> Option<ArticleText> {
    let document = Html::parse_document(html);

    let title_sel = Selector::parse("h1").expect("h1 selector is valid");
    let title = document
        .select(&title_sel)
        .next()
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let date_sel = Selector::parse(ARTICLE_DATE).expect("date selector is valid");
    let date = document
        .select(&date_sel)
        .next()
        .and_then(|el| el.value().attr("datetime"))
        .unwrap_or("")
        .to_string();

    let body_sel = Selector::parse(ARTICLE_BODY).expect("body selector is valid");
    let fallback_sel = Selector::parse("body").expect("body selector is valid");
    let container = document
        .select(&body_sel)
        .next()
        .or_else(|| document.select(&fallback_sel).next())?;

    let segment_sel = Selector::parse(BODY_ELEMENTS).expect("segment selector is valid");
    let mut segments: Vec<String> = Vec::new();
    for el in container.select(&segment_sel) {
        let text = element_text(&el);
        if text.is_empty() {
            continue;
        }
        let rendered = if el.value().name() == "strong" {
            format!("\n \n{LEAD_IN_MARKER} {text}\n")
        } else {
            text
        };
        if segments.last().is_some_and(|last| *last == rendered) {
            continue;
        }
        segments.push(rendered);
    }

    let body = segments.concat();
    if body.chars().count() < MIN_BODY_CHARS {
        return None;
    }
    Some(ArticleText { title, date, body })
}
