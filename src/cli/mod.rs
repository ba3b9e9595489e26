//! CLI subcommand implementations for the `kadrovik-feed` binary.

pub mod article_cmd;
pub mod cache_cmd;
pub mod latest_cmd;
pub mod search_cmd;
pub mod topic_articles_cmd;
pub mod topics_cmd;

use crate::types::ArticleRecord;

/// Render a numbered article list the way every list command does.
pub(crate) fn print_articles(articles: &[ArticleRecord]) {
    for (i, article) in articles.iter().enumerate() {
        println!("{}. {} {}", i + 1, article.emoji, article.title);
        if !article.date.is_empty() {
            println!("   📅 {}", article.date);
        }
        if !article.content.is_empty() {
            println!("   {}", article.content);
        }
        println!("   🔗 {}", article.url);
    }
}
