//! `kadrovik-feed latest` — newest articles from the home listing.

use anyhow::Result;

use crate::cli::print_articles;
use crate::service::FeedService;

pub async fn run(lang: &str, limit: usize, json: bool) -> Result<()> {
    let service = FeedService::from_env();
    let articles = service.get_latest(lang, limit).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&articles)?);
        return Ok(());
    }
    if articles.is_empty() {
        println!("No articles found.");
        return Ok(());
    }
    print_articles(&articles);
    Ok(())
}
