//! `kadrovik-feed topic-articles` — articles listed on a topic page.

use anyhow::Result;

use crate::cli::print_articles;
use crate::service::FeedService;

pub async fn run(url: &str, limit: usize, json: bool) -> Result<()> {
    let service = FeedService::from_env();
    let articles = service.get_topic_articles(url, limit).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&articles)?);
        return Ok(());
    }
    if articles.is_empty() {
        println!("No articles found for this topic.");
        return Ok(());
    }
    print_articles(&articles);
    Ok(())
}
