//! `kadrovik-feed search` — keyword search over the site's articles.

use anyhow::Result;

use crate::cli::print_articles;
use crate::service::FeedService;

pub async fn run(query: &str, lang: &str, json: bool) -> Result<()> {
    let service = FeedService::from_env();
    let articles = service.search(query, lang).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&articles)?);
        return Ok(());
    }
    if articles.is_empty() {
        println!("Nothing found for '{query}'.");
        return Ok(());
    }
    println!("Results for '{query}':");
    print_articles(&articles);
    Ok(())
}
