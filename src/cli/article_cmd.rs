//! `kadrovik-feed article` — full text of one article.

use anyhow::Result;

use crate::service::FeedService;

pub async fn run(url: &str, json: bool) -> Result<()> {
    let service = FeedService::from_env();
    let text = service.get_article_text(url).await;

    if json {
        match text {
            Some(article) => println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "title": article.title,
                    "date": article.date,
                    "body": article.body,
                }))?
            ),
            None => println!("null"),
        }
        return Ok(());
    }

    match text {
        Some(article) => {
            println!("📰 {}", article.title);
            if !article.date.is_empty() {
                println!("📅 {}", article.date);
            }
            println!("🔗 {url}");
            println!();
            println!("{}", article.body);
        }
        None => println!("No article text available."),
    }
    Ok(())
}
