//! `kadrovik-feed topics` — the site's topic index.

use anyhow::Result;

use crate::service::FeedService;

pub async fn run(json: bool) -> Result<()> {
    let service = FeedService::from_env();
    let topics = service.get_topics().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&topics)?);
        return Ok(());
    }
    if topics.is_empty() {
        println!("No topics found.");
        return Ok(());
    }
    for (i, topic) in topics.iter().enumerate() {
        println!("{}. 📂 {}", i + 1, topic.title);
        println!("   🔗 {}", topic.url);
    }
    Ok(())
}
