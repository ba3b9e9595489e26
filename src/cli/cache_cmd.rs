//! `kadrovik-feed cache` — cache maintenance.

use anyhow::Result;

use crate::service::FeedService;

pub fn run_clear() -> Result<()> {
    let service = FeedService::from_env();
    service.store().clear()?;
    println!("Cache cleared: {}", service.store().path().display());
    Ok(())
}
