//! Service-level acquisition tests against a mock source site.
//!
//! Covers the cache policy end-to-end: fresh-entry short-circuit, fallback
//! to cached data on fetch failure, and the write-through after successful
//! extraction.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kadrovik_feed::cache::{self, CacheEntry, CacheStore};
use kadrovik_feed::types::{ArticleRecord, Record, ARTICLE_EMOJI};
use kadrovik_feed::{FeedConfig, FeedService};

const LISTING_PAGE: &str = r#"
<html><body>
    <ul class="posts-list">
        <li class="post-card-wrapper">
            <a href="/publish/doc1"><h4 class="post-card__title">Первая статья</h4></a>
            <time class="longread-post__time-published">01.12.2024</time>
        </li>
        <li class="post-card-wrapper">
            <a href="/publish/doc2"><h4 class="post-card__title">Вторая статья</h4></a>
            <time class="longread-post__time-published">30.11.2024</time>
        </li>
    </ul>
</body></html>
"#;

const SEARCH_PAGE: &str = r#"
<html><body>
    <ol class="results">
        <li><a href="/publish/doc1">Отпуск и его оформление</a>
            <span class="date">12.05.2024</span> Описание первого результата.</li>
        <li><a href="/publish/doc2">Отпуск без сохранения</a> Описание второго.</li>
        <li><a href="/publish/doc3">Учебный отпуск</a>
            <span class="date">10.05.2024</span></li>
    </ol>
</body></html>
"#;

const TOPICS_PAGE: &str = r#"
<html><body>
    <ul class="taxonomies-list">
        <li><a href="/taxonomy/otpuska">Отпуска</a></li>
        <li><a href="/taxonomy/zarplata">Зарплата</a></li>
    </ul>
</body></html>
"#;

const ARTICLE_PAGE: &str = r#"
<html><body>
    <h1>Заголовок статьи</h1>
    <section class="longread-block">
        <p>Достаточно длинный текст статьи, который уверенно проходит
           проверку на минимальный объем извлеченного содержимого.</p>
    </section>
</body></html>
"#;

fn test_service(server: &MockServer, cache_dir: &TempDir) -> FeedService {
    FeedService::new(test_config(server, cache_dir))
}

fn test_config(server: &MockServer, cache_dir: &TempDir) -> FeedConfig {
    FeedConfig {
        base_url_ru: format!("{}/", server.uri()),
        base_url_uz: format!("{}/uz/", server.uri()),
        listing_timeout: Duration::from_millis(500),
        article_timeout: Duration::from_millis(500),
        cache_path: cache_dir.path().join("cache.json"),
        cache_ttl: Duration::from_secs(24 * 60 * 60),
    }
}

fn cached_article(n: u32) -> Record {
    Record::Article(ArticleRecord {
        title: format!("Статья из кэша {n}"),
        content: String::new(),
        date: "01.11.2024".to_string(),
        emoji: ARTICLE_EMOJI.to_string(),
        url: format!("https://kadrovik.uz/publish/cached{n}"),
    })
}

fn seed_cache(config: &FeedConfig, key: &str, records: Vec<Record>, age: chrono::Duration) {
    let store = CacheStore::new(config.cache_path.clone());
    let mut map = HashMap::new();
    map.insert(
        key.to_string(),
        CacheEntry {
            timestamp: (Utc::now() - age).to_rfc3339(),
            data: records,
        },
    );
    store.save(&map).unwrap();
}

#[tokio::test]
async fn fresh_cache_entry_short_circuits_the_fetch() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let service = test_service(&server, &cache_dir);
    let first = service.get_latest("ru", 5).await;
    assert_eq!(first.len(), 2);

    // Second call inside the freshness window: no second request
    // (the mock's expect(1) is verified when the server drops).
    let second = service.get_latest("ru", 5).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn non_200_status_falls_back_to_cached_records() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let config = test_config(&server, &cache_dir);

    // Stale entry: forces a refetch, which fails with a 500.
    seed_cache(
        &config,
        &cache::latest_key("ru"),
        (1..=4).map(cached_article).collect(),
        chrono::Duration::hours(30),
    );
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = FeedService::new(config);
    let articles = service.get_latest("ru", 5).await;
    assert_eq!(articles.len(), 4);
    assert_eq!(articles[0].title, "Статья из кэша 1");
}

#[tokio::test]
async fn timeout_falls_back_to_cached_records() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let config = test_config(&server, &cache_dir);

    seed_cache(
        &config,
        &cache::latest_key("ru"),
        vec![cached_article(1)],
        chrono::Duration::hours(30),
    );
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let service = FeedService::new(config);
    let articles = service.get_latest("ru", 5).await;
    assert_eq!(articles.len(), 1);
}

#[tokio::test]
async fn failure_with_no_cache_entry_yields_empty() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let service = test_service(&server, &cache_dir);
    assert!(service.get_latest("ru", 5).await.is_empty());
    assert!(service.search("отпуск", "ru").await.is_empty());
    assert!(service.get_topics().await.is_empty());
}

#[tokio::test]
async fn search_extracts_and_writes_through_to_the_cache() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "отпуск"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
        .mount(&server)
        .await;

    let service = test_service(&server, &cache_dir);
    let articles = service.search("отпуск", "ru").await;
    assert_eq!(articles.len(), 3);
    assert_eq!(articles[0].title, "Отпуск и его оформление");
    assert_eq!(articles[0].date, "12.05.2024");
    // The item without a date span gets a timestamp default.
    assert!(articles[1].date.contains('T'));

    let stored = service.store().load();
    let entry = &stored[&cache::search_key("отпуск", "ru")];
    assert_eq!(entry.data.len(), 3);
}

#[tokio::test]
async fn successful_empty_extraction_overwrites_the_entry() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let config = test_config(&server, &cache_dir);

    seed_cache(
        &config,
        &cache::latest_key("ru"),
        vec![cached_article(1)],
        chrono::Duration::hours(30),
    );
    // The site answers, but with a page that matches no strategy.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let service = FeedService::new(config);
    assert!(service.get_latest("ru", 5).await.is_empty());

    // An empty extraction is a success and replaces the old entry.
    let stored = service.store().load();
    assert!(stored[&cache::latest_key("ru")].data.is_empty());
}

#[tokio::test]
async fn topics_are_always_refetched_and_cached_for_fallback() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TOPICS_PAGE))
        .expect(2)
        .mount(&server)
        .await;

    let service = test_service(&server, &cache_dir);
    let topics = service.get_topics().await;
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0].title, "Отпуска");
    assert!(topics[0].url.ends_with("/taxonomy/otpuska"));

    // No freshness short-circuit: a second call fetches again.
    let again = service.get_topics().await;
    assert_eq!(topics, again);
}

#[tokio::test]
async fn article_text_is_none_on_fetch_failure_and_uncached() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/publish/doc1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/publish/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let service = test_service(&server, &cache_dir);

    let text = service
        .get_article_text(&format!("{}/publish/doc1", server.uri()))
        .await
        .unwrap();
    assert_eq!(text.title, "Заголовок статьи");
    assert!(text.body.contains("Достаточно длинный текст"));

    let gone = service
        .get_article_text(&format!("{}/publish/gone", server.uri()))
        .await;
    assert!(gone.is_none());

    // Article text never touches the cache file.
    assert!(service.store().load().is_empty());
}

#[tokio::test]
async fn topic_articles_come_from_the_topic_page() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    let topic_page = r#"
    <html><body>
        <ul class="selected-posts-list">
            <li><a href="/publish/doc1"><h4>Материал раз</h4></a></li>
            <li><a href="/publish/doc2"><h4>Материал два</h4></a></li>
            <li><a href="/publish/doc3"><h4>Материал три</h4></a></li>
        </ul>
    </body></html>
    "#;
    Mock::given(method("GET"))
        .and(path("/taxonomy/otpuska"))
        .respond_with(ResponseTemplate::new(200).set_body_string(topic_page))
        .mount(&server)
        .await;

    let service = test_service(&server, &cache_dir);
    let articles = service
        .get_topic_articles(&format!("{}/taxonomy/otpuska", server.uri()), 2)
        .await;
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].title, "Материал раз");
    assert!(articles[0].content.is_empty());

    let stored = service.store().load();
    assert_eq!(stored["topic_otpuska"].data.len(), 2);
}
