use news_agent::types::{Article, FetchConfig, FetchMethod};
use news_agent::{ContentEnricher, FeedClient, MockCompletionClient, RelevanceRanker, Summarizer};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();
}

fn article(title: &str, url: &str) -> Article {
    Article::new(
        title,
        format!("{} description", title),
        url,
        "Mon, 01 Jul 2024 10:00:00 +0000",
        "Example",
        FetchMethod::CategoryFeed,
    )
}

fn articles(n: usize) -> Vec<Article> {
    (1..=n)
        .map(|i| article(&format!("story {}", i), &format!("https://example.com/{}", i)))
        .collect()
}

fn offline_feed_client() -> Arc<FeedClient> {
    let config = FetchConfig {
        courtesy_delay_ms: 0,
        page_timeout_seconds: 1,
        max_retries: 0,
        ..FetchConfig::default()
    };
    Arc::new(FeedClient::new(config).unwrap())
}

#[tokio::test]
async fn ranker_passes_empty_input_through() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    let ranker = RelevanceRanker::new(mock);

    let ranked = ranker.rank(Vec::new(), "anything", 5).await;
    assert!(ranked.is_empty());
}

#[tokio::test]
async fn ranker_truncates_without_ranking_on_empty_query() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    let ranker = RelevanceRanker::new(mock);

    let ranked = ranker.rank(articles(5), "  ", 3).await;
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].title, "story 1");
    assert!(ranked.iter().all(|a| a.relevance_rank.is_none()));
}

#[tokio::test]
async fn ranker_applies_model_permutation() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    mock.push_text("```json\n[3, 1, 2]\n```");
    let ranker = RelevanceRanker::new(mock);

    let ranked = ranker.rank(articles(3), "stories", 3).await;
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].title, "story 3");
    assert_eq!(ranked[1].title, "story 1");
    assert_eq!(ranked[2].title, "story 2");
    assert_eq!(ranked[0].relevance_rank, Some(1));
    assert_eq!(ranked[2].relevance_rank, Some(3));
}

#[tokio::test]
async fn ranker_discards_out_of_range_indices() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    mock.push_text("[5, 2, 99, 1, 0]");
    let ranker = RelevanceRanker::new(mock);

    let ranked = ranker.rank(articles(3), "stories", 10).await;
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].title, "story 2");
    assert_eq!(ranked[1].title, "story 1");
    assert_eq!(ranked[1].relevance_rank, Some(2));
}

#[tokio::test]
async fn ranker_falls_back_to_input_order_on_malformed_reply() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    mock.push_text("these are definitely not indices");
    let ranker = RelevanceRanker::new(mock);

    let ranked = ranker.rank(articles(4), "stories", 2).await;
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].title, "story 1");
    assert!(ranked[0].relevance_rank.is_none());
}

#[tokio::test]
async fn ranker_falls_back_when_service_errors() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    mock.push_failure("quota exhausted");
    let ranker = RelevanceRanker::new(mock);

    let ranked = ranker.rank(articles(2), "stories", 5).await;
    assert_eq!(ranked.len(), 2);
}

#[tokio::test]
async fn summarizer_uses_model_for_long_text() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    mock.push_text("A tight four sentence summary.");
    let summarizer = Summarizer::new(mock).with_item_delay(Duration::ZERO);

    let mut a = article("long", "https://example.com/long");
    a.full_text = Some("word ".repeat(50));

    let out = summarizer.summarize(vec![a], 5).await;
    assert_eq!(out[0].full_summary.as_deref(), Some("A tight four sentence summary."));
    assert!(out[0].has_ai_summary);
}

#[tokio::test]
async fn summarizer_falls_back_to_leading_sentences_on_failure() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    mock.push_failure("model offline");
    let summarizer = Summarizer::new(mock).with_item_delay(Duration::ZERO);

    let mut a = article("long", "https://example.com/long");
    a.full_text = Some(
        "First sentence of the piece. Second sentence with detail. Third one here. \
         Fourth goes unused. Fifth too."
            .to_string(),
    );

    let out = summarizer.summarize(vec![a], 5).await;
    let summary = out[0].full_summary.clone().unwrap();
    assert!(summary.starts_with("First sentence"));
    assert!(summary.contains("Third one here."));
    assert!(!summary.contains("Fourth"));
    assert!(out[0].has_ai_summary);
}

#[tokio::test]
async fn summarizer_uses_description_for_short_text() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    let summarizer = Summarizer::new(mock).with_item_delay(Duration::ZERO);

    let mut a = article("short", "https://example.com/short");
    a.full_text = Some("Too short.".to_string());

    let out = summarizer.summarize(vec![a], 5).await;
    assert_eq!(out[0].full_summary.as_deref(), Some("short description"));
    assert!(!out[0].has_ai_summary);
}

#[tokio::test]
async fn summarizer_emits_placeholder_when_nothing_to_work_with() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    let summarizer = Summarizer::new(mock).with_item_delay(Duration::ZERO);

    let mut a = article("bare", "https://example.com/bare");
    a.description = String::new();

    let out = summarizer.summarize(vec![a], 5).await;
    assert_eq!(out[0].full_summary.as_deref(), Some("Summary not available."));
    assert!(!out[0].has_ai_summary);
}

#[tokio::test]
async fn summarizer_is_safe_to_rerun_on_summarized_articles() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    mock.push_text("First pass summary.");
    mock.push_text("Second pass summary.");
    let summarizer = Summarizer::new(mock).with_item_delay(Duration::ZERO);

    let mut a = article("long", "https://example.com/long");
    a.full_text = Some("word ".repeat(50));

    let once = summarizer.summarize(vec![a], 5).await;
    assert_eq!(once[0].full_summary.as_deref(), Some("First pass summary."));
    assert!(once[0].has_ai_summary);

    // Re-running re-derives the summary from the same body text
    let twice = summarizer.summarize(once, 5).await;
    assert_eq!(twice[0].full_summary.as_deref(), Some("Second pass summary."));
    assert!(twice[0].has_ai_summary);

    // A third pass with the service down degrades to the sentence fallback
    // instead of panicking or losing the article
    let thrice = summarizer.summarize(twice, 5).await;
    assert_eq!(thrice.len(), 1);
    assert!(thrice[0].full_summary.as_deref().unwrap().starts_with("word"));
    assert!(thrice[0].has_ai_summary);
}

#[tokio::test]
async fn summarizer_respects_the_limit() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    let summarizer = Summarizer::new(mock).with_item_delay(Duration::ZERO);

    let out = summarizer.summarize(articles(5), 2).await;
    assert_eq!(out.len(), 2);
}

#[tokio::test]
async fn enricher_passes_through_articles_without_urls() {
    init_tracing();
    let enricher = ContentEnricher::new(offline_feed_client()).with_item_delay(Duration::ZERO);

    let a = article("no url", "");
    let out = enricher.enrich(vec![a], 5).await;
    assert_eq!(out.len(), 1);
    assert!(!out[0].has_full_content);
    assert!(out[0].full_text.is_none());
}

#[tokio::test]
async fn enricher_degrades_gracefully_on_unreachable_hosts() {
    init_tracing();
    let enricher = ContentEnricher::new(offline_feed_client()).with_item_delay(Duration::ZERO);

    // Port 1 on loopback refuses connections immediately
    let a = article("unreachable", "http://127.0.0.1:1/article");
    let out = enricher.enrich(vec![a], 5).await;
    assert_eq!(out.len(), 1);
    assert!(!out[0].has_full_content);
    assert_eq!(out[0].title, "unreachable");
}

#[tokio::test]
async fn enricher_is_safe_to_run_twice() {
    init_tracing();
    let enricher = ContentEnricher::new(offline_feed_client()).with_item_delay(Duration::ZERO);

    let a = article("again", "http://127.0.0.1:1/article");
    let once = enricher.enrich(vec![a], 5).await;
    let twice = enricher.enrich(once.clone(), 5).await;
    assert_eq!(twice.len(), 1);
    assert_eq!(twice[0].title, once[0].title);
    assert!(!twice[0].has_full_content);
}

#[tokio::test]
async fn courtesy_delay_for_one_host_does_not_stall_others() {
    init_tracing();
    let config = FetchConfig {
        courtesy_delay_ms: 400,
        page_timeout_seconds: 1,
        max_retries: 0,
        ..FetchConfig::default()
    };
    let client = Arc::new(FeedClient::new(config).unwrap());

    // Prime the first host so its next request owes a full pause
    let _ = client.fetch_page("http://127.0.0.1:1/a").await;

    let paused = client.clone();
    let handle = tokio::spawn(async move {
        let _ = paused.fetch_page("http://127.0.0.1:1/b").await;
    });

    // Let the paused request start waiting before timing the other host
    tokio::time::sleep(Duration::from_millis(50)).await;

    let started = Instant::now();
    let _ = client.fetch_page("http://127.0.0.2:1/c").await;
    assert!(
        started.elapsed() < Duration::from_millis(300),
        "request to an unrelated host was stalled by another host's pause"
    );

    let _ = handle.await;
}

#[tokio::test]
async fn enricher_respects_the_limit() {
    init_tracing();
    let enricher = ContentEnricher::new(offline_feed_client()).with_item_delay(Duration::ZERO);

    let batch: Vec<Article> = (0..4).map(|i| article(&format!("a{}", i), "")).collect();
    let out = enricher.enrich(batch, 2).await;
    assert_eq!(out.len(), 2);
}
