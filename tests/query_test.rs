use news_agent::{Category, MockCompletionClient, NewsError, QueryInterpreter};
use std::sync::Arc;

fn interpreter(mock: &Arc<MockCompletionClient>) -> QueryInterpreter {
    QueryInterpreter::new(mock.clone())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();
}

#[tokio::test]
async fn extracts_explicit_counts() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    let interpreter = interpreter(&mock);

    let cases = [
        ("give me 7 articles", Some(7)),
        ("show 20", Some(20)),
        ("latest 3 news", Some(3)),
        ("2 news about AI", Some(2)),
        ("75 articles about space", Some(50)),
        ("latest AI news", None),
    ];

    for (query, expected) in cases {
        mock.push_failure("offline");
        let intent = interpreter.interpret(query).await.unwrap();
        assert_eq!(intent.requested_count, expected, "query: {}", query);
    }
}

#[tokio::test]
async fn empty_query_is_rejected() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    let interpreter = interpreter(&mock);

    let err = interpreter.interpret("   ").await.unwrap_err();
    assert!(matches!(err, NewsError::EmptyQuery));
}

#[tokio::test]
async fn model_reply_is_parsed_even_when_fenced() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    mock.push_text(
        "```json\n{\"keywords\": [\"ai\", \"chips\"], \"location\": null, \
         \"category\": \"technology\", \"timeframe\": \"latest\", \
         \"search_term\": \"AI chip news\"}\n```",
    );
    let interpreter = interpreter(&mock);

    let intent = interpreter.interpret("latest AI chip news").await.unwrap();
    assert_eq!(intent.category, Category::Technology);
    assert_eq!(intent.search_term, "AI chip news");
    assert_eq!(intent.keywords, vec!["ai", "chips"]);
    assert!(intent.location.is_none());
}

#[tokio::test]
async fn fallback_classifies_category_when_model_fails() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    mock.push_failure("service down");
    let interpreter = interpreter(&mock);

    let intent = interpreter.interpret("latest AI chip news").await.unwrap();
    assert_eq!(intent.category, Category::Technology);
    assert_eq!(intent.search_term, "latest AI chip news");
}

#[tokio::test]
async fn fallback_handles_malformed_model_output() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    mock.push_text("I cannot answer that in JSON, sorry.");
    let interpreter = interpreter(&mock);

    let intent = interpreter.interpret("cricket match results").await.unwrap();
    assert_eq!(intent.category, Category::Sports);
}

#[tokio::test]
async fn fallback_detects_known_cities() {
    init_tracing();
    let mock = Arc::new(MockCompletionClient::new());
    mock.push_failure("offline");
    let interpreter = interpreter(&mock);

    let intent = interpreter.interpret("traffic news in mumbai").await.unwrap();
    assert_eq!(intent.location.as_deref(), Some("Mumbai"));
}
