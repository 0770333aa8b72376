use advisor_proto::feed::{StaticFeed, MOCK_PRICE_POINTS};
use advisor_proto::model::{default_catalog, AnalysisCategory, AnalyticsBundle, Timeframe, TimeframeFigures};
use advisor_proto::provider::{
    AnalyticsProvider, CallFeed, DocumentProvider, FeedError, PriceHistoryProvider,
};
use std::time::{Duration, Instant};

fn mock_feed() -> StaticFeed {
    StaticFeed::mock(&default_catalog(), 180.0, 10.0)
}

#[tokio::test]
async fn analytics_variant_matches_requested_category() {
    let feed = mock_feed();
    for entry in default_catalog() {
        for category in AnalysisCategory::ALL {
            let bundle = feed
                .fetch_analytics(&entry.company, category)
                .await
                .expect("catalog company must resolve");
            assert_eq!(bundle.category(), category, "{} / {:?}", entry.company, category);
        }
    }
}

#[tokio::test]
async fn market_impact_carries_all_timeframes() {
    let feed = mock_feed();
    let bundle = feed
        .fetch_analytics("Tech Corp", AnalysisCategory::MarketImpact)
        .await
        .unwrap();
    let AnalyticsBundle::MarketImpact(report) = bundle else {
        panic!("expected market impact bundle");
    };
    assert!(matches!(report.for_timeframe(Timeframe::Short), TimeframeFigures::Short(_)));
    assert!(matches!(report.for_timeframe(Timeframe::Medium), TimeframeFigures::Medium(_)));
    assert!(matches!(report.for_timeframe(Timeframe::Long), TimeframeFigures::Long(_)));
}

#[tokio::test]
async fn price_history_is_stable_within_session() {
    let feed = mock_feed();
    let first = feed.fetch_price_history("Global Industries").await.unwrap();
    let second = feed.fetch_price_history("Global Industries").await.unwrap();
    assert_eq!(first.len(), MOCK_PRICE_POINTS);
    assert_eq!(first, second);
    for point in &first.points {
        assert!(point.price >= 180.0 && point.price < 190.0, "{}", point.price);
    }
}

#[tokio::test]
async fn unknown_company_is_reported() {
    let feed = mock_feed();
    let err = feed.fetch_documents("Nobody Inc").await.unwrap_err();
    assert!(matches!(err, FeedError::UnknownCompany(ref c) if c == "Nobody Inc"));
    assert!(feed.audio_resource("Nobody Inc").is_none());
}

#[tokio::test]
async fn documents_name_the_company() {
    let feed = mock_feed();
    let docs = feed.fetch_documents("Innovation Labs").await.unwrap();
    let opening = &docs.transcript[0].lines[0];
    assert_eq!(opening.speaker, "CEO");
    assert!(opening.text.contains("Innovation Labs"));
    assert!(!docs.summary.highlights.is_empty());
}

#[tokio::test]
async fn latency_delays_every_response() {
    let feed = mock_feed().with_latency(Duration::from_millis(40));
    let started = Instant::now();
    feed.fetch_price_history("Tech Corp").await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(40));
}
