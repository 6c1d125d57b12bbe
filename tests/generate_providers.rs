// tests/generate_providers.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use events_feed::config::FeedConfig;
use events_feed::generate::{CandidateProvider, FileProvider};
use events_feed::{run, FeedError, RunOutcome};
use serde_json::Value;

struct FailingProvider;

#[async_trait]
impl CandidateProvider for FailingProvider {
    async fn fetch_candidates(&self) -> Result<Value> {
        Err(anyhow!("upstream timed out"))
    }
    fn name(&self) -> &'static str {
        "failing"
    }
}

#[tokio::test]
async fn file_provider_reads_wrapped_reply() {
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("reply.txt");
    std::fs::write(
        &p,
        "Sure! ```json\n{\"events\": [], \"sources\": [\"https://spac.org\"]}\n```",
    )
    .unwrap();
    let v = FileProvider::new(&p).fetch_candidates().await.unwrap();
    assert_eq!(v["sources"][0], "https://spac.org");
}

#[tokio::test]
async fn file_provider_missing_file_errors() {
    let tmp = tempfile::tempdir().unwrap();
    let err = FileProvider::new(tmp.path().join("nope.json"))
        .fetch_candidates()
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("reading candidates"));
}

#[tokio::test]
async fn failing_provider_is_upstream_error_and_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = FeedConfig {
        feed_path: tmp.path().join("events.json"),
        ..FeedConfig::default()
    };
    let err = run(&cfg, &FailingProvider).await.unwrap_err();
    assert!(matches!(err, FeedError::Upstream(ref m) if m.contains("failing")));
    assert!(!cfg.feed_path.exists());
}

#[tokio::test]
async fn run_with_file_provider_writes_feed() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("candidates.json");
    let date = (chrono::Local::now().date_naive() + chrono::Duration::days(2))
        .format("%Y-%m-%d")
        .to_string();
    std::fs::write(
        &input,
        serde_json::json!({
            "events": [{
                "date": date,
                "venue": "Troy Music Hall",
                "description": "Chamber orchestra",
                "category": "Classical",
                "link": "https://troymusichall.org/shows/chamber"
            }],
            "sources": [{"url": "https://www.troymusichall.org"}]
        })
        .to_string(),
    )
    .unwrap();
    let cfg = FeedConfig {
        feed_path: tmp.path().join("events.json"),
        ..FeedConfig::default()
    };

    let outcome = run(&cfg, &FileProvider::new(&input)).await.unwrap();
    let RunOutcome::Written { feed, .. } = outcome else {
        panic!("expected a written feed");
    };
    assert_eq!(feed.events.len(), 1);
    assert_eq!(feed.events[0].time, "TBD");
    assert_eq!(feed.sources[0].title, "Troy Savings Bank Music Hall");
    assert!(feed.last_updated.ends_with('Z'));
}
