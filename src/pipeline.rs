// src/pipeline.rs
//! One full run: prior feed -> horizon -> curate -> empty policy -> write.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde_json::Value;

use crate::config::{EmptyResultPolicy, FeedConfig};
use crate::curate::horizon::horizon_days;
use crate::curate::types::Feed;
use crate::curate::{curate, CurationContext, ValidationReport};
use crate::debug::{StageDumper, STAGE_RAW, STAGE_REPORT, STAGE_VALIDATED};
use crate::error::FeedError;
use crate::generate::CandidateProvider;
use crate::store::{load_previous, write_feed};

#[derive(Debug, Clone)]
pub enum RunOutcome {
    Written {
        feed: Feed,
        report: ValidationReport,
    },
    /// Nothing survived validation; the stored feed was left as is.
    KeptPrevious { report: ValidationReport },
}

impl RunOutcome {
    pub fn report(&self) -> &ValidationReport {
        match self {
            RunOutcome::Written { report, .. } | RunOutcome::KeptPrevious { report } => report,
        }
    }
}

/// Curate an already-fetched payload and persist it. `today` and `now` are
/// fixed once by the caller for the whole run.
pub fn process(
    cfg: &FeedConfig,
    payload: &Value,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<RunOutcome, FeedError> {
    let dumper = StageDumper::new(cfg.debug_dir.clone());
    dumper.dump(STAGE_RAW, payload);

    let prior = load_previous(&cfg.feed_path);
    let horizon = horizon_days(&cfg.timeframe);
    tracing::info!(
        target: "pipeline",
        horizon_days = horizon,
        %today,
        prior_events = prior.events.len(),
        "starting curation"
    );

    let ctx = CurationContext {
        previous: prior.keys,
        domains: cfg.domain_table(),
        dedup_sources: cfg.dedup_sources,
        ..CurationContext::new(today, horizon)
    };
    let (curated, report) = curate(payload, &ctx)?;
    dumper.dump(STAGE_VALIDATED, &curated.events);
    dumper.dump(STAGE_REPORT, &report);

    if curated.events.is_empty() {
        match cfg.empty_result {
            EmptyResultPolicy::KeepPrevious => {
                tracing::warn!(
                    target: "pipeline",
                    total = report.total,
                    "no valid events; keeping previous feed"
                );
                return Ok(RunOutcome::KeptPrevious { report });
            }
            EmptyResultPolicy::Fail => {
                return Err(FeedError::EmptyResult {
                    total: report.total,
                    rejected: report.rejected(),
                });
            }
        }
    }

    let feed = write_feed(&cfg.feed_path, curated.events, curated.sources, now)?;
    Ok(RunOutcome::Written { feed, report })
}

/// Fetch from `provider`, then [`process`] with the current clock.
pub async fn run(
    cfg: &FeedConfig,
    provider: &dyn CandidateProvider,
) -> Result<RunOutcome, FeedError> {
    let payload = provider.fetch_candidates().await.map_err(|e| {
        tracing::error!(
            target: "pipeline",
            provider = provider.name(),
            error = %e,
            "candidate fetch failed"
        );
        FeedError::Upstream(format!("{}: {e:#}", provider.name()))
    })?;
    let today = Local::now().date_naive();
    process(cfg, &payload, today, Utc::now())
}
