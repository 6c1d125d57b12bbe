// src/store.rs
//! The persisted feed file: read once for novelty, written once per run.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use metrics::counter;
use serde_json::Value;

use crate::curate::types::{CanonicalEvent, Feed, IdentityKey, Source};
use crate::error::FeedError;

/// What the previous run left behind. Empty on first run or unreadable file.
#[derive(Debug, Clone, Default)]
pub struct PriorFeed {
    pub keys: HashSet<IdentityKey>,
    pub events: Vec<Value>,
}

impl PriorFeed {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Load identity keys from the stored feed. Never fails: a missing or
/// unparseable file is treated as "no prior state".
pub fn load_previous(path: &Path) -> PriorFeed {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            tracing::info!(
                target: "store",
                path = %path.display(),
                error = %e,
                "no prior feed"
            );
            return PriorFeed::default();
        }
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(v) => prior_from_value(&v),
        Err(e) => {
            tracing::warn!(
                target: "store",
                path = %path.display(),
                error = %e,
                "prior feed unparseable, starting fresh"
            );
            PriorFeed::default()
        }
    }
}

/// Keys are only taken from events carrying string `date`, `venue` and
/// `description`; everything else is kept in `events` but never matches.
pub fn prior_from_value(v: &Value) -> PriorFeed {
    let events = v
        .get("events")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let keys = events
        .iter()
        .filter_map(|ev| {
            let field = |k: &str| ev.get(k).and_then(Value::as_str);
            Some(IdentityKey::new(
                field("date")?,
                field("venue")?,
                field("description")?,
            ))
        })
        .collect();

    PriorFeed { keys, events }
}

/// `YYYY-MM-DDTHH:MM:SSZ`
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Stamp and persist the feed, replacing whatever was there. Writes to a
/// sibling temp file and renames, so readers never see a partial feed.
pub fn write_feed(
    path: &Path,
    events: Vec<CanonicalEvent>,
    sources: Vec<Source>,
    now: DateTime<Utc>,
) -> Result<Feed, FeedError> {
    crate::curate::ensure_metrics_described();

    let feed = Feed {
        last_updated: format_timestamp(now),
        events,
        sources,
    };
    let json = serde_json::to_string_pretty(&feed)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| FeedError::persistence(parent, e))?;
    }
    let tmp = path.with_extension("json.tmp");
    let write_tmp = || -> std::io::Result<()> {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(json.as_bytes())?;
        f.write_all(b"\n")?;
        f.sync_all()
    };
    if let Err(e) = write_tmp() {
        let _ = fs::remove_file(&tmp);
        return Err(FeedError::persistence(&tmp, e));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(FeedError::persistence(path, e));
    }

    counter!("feed_writes_total").increment(1);
    tracing::info!(
        target: "store",
        path = %path.display(),
        events = feed.events.len(),
        sources = feed.sources.len(),
        last_updated = %feed.last_updated,
        "feed written"
    );
    Ok(feed)
}
