// src/curate/mod.rs
pub mod dates;
pub mod horizon;
pub mod sources;
pub mod types;
pub mod venue;

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FeedError;
use dates::parse_event_date;
use sources::{dedup_sources, normalize_sources, DomainTable};
use types::{CanonicalEvent, IdentityKey, Source};
use venue::coerce_venue_info;

pub const TIME_TBD: &str = "TBD";

/// One-time metrics registration (so series show up once a recorder is installed).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(describe_metrics);
}

fn describe_metrics() {
    describe_counter!("curate_candidates_total", "Candidate events seen.");
    describe_counter!("curate_valid_total", "Candidate events accepted.");
    describe_counter!(
        "curate_rejected_total",
        "Candidate events rejected, labelled by reason."
    );
    describe_counter!(
        "curate_sources_dropped_total",
        "Source entries without a usable URL."
    );
    describe_counter!("feed_writes_total", "Feeds persisted to disk.");
}

/// Trimmed copy of `raw` if it is an absolute http(s) URL with a host.
pub fn valid_http_url(raw: &str) -> Option<String> {
    let s = raw.trim();
    if !(s.starts_with("http://") || s.starts_with("https://")) {
        return None;
    }
    let url = Url::parse(s).ok()?;
    let has_host = url.host_str().is_some_and(|h| !h.is_empty());
    has_host.then(|| s.to_string())
}

/// Trimmed string value of `key`; numbers and booleans are stringified,
/// anything else is empty.
fn text_field(record: &serde_json::Map<String, Value>, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Why a candidate event was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    InvalidDate,
    OutOfWindow,
    MissingFields,
}

impl Rejection {
    pub fn label(self) -> &'static str {
        match self {
            Rejection::InvalidDate => "invalid_date",
            Rejection::OutOfWindow => "out_of_window",
            Rejection::MissingFields => "missing_fields",
        }
    }
}

/// Aggregate diagnostics for one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total: usize,
    pub valid: usize,
    pub invalid_date: usize,
    pub out_of_window: usize,
    pub missing_fields: usize,
    pub sources_total: usize,
    pub sources_kept: usize,
    pub sources_dropped: usize,
    pub sources_deduplicated: usize,
}

impl ValidationReport {
    fn reject(&mut self, why: Rejection) {
        match why {
            Rejection::InvalidDate => self.invalid_date += 1,
            Rejection::OutOfWindow => self.out_of_window += 1,
            Rejection::MissingFields => self.missing_fields += 1,
        }
        counter!("curate_rejected_total", "reason" => why.label()).increment(1);
    }

    pub fn rejected(&self) -> usize {
        self.invalid_date + self.out_of_window + self.missing_fields
    }
}

/// Inputs fixed for the duration of one run.
#[derive(Debug, Clone)]
pub struct CurationContext {
    pub today: NaiveDate,
    pub horizon_days: u32,
    pub previous: HashSet<IdentityKey>,
    pub domains: DomainTable,
    pub dedup_sources: bool,
}

impl CurationContext {
    pub fn new(today: NaiveDate, horizon_days: u32) -> Self {
        Self {
            today,
            horizon_days,
            previous: HashSet::new(),
            domains: DomainTable::default(),
            dedup_sources: false,
        }
    }

    /// Last eligible date, inclusive. Saturates at the calendar's end.
    pub fn window_end(&self) -> NaiveDate {
        self.today
            .checked_add_days(Days::new(u64::from(self.horizon_days)))
            .unwrap_or(NaiveDate::MAX)
    }

    fn in_window(&self, date: NaiveDate) -> bool {
        date >= self.today && date <= self.window_end()
    }
}

/// Validated events and sources, ready to persist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Curated {
    pub events: Vec<CanonicalEvent>,
    pub sources: Vec<Source>,
}

/// Validate candidate events in order. Rejections never abort the batch;
/// they are tallied in `report`.
pub fn validate_events(
    raw: &[Value],
    ctx: &CurationContext,
    report: &mut ValidationReport,
) -> Vec<CanonicalEvent> {
    ensure_metrics_described();

    let mut out = Vec::with_capacity(raw.len());
    for candidate in raw {
        report.total += 1;
        match validate_one(candidate, ctx) {
            Ok(ev) => out.push(ev),
            Err(why) => {
                tracing::debug!(target: "curate", reason = why.label(), "candidate rejected");
                report.reject(why);
            }
        }
    }
    report.valid = out.len();

    counter!("curate_candidates_total").increment(report.total as u64);
    counter!("curate_valid_total").increment(report.valid as u64);
    out
}

fn validate_one(candidate: &Value, ctx: &CurationContext) -> Result<CanonicalEvent, Rejection> {
    let record = candidate.as_object().ok_or(Rejection::InvalidDate)?;

    let date = record
        .get("date")
        .and_then(Value::as_str)
        .and_then(parse_event_date)
        .ok_or(Rejection::InvalidDate)?;
    if !ctx.in_window(date) {
        return Err(Rejection::OutOfWindow);
    }

    let venue = text_field(record, "venue");
    let description = text_field(record, "description");
    let category = text_field(record, "category");
    if venue.is_empty() || description.is_empty() || category.is_empty() {
        return Err(Rejection::MissingFields);
    }
    let link = record
        .get("link")
        .and_then(Value::as_str)
        .and_then(valid_http_url)
        .ok_or(Rejection::MissingFields)?;

    let time = match text_field(record, "time") {
        t if t.is_empty() => TIME_TBD.to_string(),
        t => t,
    };

    let venue_info = coerce_venue_info(record.get("venue_info").unwrap_or(&Value::Null));

    let mut event = CanonicalEvent {
        date: date.format("%Y-%m-%d").to_string(),
        time,
        venue,
        description,
        category,
        is_new: matches!(record.get("is_new"), Some(Value::Bool(true))),
        link,
        venue_info,
    };
    if !event.is_new {
        event.is_new = !ctx.previous.contains(&event.identity());
    }
    Ok(event)
}

/// Sequence under `key`: missing or null is empty, any other non-array is fatal.
fn sequence<'a>(
    input: &'a serde_json::Map<String, Value>,
    key: &str,
) -> Result<&'a [Value], FeedError> {
    match input.get(key) {
        None | Some(Value::Null) => Ok(&[][..]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(FeedError::MalformedInput(format!(
            "`{key}` must be an array, got {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Curate a whole `{events, sources}` payload. Only a structurally broken
/// payload is an error; bad individual records are counted and skipped.
pub fn curate(
    input: &Value,
    ctx: &CurationContext,
) -> Result<(Curated, ValidationReport), FeedError> {
    let map = input.as_object().ok_or_else(|| {
        FeedError::MalformedInput(format!("payload must be an object, got {}", json_kind(input)))
    })?;
    let raw_events = sequence(map, "events")?;
    let raw_sources = sequence(map, "sources")?;

    let mut report = ValidationReport::default();
    let events = validate_events(raw_events, ctx, &mut report);

    let normalized = normalize_sources(raw_sources, &ctx.domains);
    let mut sources = normalized.sources;
    report.sources_total = raw_sources.len();
    report.sources_dropped = normalized.dropped;
    if ctx.dedup_sources {
        report.sources_deduplicated = dedup_sources(&mut sources);
    }
    report.sources_kept = sources.len();
    counter!("curate_sources_dropped_total").increment(report.sources_dropped as u64);

    tracing::info!(
        target: "curate",
        total = report.total,
        valid = report.valid,
        invalid_date = report.invalid_date,
        out_of_window = report.out_of_window,
        missing_fields = report.missing_fields,
        sources_kept = report.sources_kept,
        sources_dropped = report.sources_dropped,
        "curation pass finished"
    );

    Ok((Curated { events, sources }, report))
}
