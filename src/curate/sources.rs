// src/curate/sources.rs
//! Source list normalization: bare URL strings or partial `{title, url}`
//! records become canonical [`Source`]s. Entries without a usable URL are dropped.

use std::collections::{HashMap, HashSet};

use reqwest::Url;
use serde_json::Value;

use super::types::Source;
use super::valid_http_url;

const KNOWN_DOMAINS: &[(&str, &str)] = &[
    ("proctors.org", "Proctors Theatre"),
    ("palacealbany.org", "Palace Theatre Albany"),
    ("theegg.org", "The Egg"),
    ("spac.org", "Saratoga Performing Arts Center"),
    ("troymusichall.org", "Troy Savings Bank Music Hall"),
    ("mvpformusic.com", "MVP Arena"),
    ("caffelena.org", "Caffe Lena"),
    ("timesunion.com", "Times Union"),
    ("albany.org", "Discover Albany"),
    ("discoversaratoga.org", "Discover Saratoga"),
    ("eventbrite.com", "Eventbrite"),
    ("ticketmaster.com", "Ticketmaster"),
    ("facebook.com", "Facebook Events"),
    ("meetup.com", "Meetup"),
    ("allevents.in", "AllEvents"),
];

/// Host (without `www.`) to human-readable site name.
#[derive(Debug, Clone)]
pub struct DomainTable {
    names: HashMap<String, String>,
}

impl Default for DomainTable {
    fn default() -> Self {
        Self {
            names: KNOWN_DOMAINS
                .iter()
                .map(|(host, name)| (host.to_string(), name.to_string()))
                .collect(),
        }
    }
}

impl DomainTable {
    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    /// Built-in table with `overrides` layered on top.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut table = Self::default();
        for (host, name) in overrides {
            table.insert(host.as_ref(), name);
        }
        table
    }

    pub fn insert(&mut self, host: &str, name: impl Into<String>) {
        let key = bare_host(&host.trim().to_ascii_lowercase()).to_string();
        self.names.insert(key, name.into());
    }

    pub fn lookup(&self, host: &str) -> Option<&str> {
        self.names.get(bare_host(host)).map(String::as_str)
    }
}

fn bare_host(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Title for a URL: known-domain name, else the bare host, else empty.
pub fn title_for_url(url: &str, table: &DomainTable) -> String {
    let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string)) else {
        return String::new();
    };
    match table.lookup(&host) {
        Some(name) => name.to_string(),
        None => bare_host(&host).to_string(),
    }
}

/// Outcome of a source pass. `dropped` counts entries without a valid URL.
#[derive(Debug, Clone, Default)]
pub struct NormalizedSources {
    pub sources: Vec<Source>,
    pub dropped: usize,
}

/// Normalize raw source entries, preserving input order. Duplicates are kept;
/// see [`dedup_sources`].
pub fn normalize_sources(raw: &[Value], table: &DomainTable) -> NormalizedSources {
    let mut out = NormalizedSources::default();
    for entry in raw {
        match normalize_one(entry, table) {
            Some(src) => out.sources.push(src),
            None => {
                tracing::debug!(target: "curate", entry = %entry, "source dropped");
                out.dropped += 1;
            }
        }
    }
    out
}

fn normalize_one(entry: &Value, table: &DomainTable) -> Option<Source> {
    let (title, url) = match entry {
        Value::String(s) => (String::new(), s.as_str()),
        Value::Object(map) => (
            map.get("title")
                .and_then(Value::as_str)
                .map(|t| t.trim().to_string())
                .unwrap_or_default(),
            map.get("url").and_then(Value::as_str).unwrap_or_default(),
        ),
        _ => return None,
    };

    let url = valid_http_url(url)?;
    let title = if title.is_empty() {
        title_for_url(&url, table)
    } else {
        title
    };
    Some(Source { title, url })
}

/// Keep the first occurrence of each URL, in order. Returns how many were removed.
pub fn dedup_sources(sources: &mut Vec<Source>) -> usize {
    let before = sources.len();
    let mut seen: HashSet<String> = HashSet::new();
    sources.retain(|s| seen.insert(s.url.clone()));
    before - sources.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_string_gets_known_title() {
        let out = normalize_sources(
            &[json!("https://www.proctors.org/events")],
            &DomainTable::default(),
        );
        assert_eq!(out.sources.len(), 1);
        assert_eq!(out.sources[0].title, "Proctors Theatre");
        assert_eq!(out.sources[0].url, "https://www.proctors.org/events");
    }

    #[test]
    fn unknown_domain_uses_host() {
        let t = title_for_url("https://example.org/x", &DomainTable::default());
        assert_eq!(t, "example.org");
        let t = title_for_url("https://www.example.org/x", &DomainTable::default());
        assert_eq!(t, "example.org");
    }

    #[test]
    fn mapping_keeps_given_title_and_fills_empty_one() {
        let raw = vec![
            json!({"title": "Capital District Calendar", "url": "https://spac.org/cal"}),
            json!({"title": "", "url": "https://spac.org/cal"}),
            json!({"url": "https://spac.org/cal", "title": 7}),
        ];
        let out = normalize_sources(&raw, &DomainTable::default());
        let titles: Vec<_> = out.sources.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Capital District Calendar",
                "Saratoga Performing Arts Center",
                "Saratoga Performing Arts Center"
            ]
        );
    }

    #[test]
    fn invalid_entries_are_dropped_and_counted() {
        let raw = vec![
            json!("not a url"),
            json!({"title": "No link"}),
            json!(12),
            json!("mailto:box@example.org"),
            json!("https://troymusichall.org"),
        ];
        let out = normalize_sources(&raw, &DomainTable::default());
        assert_eq!(out.sources.len(), 1);
        assert_eq!(out.dropped, 4);
    }

    #[test]
    fn overrides_win_over_builtins() {
        let table = DomainTable::with_overrides([("www.proctors.org", "Proctors")]);
        assert_eq!(table.lookup("proctors.org"), Some("Proctors"));
        assert_eq!(table.lookup("spac.org"), Some("Saratoga Performing Arts Center"));
    }

    #[test]
    fn dedup_keeps_first() {
        let mut v = vec![
            Source { title: "A".into(), url: "https://a.test/".into() },
            Source { title: "B".into(), url: "https://b.test/".into() },
            Source { title: "A2".into(), url: "https://a.test/".into() },
        ];
        assert_eq!(dedup_sources(&mut v), 1);
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].title, "A");
    }
}
