// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::curate::sources::DomainTable;

pub const ENV_CONFIG_PATH: &str = "FEED_CONFIG_PATH";
const DEFAULT_TOML_PATH: &str = "config/feed.toml";
const DEFAULT_JSON_PATH: &str = "config/feed.json";

/// What to do when validation leaves no events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyResultPolicy {
    /// Leave the stored feed untouched.
    #[default]
    KeepPrevious,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub feed_path: PathBuf,
    /// Free text; the last number in it is the horizon in days.
    pub timeframe: String,
    pub dedup_sources: bool,
    pub empty_result: EmptyResultPolicy,
    pub debug_dir: Option<PathBuf>,
    /// host -> title, layered over the built-in table
    pub known_domains: BTreeMap<String, String>,
    pub generator: GeneratorConfig,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            feed_path: PathBuf::from("events.json"),
            timeframe: "next 7-14 days".to_string(),
            dedup_sources: false,
            empty_result: EmptyResultPolicy::KeepPrevious,
            debug_dir: None,
            known_domains: BTreeMap::new(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl FeedConfig {
    pub fn domain_table(&self) -> DomainTable {
        DomainTable::with_overrides(self.known_domains.iter().map(|(k, v)| (k, v.clone())))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub endpoint: String,
    /// Tried in order; later entries are fallbacks.
    pub models: Vec<String>,
    /// Name of the env var holding the bearer token.
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub region: String,
    pub sources: Vec<String>,
    pub instructions: String,
    pub predilections: Vec<String>,
    pub branding: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.x.ai/v1/chat/completions".to_string(),
            models: vec!["grok-4".to_string(), "grok-3".to_string()],
            api_key_env: "GROK_API_KEY".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            timeout_secs: 60,
            region: concat!(
                "New York's Capital District ",
                "(Albany, Schenectady, Troy, Saratoga, and surrounding areas)"
            )
            .to_string(),
            sources: Vec::new(),
            instructions: String::new(),
            predilections: Vec::new(),
            branding: String::new(),
        }
    }
}

/// Load config from an explicit path. TOML or JSON, chosen by extension
/// with a content-based fallback.
pub fn load_config_from(path: &Path) -> Result<FeedConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feed config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
        .with_context(|| format!("parsing feed config {}", path.display()))
}

/// Resolve config with fallbacks:
/// 1) $FEED_CONFIG_PATH
/// 2) config/feed.toml
/// 3) config/feed.json
/// 4) built-in defaults
pub fn load_config_default() -> Result<FeedConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_config_from(&pb);
        } else {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
    }
    for candidate in [DEFAULT_TOML_PATH, DEFAULT_JSON_PATH] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return load_config_from(&p);
        }
    }
    Ok(FeedConfig::default())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<FeedConfig> {
    if hint_ext == "json" || s.trim_start().starts_with('{') {
        return serde_json::from_str(s).map_err(Into::into);
    }
    match toml::from_str(s) {
        Ok(cfg) => Ok(cfg),
        Err(toml_err) => serde_json::from_str(s)
            .map_err(|_| anyhow!("unsupported config format: {toml_err}")),
    }
}
