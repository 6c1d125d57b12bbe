// src/generate/mod.rs
//! Candidate producers. They hand back the raw `{events, sources}` payload;
//! nothing here validates content, and the curator never sees which model
//! produced a batch.

pub mod prompt;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GeneratorConfig;

#[async_trait]
pub trait CandidateProvider: Send + Sync {
    async fn fetch_candidates(&self) -> Result<Value>;
    fn name(&self) -> &'static str;
}

/// Parse a model reply as JSON. Falls back to the outermost `{...}` span
/// when the object is wrapped in prose or code fences.
pub fn extract_json_object(content: &str) -> Option<Value> {
    let trimmed = content.trim();
    if let Ok(v) = serde_json::from_str::<Value>(trimmed) {
        return Some(v);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}

/// Reads a previously captured payload from disk.
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CandidateProvider for FileProvider {
    async fn fetch_candidates(&self) -> Result<Value> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading candidates from {}", self.path.display()))?;
        extract_json_object(&text)
            .ok_or_else(|| anyhow!("no JSON object in {}", self.path.display()))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Chat-completions producer. Models are tried in order until one returns a
/// payload containing both `events` and `sources`.
pub struct ChatProvider {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    models: Vec<String>,
    temperature: f32,
    max_tokens: u32,
    prompt: String,
}

impl ChatProvider {
    pub fn new(cfg: &GeneratorConfig, api_key: String, prompt: String) -> Result<Self> {
        if cfg.models.is_empty() {
            return Err(anyhow!("generator.models is empty"));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("events-feed/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()
            .context("building http client")?;
        Ok(Self {
            http,
            endpoint: cfg.endpoint.clone(),
            api_key,
            models: cfg.models.clone(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            prompt,
        })
    }

    /// Reads the key from `cfg.api_key_env`.
    pub fn from_env(cfg: &GeneratorConfig, prompt: String) -> Result<Self> {
        let api_key = std::env::var(&cfg.api_key_env)
            .map_err(|_| anyhow!("Missing {} env var", cfg.api_key_env))?;
        Self::new(cfg, api_key, prompt)
    }

    async fn ask(&self, model: &str) -> Result<Value> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let req = Req {
            model,
            messages: vec![Msg {
                role: "user",
                content: &self.prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("chat request")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("HTTP {status}: {body}"));
        }
        let body: Resp = resp.json().await.context("decoding chat response")?;
        let content = body
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or("");
        let payload =
            extract_json_object(content).ok_or_else(|| anyhow!("no JSON object in reply"))?;
        if !has_feed_shape(&payload) {
            return Err(anyhow!("reply lacks `events` or `sources`"));
        }
        Ok(payload)
    }
}

fn has_feed_shape(v: &Value) -> bool {
    v.get("events").is_some() && v.get("sources").is_some()
}

#[async_trait]
impl CandidateProvider for ChatProvider {
    async fn fetch_candidates(&self) -> Result<Value> {
        let mut failures = Vec::new();
        for model in &self.models {
            match self.ask(model).await {
                Ok(v) => {
                    tracing::info!(target: "generate", model = %model, "candidates received");
                    return Ok(v);
                }
                Err(e) => {
                    tracing::warn!(
                        target: "generate",
                        model = %model,
                        error = %e,
                        "model attempt failed"
                    );
                    failures.push(format!("{model}: {e:#}"));
                }
            }
        }
        Err(anyhow!("all models failed: {}", failures.join("; ")))
    }

    fn name(&self) -> &'static str {
        "chat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_plain_and_wrapped_json() {
        assert_eq!(
            extract_json_object(r#"{"events": [], "sources": []}"#),
            Some(json!({"events": [], "sources": []}))
        );
        let fenced = concat!(
            "Here you go:\n```json\n",
            "{\"events\": [{\"a\": 1}], \"sources\": []}",
            "\n```\nEnjoy!"
        );
        assert_eq!(
            extract_json_object(fenced),
            Some(json!({"events": [{"a": 1}], "sources": []}))
        );
    }

    #[test]
    fn no_object_is_none() {
        assert_eq!(extract_json_object("sorry, I can't help"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn empty_model_list_is_rejected() {
        let cfg = GeneratorConfig {
            models: vec![],
            ..GeneratorConfig::default()
        };
        assert!(ChatProvider::new(&cfg, "k".into(), "p".into()).is_err());
    }

    #[test]
    fn feed_shape_needs_both_keys() {
        assert!(has_feed_shape(&json!({"events": [], "sources": []})));
        assert!(!has_feed_shape(&json!({"events": []})));
    }
}
