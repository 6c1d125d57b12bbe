//! Feed refresher: fetch candidates, curate them, write the feed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use events_feed::config::{load_config_default, load_config_from, EmptyResultPolicy};
use events_feed::generate::{prompt::build_prompt, CandidateProvider, ChatProvider, FileProvider};
use events_feed::RunOutcome;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file (TOML or JSON); overrides FEED_CONFIG_PATH
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read candidates from this file instead of calling the model
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Feed output path (overrides `feed_path`)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dump stage artifacts into this directory
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// Exit with an error when no event survives validation
    #[arg(long)]
    fail_on_empty: bool,
}

/// Compact logs by default; JSON lines when FEED_LOG_JSON=1.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("events_feed=info,warn"));
    let json = std::env::var("FEED_LOG_JSON").ok().is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().compact().with_writer(std::io::stderr)).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(p) => load_config_from(p)?,
        None => load_config_default()?,
    };
    if let Some(out) = args.output {
        cfg.feed_path = out;
    }
    if args.debug_dir.is_some() {
        cfg.debug_dir = args.debug_dir;
    }
    if args.fail_on_empty {
        cfg.empty_result = EmptyResultPolicy::Fail;
    }

    let provider: Box<dyn CandidateProvider> = match args.input {
        Some(path) => Box::new(FileProvider::new(path)),
        None => {
            let prompt = build_prompt(&cfg.generator, &cfg.timeframe);
            Box::new(ChatProvider::from_env(&cfg.generator, prompt)?)
        }
    };

    let outcome = events_feed::run(&cfg, provider.as_ref()).await?;
    match &outcome {
        RunOutcome::Written { feed, .. } => tracing::info!(
            events = feed.events.len(),
            sources = feed.sources.len(),
            path = %cfg.feed_path.display(),
            "events updated"
        ),
        RunOutcome::KeptPrevious { .. } => {
            tracing::warn!(path = %cfg.feed_path.display(), "feed left unchanged")
        }
    }

    let report = serde_json::to_string_pretty(outcome.report()).context("encoding report")?;
    println!("{report}");
    Ok(())
}
