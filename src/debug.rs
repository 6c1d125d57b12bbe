// src/debug.rs
//! Stage artifacts for post-mortem inspection: `<dir>/<stage>.json`.
//! Dumping is best-effort and never fails a run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub const STAGE_RAW: &str = "raw_candidates";
pub const STAGE_VALIDATED: &str = "validated_events";
pub const STAGE_REPORT: &str = "report";

#[derive(Debug, Clone, Default)]
pub struct StageDumper {
    dir: Option<PathBuf>,
}

impl StageDumper {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn disabled() -> Self {
        Self { dir: None }
    }

    /// Returns the written path, or `None` when disabled or on failure.
    pub fn dump<T: Serialize + ?Sized>(&self, stage: &str, data: &T) -> Option<PathBuf> {
        let dir = self.dir.as_deref()?;
        match write_stage(dir, stage, data) {
            Ok(path) => {
                tracing::debug!(target: "debug", stage, path = %path.display(), "stage dumped");
                Some(path)
            }
            Err(e) => {
                tracing::warn!(target: "debug", stage, error = %e, "stage dump failed");
                None
            }
        }
    }
}

fn write_stage<T: Serialize + ?Sized>(
    dir: &Path,
    stage: &str,
    data: &T,
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{stage}.json"));
    fs::write(&path, serde_json::to_vec_pretty(data)?)?;
    Ok(path)
}
