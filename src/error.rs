// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a run. Per-record problems never show up here;
/// they are counted in [`crate::curate::ValidationReport`].
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("persisting feed to {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serializing feed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("validation produced no events ({rejected} of {total} candidates rejected)")]
    EmptyResult { total: usize, rejected: usize },

    #[error("no candidate producer succeeded: {0}")]
    Upstream(String),
}

impl FeedError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FeedError::Persistence {
            path: path.into(),
            source,
        }
    }
}
