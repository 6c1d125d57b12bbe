// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod curate;
pub mod debug;
pub mod error;
pub mod generate;
pub mod pipeline;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::curate::types::{CanonicalEvent, Feed, IdentityKey, Source, VenueInfo};
pub use crate::curate::{curate, CurationContext, ValidationReport};
pub use crate::error::FeedError;
pub use crate::pipeline::{process, run, RunOutcome};
