// src/curate/types.rs
use serde::{Deserialize, Serialize};

/// Fixed-shape venue details attached to every canonical event.
/// Each `*_url` is either a valid http(s) URL or empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VenueInfo {
    pub yelp_url: String,
    pub maps_url: String,
    pub photo_url: String,
    pub description: String,
}

/// A validated event, safe to publish.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalEvent {
    pub date: String, // ISO calendar date, YYYY-MM-DD
    pub time: String, // "TBD" when the candidate had none
    pub venue: String,
    pub description: String,
    pub category: String,
    pub is_new: bool,
    pub link: String,
    pub venue_info: VenueInfo,
}

impl CanonicalEvent {
    pub fn identity(&self) -> IdentityKey {
        IdentityKey::new(&self.date, &self.venue, &self.description)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// The persisted artifact. Replaced wholesale on every successful run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feed {
    pub last_updated: String,
    pub events: Vec<CanonicalEvent>,
    pub sources: Vec<Source>,
}

/// `(date, venue, description)`; exact match only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    pub date: String,
    pub venue: String,
    pub description: String,
}

impl IdentityKey {
    pub fn new(date: &str, venue: &str, description: &str) -> Self {
        Self {
            date: date.to_string(),
            venue: venue.to_string(),
            description: description.to_string(),
        }
    }
}
