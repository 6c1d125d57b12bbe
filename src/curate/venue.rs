// src/curate/venue.rs
use serde_json::Value;

use super::types::VenueInfo;
use super::valid_http_url;

/// Force an arbitrary `venue_info` value into the fixed four-key shape.
/// Non-mappings give all defaults; unknown keys are dropped.
pub fn coerce_venue_info(raw: &Value) -> VenueInfo {
    let Some(map) = raw.as_object() else {
        return VenueInfo::default();
    };

    let url_field = |key: &str| {
        map.get(key)
            .and_then(Value::as_str)
            .and_then(valid_http_url)
            .unwrap_or_default()
    };

    VenueInfo {
        yelp_url: url_field("yelp_url"),
        maps_url: url_field("maps_url"),
        photo_url: url_field("photo_url"),
        description: map
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_default(),
    }
}
