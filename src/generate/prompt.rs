// src/generate/prompt.rs
use crate::config::GeneratorConfig;

/// Aggregation prompt for the upstream model. `timeframe` is the same phrase
/// the horizon is derived from, so the model and the validator agree.
pub fn build_prompt(cfg: &GeneratorConfig, timeframe: &str) -> String {
    let mut out = format!("Aggregate upcoming events for {}", cfg.region.trim());
    if !cfg.sources.is_empty() {
        out.push_str(&format!(" from these sources: {}", cfg.sources.join(", ")));
    }
    out.push_str(&format!(". Timeframe: {} from today.", timeframe.trim()));
    if !cfg.instructions.trim().is_empty() {
        out.push_str(&format!(" Instructions: {}", cfg.instructions.trim()));
    }
    if !cfg.predilections.is_empty() {
        out.push_str(&format!(" User predilections: {}.", cfg.predilections.join("; ")));
    }
    if !cfg.branding.trim().is_empty() {
        out.push_str(&format!(" Branding: {}", cfg.branding.trim()));
    }
    out.push_str(concat!(
        " Each event needs date (YYYY-MM-DD), time, venue, description, category, link,",
        " is_new and venue_info {yelp_url, maps_url, photo_url, description}.",
        " Each source needs title and url.",
        " Output strictly as a JSON object with an 'events' array and a 'sources' array;",
        " no extra text."
    ));
    out
}
