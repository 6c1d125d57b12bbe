// src/curate/horizon.rs
use once_cell::sync::OnceCell;
use regex::Regex;

pub const DEFAULT_HORIZON_DAYS: u32 = 60;

/// Day count from a timeframe phrase such as `"next 7-14 days"`.
///
/// The last numeral in the text wins, so phrase the descriptor with the day
/// count at the end. No numeral means [`DEFAULT_HORIZON_DAYS`].
pub fn horizon_days(timeframe: &str) -> u32 {
    static RE_NUM: OnceCell<Regex> = OnceCell::new();
    let re = RE_NUM.get_or_init(|| Regex::new(r"\d+").unwrap());
    re.find_iter(timeframe)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .last()
        .unwrap_or(DEFAULT_HORIZON_DAYS)
}
