use chrono::{DateTime, Utc};
use nd_core::{Clock, NewsRecord, RecencyWindow};

/// True when `published_at` lies in `[now - window, now]`.
pub fn within_window(published_at: DateTime<Utc>, window: RecencyWindow, now: DateTime<Utc>) -> bool {
    match window.duration() {
        None => true,
        Some(width) => published_at >= now - width && published_at <= now,
    }
}

/// Keeps records inside the window, preserving their order.
pub fn filter_by_window(records: &[NewsRecord], window: RecencyWindow, now: DateTime<Utc>) -> Vec<NewsRecord> {
    records
        .iter()
        .filter(|r| within_window(r.published_at, window, now))
        .cloned()
        .collect()
}

/// Reads the clock once and filters every record against that instant.
pub fn apply_window(records: &[NewsRecord], window: RecencyWindow, clock: &dyn Clock) -> Vec<NewsRecord> {
    if records.is_empty() {
        return Vec::new();
    }
    let now = clock.now();
    filter_by_window(records, window, now)
}

/// Case-insensitive substring match on the display title. A blank needle matches everything.
pub fn matches_title(record: &NewsRecord, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || record.title.to_lowercase().contains(&needle.to_lowercase())
}

/// Stable newest-first ordering.
pub fn sort_newest_first(records: &mut [NewsRecord]) {
    records.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}
