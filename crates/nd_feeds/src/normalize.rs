use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use nd_core::{NewsRecord, RawEntry};
use scraper::Html;

pub const UNKNOWN_SOURCE: &str = "unknown source";
pub const UNTITLED: &str = "untitled";
pub const MISSING_LINK: &str = "#";
pub const TRUNCATION_MARKER: &str = "...";

/// Tails that usually carry a publisher name or a cut-off headline.
const TITLE_SEPARATORS: [&str; 3] = [" - ", " | ", "..."];

const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%z",
];

const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
];

/// Turns raw feed entries into `NewsRecord`s.
#[derive(Debug, Clone)]
pub struct EntryNormalizer {
    summary_max_chars: usize,
}

impl EntryNormalizer {
    pub fn new(summary_max_chars: usize) -> Self {
        Self { summary_max_chars }
    }

    /// Deduplication signature of an entry; computed before the full record.
    pub fn signature(&self, entry: &RawEntry) -> String {
        normalize_title(&entry_title(entry))
    }

    /// Builds the full record. `captured_at` stands in for a missing or
    /// unparsable publication date.
    pub fn normalize(
        &self,
        keyword: &str,
        entry: &RawEntry,
        normalized_title: String,
        captured_at: DateTime<Utc>,
    ) -> NewsRecord {
        let title = entry_title(entry);
        let parsed = entry.published.as_deref().and_then(parse_published);
        if parsed.is_none() {
            tracing::debug!(
                "🕒 unparsable date {:?} for '{}', using capture time",
                entry.published,
                title
            );
        }

        NewsRecord {
            keyword: keyword.to_string(),
            normalized_title,
            link: entry_link(entry),
            published_at: parsed.unwrap_or(captured_at),
            published_known: parsed.is_some(),
            source_name: extract_source_name(entry),
            summary: entry
                .description
                .as_deref()
                .map(|d| clean_summary(d, self.summary_max_chars))
                .unwrap_or_default(),
            title,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn entry_title(entry: &RawEntry) -> String {
    non_blank(entry.title.as_deref()).unwrap_or(UNTITLED).to_string()
}

fn entry_link(entry: &RawEntry) -> String {
    non_blank(entry.link.as_deref()).unwrap_or(MISSING_LINK).to_string()
}

/// Drops leading `[...]` tags, cuts at the first publisher/ellipsis
/// separator and trims. Falls back to the trimmed title if nothing is left.
pub fn normalize_title(title: &str) -> String {
    let mut rest = title.trim_start();
    while let Some(tagged) = rest.strip_prefix('[') {
        match tagged.find(']') {
            Some(end) => rest = tagged[end + 1..].trim_start(),
            None => break,
        }
    }

    let cut = TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| rest.find(sep))
        .min()
        .unwrap_or(rest.len());

    let normalized = rest[..cut].trim();
    if normalized.is_empty() {
        title.trim().to_string()
    } else {
        normalized.to_string()
    }
}

/// Structured source field, then the `" - Publisher"` title suffix, then
/// the sentinel.
pub fn extract_source_name(entry: &RawEntry) -> String {
    non_blank(entry.source.as_deref())
        .or_else(|| {
            entry
                .title
                .as_deref()
                .and_then(|t| t.rsplit_once(" - "))
                .and_then(|(_, publisher)| non_blank(Some(publisher)))
        })
        .unwrap_or(UNKNOWN_SOURCE)
        .to_string()
}

/// Best-effort timestamp parsing, always normalized to UTC. Timestamps
/// without an offset are read as UTC.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|f| DateTime::parse_from_str(raw, f).ok())
        })
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .or_else(|| {
                    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                })
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
}

/// Strips markup, collapses whitespace and cuts to `max_chars` characters,
/// appending the truncation marker when anything was cut.
pub fn clean_summary(raw: &str, max_chars: usize) -> String {
    let fragment = Html::parse_fragment(raw);
    let text: String = fragment.root_element().text().collect();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", text[..cut].trim_end(), TRUNCATION_MARKER),
        None => text,
    }
}
