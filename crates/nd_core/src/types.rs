use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// One item as the feed delivered it, before any cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub source: Option<String>,
    pub description: Option<String>,
}

/// A normalized article attributed to the keyword whose search surfaced it first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub keyword: String,
    pub title: String,
    pub normalized_title: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
    /// False when `published_at` is the capture time standing in for a
    /// missing or unparsable feed date.
    pub published_known: bool,
    pub source_name: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

/// Serialized as its short code (`"24h"`, `"7d"`, ...) so it reads back through `FromStr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecencyWindow {
    #[default]
    All,
    Last24Hours,
    Days1,
    Days3,
    Days7,
    Days30,
    Days90,
}

impl RecencyWindow {
    pub const ALL: [RecencyWindow; 7] = [
        RecencyWindow::All,
        RecencyWindow::Last24Hours,
        RecencyWindow::Days1,
        RecencyWindow::Days3,
        RecencyWindow::Days7,
        RecencyWindow::Days30,
        RecencyWindow::Days90,
    ];

    /// Width of the window, `None` meaning no filtering at all.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            RecencyWindow::All => None,
            RecencyWindow::Last24Hours => Some(Duration::hours(24)),
            RecencyWindow::Days1 => Some(Duration::days(1)),
            RecencyWindow::Days3 => Some(Duration::days(3)),
            RecencyWindow::Days7 => Some(Duration::days(7)),
            RecencyWindow::Days30 => Some(Duration::days(30)),
            RecencyWindow::Days90 => Some(Duration::days(90)),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RecencyWindow::All => "all",
            RecencyWindow::Last24Hours => "24h",
            RecencyWindow::Days1 => "1d",
            RecencyWindow::Days3 => "3d",
            RecencyWindow::Days7 => "7d",
            RecencyWindow::Days30 => "30d",
            RecencyWindow::Days90 => "90d",
        }
    }
}

impl fmt::Display for RecencyWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RecencyWindow {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let window = match s.trim().to_lowercase().as_str() {
            "" | "all" | "none" | "전체 보기" => RecencyWindow::All,
            "24h" | "최근 24시간" => RecencyWindow::Last24Hours,
            "1d" => RecencyWindow::Days1,
            "3d" => RecencyWindow::Days3,
            "7d" | "최근 1주일" => RecencyWindow::Days7,
            "30d" | "최근 1개월" => RecencyWindow::Days30,
            "90d" => RecencyWindow::Days90,
            other => return Err(Error::InvalidWindow(other.to_string())),
        };
        Ok(window)
    }
}

impl Serialize for RecencyWindow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for RecencyWindow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
