use chrono::{DateTime, Datelike, FixedOffset, Utc};
use nd_core::{KeywordCount, NewsRecord, RecencyWindow};
use serde::{Deserialize, Serialize};

use crate::aggregator::{Aggregation, FetchReport};

const KST_OFFSET_SECS: i32 = 9 * 3600;
const WEEKDAYS_KR: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsQuery {
    pub keywords: Vec<String>,
    #[serde(default)]
    pub window: RecencyWindow,
    pub title_filter: Option<String>,
    /// Restricts output to these keywords; `None` or empty keeps all.
    pub keyword_subset: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsView {
    /// Newest first.
    pub records: Vec<NewsRecord>,
    pub keyword_counts: Vec<KeywordCount>,
    pub total: usize,
    pub window: RecencyWindow,
    pub generation: u64,
    pub fetched_at: DateTime<Utc>,
    pub report: FetchReport,
}

impl NewsView {
    pub fn new(records: Vec<NewsRecord>, keywords: Vec<String>, window: RecencyWindow, aggregation: &Aggregation) -> Self {
        let keyword_counts = keywords
            .into_iter()
            .map(|keyword| KeywordCount {
                count: records.iter().filter(|r| r.keyword == keyword).count(),
                keyword,
            })
            .collect();

        Self {
            total: records.len(),
            records,
            keyword_counts,
            window,
            generation: aggregation.generation,
            fetched_at: aggregation.fetched_at,
            report: aggregation.report.clone(),
        }
    }

    /// Records per keyword in keyword order, skipping keywords with none.
    pub fn grouped(&self) -> Vec<(&str, Vec<&NewsRecord>)> {
        self.keyword_counts
            .iter()
            .filter(|c| c.count > 0)
            .map(|c| {
                let items = self.records.iter().filter(|r| r.keyword == c.keyword).collect();
                (c.keyword.as_str(), items)
            })
            .collect()
    }

    pub fn items(&self) -> Vec<NewsItemView> {
        self.records.iter().map(NewsItemView::from).collect()
    }
}

/// A record plus its display timestamp, as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsItemView {
    #[serde(flatten)]
    pub record: NewsRecord,
    pub published_display: String,
}

impl From<&NewsRecord> for NewsItemView {
    fn from(record: &NewsRecord) -> Self {
        Self {
            published_display: format_datetime_kr(record.published_at),
            record: record.clone(),
        }
    }
}

/// `2024-02-05 (월) 14:30`, in Korea Standard Time.
pub fn format_datetime_kr(at: DateTime<Utc>) -> String {
    let kst = match FixedOffset::east_opt(KST_OFFSET_SECS) {
        Some(offset) => at.with_timezone(&offset),
        None => at.fixed_offset(),
    };
    let weekday = WEEKDAYS_KR[kst.weekday().num_days_from_monday() as usize];
    format!("{} ({}) {}", kst.format("%Y-%m-%d"), weekday, kst.format("%H:%M"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(keyword: &str, title: &str) -> NewsRecord {
        NewsRecord {
            keyword: keyword.to_string(),
            title: title.to_string(),
            normalized_title: title.to_string(),
            link: "#".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 2, 5, 0, 0, 0).unwrap(),
            published_known: true,
            source_name: "src".to_string(),
            summary: String::new(),
        }
    }

    #[test]
    fn test_format_datetime_kr() {
        let at = Utc.with_ymd_and_hms(2024, 2, 5, 5, 30, 0).unwrap();
        assert_eq!(format_datetime_kr(at), "2024-02-05 (월) 14:30");

        let late = Utc.with_ymd_and_hms(2024, 2, 4, 16, 0, 0).unwrap();
        assert_eq!(format_datetime_kr(late), "2024-02-05 (월) 01:00");
    }

    #[test]
    fn test_grouped_follows_keyword_order() {
        let aggregation = Aggregation::empty(0, Utc::now());
        let records = vec![record("b", "b1"), record("a", "a1"), record("b", "b2")];
        let keywords = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let view = NewsView::new(records, keywords, RecencyWindow::All, &aggregation);

        let groups = view.grouped();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "a");
        assert_eq!(groups[1].0, "b");
        let b_titles: Vec<_> = groups[1].1.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(b_titles, vec!["b1", "b2"]);
        assert_eq!(view.total, 3);
    }

    #[test]
    fn test_item_view_serializes_flat() {
        let item = NewsItemView::from(&record("a", "Foo"));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["title"], "Foo");
        assert_eq!(json["published_display"], "2024-02-05 (월) 09:00");
    }
}
