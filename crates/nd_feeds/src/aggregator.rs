use chrono::{DateTime, Utc};
use futures::future::join_all;
use nd_core::{Clock, Error, FeedConfig, FeedSource, NewsRecord, Result, SystemClock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::cache::AggregationCache;
use crate::dedup::DuplicateSuppressor;
use crate::filter::{apply_window, matches_title, sort_newest_first};
use crate::logging::Logger;
use crate::normalize::EntryNormalizer;
use crate::sources::default_source;
use crate::view::{NewsQuery, NewsView};

/// What happened to one keyword during an aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KeywordOutcome {
    Fetched {
        keyword: String,
        entries: usize,
        kept: usize,
    },
    Failed {
        keyword: String,
        reason: String,
    },
}

impl KeywordOutcome {
    pub fn keyword(&self) -> &str {
        match self {
            KeywordOutcome::Fetched { keyword, .. } => keyword,
            KeywordOutcome::Failed { keyword, .. } => keyword,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, KeywordOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchReport {
    pub outcomes: Vec<KeywordOutcome>,
}

impl FetchReport {
    pub fn failures(&self) -> impl Iterator<Item = &KeywordOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }
}

/// One generation of deduplicated records for a keyword list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    pub generation: u64,
    pub fetched_at: DateTime<Utc>,
    pub records: Vec<NewsRecord>,
    pub report: FetchReport,
}

impl Aggregation {
    pub fn empty(generation: u64, fetched_at: DateTime<Utc>) -> Self {
        Self {
            generation,
            fetched_at,
            records: Vec::new(),
            report: FetchReport::default(),
        }
    }
}

/// Trims keywords and drops blank ones, keeping caller order.
pub fn clean_keywords(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Requested keywords, narrowed to the subset when one is given.
fn scoped_keywords(query: &NewsQuery) -> Vec<String> {
    let keywords = clean_keywords(&query.keywords);
    match query.keyword_subset.as_deref().map(clean_keywords) {
        Some(subset) if !subset.is_empty() => keywords.into_iter().filter(|k| subset.contains(k)).collect(),
        _ => keywords,
    }
}

pub struct NewsAggregator {
    source: Arc<dyn FeedSource>,
    clock: Arc<dyn Clock>,
    cache: AggregationCache<Aggregation>,
    normalizer: EntryNormalizer,
    semaphore: Semaphore,
}

impl NewsAggregator {
    pub fn new(source: Arc<dyn FeedSource>, clock: Arc<dyn Clock>, config: &FeedConfig) -> Self {
        Self {
            source,
            cache: AggregationCache::new(config.cache_ttl, clock.clone()),
            clock,
            normalizer: EntryNormalizer::new(config.summary_max_chars),
            semaphore: Semaphore::new(config.max_concurrent_fetches.max(1)),
        }
    }

    /// Aggregator over the configured search feed with the system clock.
    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        let source = default_source(config)?;
        Ok(Self::new(source, Arc::new(SystemClock), config))
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn generation(&self) -> u64 {
        self.cache.generation()
    }

    /// Cached fetch-normalize-dedup pass over `keywords`.
    pub async fn aggregate(&self, keywords: &[String]) -> Arc<Aggregation> {
        let keywords = clean_keywords(keywords);
        if keywords.is_empty() {
            return Arc::new(Aggregation::empty(self.cache.generation(), self.clock.now()));
        }

        self.cache
            .get_or_fetch(&keywords, |generation| self.collect(&keywords, generation))
            .await
    }

    /// Forces the next `aggregate` for any keyword list to refetch.
    pub async fn refresh(&self) -> u64 {
        let generation = self.cache.invalidate().await;
        tracing::info!("🔄 news cache cleared (generation {})", generation);
        generation
    }

    /// The downstream read: aggregation, recency window, title filter,
    /// newest-first ordering and per-keyword counts.
    ///
    /// A keyword subset narrows the pass itself, so a selected keyword shows
    /// its whole feed even when an unselected keyword would have claimed
    /// some of its stories.
    pub async fn query(&self, query: &NewsQuery) -> NewsView {
        let keywords = scoped_keywords(query);
        let aggregation = self.aggregate(&keywords).await;
        let title = query.title_filter.as_deref().unwrap_or("");

        let mut records = apply_window(&aggregation.records, query.window, self.clock.as_ref());
        records.retain(|r| matches_title(r, title));
        sort_newest_first(&mut records);

        NewsView::new(records, keywords, query.window, &aggregation)
    }

    async fn collect(&self, keywords: &[String], generation: u64) -> Aggregation {
        tracing::info!("📰 fetching {} keyword(s) from {}", keywords.len(), self.source.name());

        let fetches = keywords.iter().map(|keyword| async move {
            let _permit = self.semaphore.acquire().await.map_err(|e| Error::External(e.into()))?;
            self.source.fetch(keyword).await
        });
        // join_all keeps keyword order, so the first keyword to surface a story keeps it.
        let results = join_all(fetches).await;

        let captured_at = self.clock.now();
        let mut suppressor = DuplicateSuppressor::new();
        let mut records = Vec::new();
        let mut outcomes = Vec::with_capacity(keywords.len());

        for (keyword, result) in keywords.iter().zip(results) {
            let logger = Logger::for_keyword(keyword);
            match result {
                Ok(entries) => {
                    let mut kept = 0;
                    for entry in &entries {
                        let signature = self.normalizer.signature(entry);
                        if !suppressor.admit(&signature) {
                            logger.debug(&format!("⏭️ duplicate: {}", signature));
                            continue;
                        }
                        records.push(self.normalizer.normalize(keyword, entry, signature, captured_at));
                        kept += 1;
                    }
                    logger.info(&format!("✨ {} entries, {} kept", entries.len(), kept));
                    outcomes.push(KeywordOutcome::Fetched {
                        keyword: keyword.clone(),
                        entries: entries.len(),
                        kept,
                    });
                }
                Err(e) => {
                    logger.warn(&format!("⚠️ skipped: {}", e));
                    outcomes.push(KeywordOutcome::Failed {
                        keyword: keyword.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Aggregation {
            generation,
            fetched_at: captured_at,
            records,
            report: FetchReport { outcomes },
        }
    }
}
