use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::{Error, Result};

pub const DEFAULT_SEARCH_BASE: &str = "https://news.google.com";
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 150;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Scheme and host of the news search service, e.g. `https://news.google.com`
    pub search_base: String,
    /// `hl` query parameter
    pub language: String,
    /// `gl` query parameter
    pub region: String,
    pub cache_ttl: Duration,
    /// `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
    pub max_concurrent_fetches: usize,
    pub summary_max_chars: usize,
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            search_base: DEFAULT_SEARCH_BASE.to_string(),
            language: "ko".to_string(),
            region: "KR".to_string(),
            cache_ttl: Duration::from_secs(600),
            request_timeout: None,
            max_concurrent_fetches: 8,
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
            user_agent: concat!("nd/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FeedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_base(mut self, base: impl Into<String>) -> Self {
        self.search_base = base.into();
        self
    }

    pub fn with_locale(mut self, language: impl Into<String>, region: impl Into<String>) -> Self {
        self.language = language.into();
        self.region = region.into();
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.max_concurrent_fetches = limit;
        self
    }

    pub fn with_summary_max_chars(mut self, max: usize) -> Self {
        self.summary_max_chars = max;
        self
    }

    /// The `ceid` parameter, `<region>:<language>`.
    pub fn ceid(&self) -> String {
        format!("{}:{}", self.region, self.language)
    }

    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.search_base)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.search_base, e)))?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!("{} cannot be a base URL", self.search_base)));
        }
        if self.language.trim().is_empty() || self.region.trim().is_empty() {
            return Err(Error::Config("language and region must be set".to_string()));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(Error::Config("max_concurrent_fetches must be at least 1".to_string()));
        }
        if self.summary_max_chars == 0 {
            return Err(Error::Config("summary_max_chars must be at least 1".to_string()));
        }
        Ok(())
    }
}
