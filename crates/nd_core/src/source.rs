use async_trait::async_trait;
use crate::types::RawEntry;
use crate::Result;

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Returns the display name of the feed provider
    fn name(&self) -> &str;

    /// Runs exactly one search request for `keyword` and returns the raw
    /// entries in the order the feed lists them.
    async fn fetch(&self, keyword: &str) -> Result<Vec<RawEntry>>;
}
