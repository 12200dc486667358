use std::sync::Arc;
use nd_feeds::NewsAggregator;

pub struct AppState {
    pub aggregator: Arc<NewsAggregator>,
    /// Used when a request names no keywords.
    pub default_keywords: Vec<String>,
}
