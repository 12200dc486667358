use std::sync::Arc;
use nd_core::{FeedConfig, Result};

pub mod google_news;

pub use google_news::GoogleNewsSource;
pub use nd_core::FeedSource;

/// Returns the search-feed source described by `config`.
pub fn default_source(config: &FeedConfig) -> Result<Arc<dyn FeedSource>> {
    Ok(Arc::new(GoogleNewsSource::new(config.clone())?))
}
