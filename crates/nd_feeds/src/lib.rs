pub mod aggregator;
pub mod cache;
pub mod cli;
pub mod dedup;
pub mod filter;
pub mod logging;
pub mod normalize;
pub mod sources;
pub mod view;

pub use aggregator::{Aggregation, FetchReport, KeywordOutcome, NewsAggregator};
pub use cache::AggregationCache;
pub use cli::{handle_command, FeedArgs, FeedCommands};
pub use sources::GoogleNewsSource;
pub use view::{format_datetime_kr, NewsItemView, NewsQuery, NewsView};

pub mod prelude {
    pub use super::aggregator::NewsAggregator;
    pub use super::view::{NewsQuery, NewsView};
    pub use nd_core::{Error, FeedSource, NewsRecord, RecencyWindow, Result};
}
