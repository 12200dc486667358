pub mod clock;
pub mod config;
pub mod error;
pub mod presets;
pub mod source;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::FeedConfig;
pub use error::{Error, Result};
pub use presets::{all_keywords, default_groups, find_group, KeywordGroup};
pub use source::FeedSource;
pub use types::{KeywordCount, NewsRecord, RawEntry, RecencyWindow};
