use clap::Parser;
use nd_core::config::DEFAULT_SEARCH_BASE;
use nd_core::{all_keywords, FeedConfig, Result};
use nd_feeds::logging::init_logging;
use nd_feeds::{handle_command, FeedArgs, FeedCommands, NewsAggregator};
use nd_web::AppState;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    /// Accepts `90`, `45s`, `10m`, `1h30m`, `1d`. Bare numbers are seconds.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut seen_number = false;

        for c in s.trim().chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
                continue;
            }
            if c.is_whitespace() {
                continue;
            }
            let num = current_number
                .parse::<u64>()
                .map_err(|_| format!("Expected a number before '{}' in '{}'", c, s))?;
            let unit = match c {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                'd' => 86400,
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            total_seconds = num
                .checked_mul(unit)
                .and_then(|secs| total_seconds.checked_add(secs))
                .ok_or_else(|| format!("Duration too large: {}", s))?;
            current_number.clear();
            seen_number = true;
        }

        if !current_number.is_empty() {
            let secs = current_number
                .parse::<u64>()
                .map_err(|_| format!("Invalid number in duration: {}", s))?;
            total_seconds = total_seconds
                .checked_add(secs)
                .ok_or_else(|| format!("Duration too large: {}", s))?;
            seen_number = true;
        }

        if !seen_number {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Keyword news aggregation for the sales dashboard", long_about = None)]
struct Cli {
    /// Scheme and host of the news search service
    #[arg(long, default_value = DEFAULT_SEARCH_BASE)]
    search_base: String,
    #[arg(long, default_value = "ko")]
    language: String,
    #[arg(long, default_value = "KR")]
    region: String,
    /// How long an aggregation stays cached (e.g. 10m, 1h)
    #[arg(long, default_value = "10m")]
    cache_ttl: HumanDuration,
    /// Per-request timeout; unbounded when omitted
    #[arg(long)]
    timeout: Option<HumanDuration>,
    /// Maximum keyword searches in flight at once
    #[arg(long, default_value_t = 8)]
    concurrency: usize,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn feed_config(&self) -> FeedConfig {
        FeedConfig::new()
            .with_search_base(self.search_base.clone())
            .with_locale(self.language.clone(), self.region.clone())
            .with_cache_ttl(self.cache_ttl.0)
            .with_request_timeout(self.timeout.map(|t| t.0))
            .with_max_concurrent_fetches(self.concurrency)
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Feed(FeedCommands),
    /// Serve the news API for the dashboard
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = cli.feed_config();
    let aggregator = NewsAggregator::from_config(&config)?;
    info!("🗞️ News source ready ({}, {})", aggregator.source_name(), config.ceid());

    match cli.command {
        Commands::Feed(command) => {
            handle_command(FeedArgs { command }, &aggregator).await?;
        }
        Commands::Serve { addr } => {
            let state = AppState {
                aggregator: Arc::new(aggregator),
                default_keywords: all_keywords(),
            };
            let app = nd_web::create_app(state).await;
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!("🚀 Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_duration() {
        assert_eq!("90".parse::<HumanDuration>().unwrap().0, Duration::from_secs(90));
        assert_eq!("10m".parse::<HumanDuration>().unwrap().0, Duration::from_secs(600));
        assert_eq!("1h30m".parse::<HumanDuration>().unwrap().0, Duration::from_secs(5400));
        assert_eq!("1d 2s".parse::<HumanDuration>().unwrap().0, Duration::from_secs(86402));
        assert!("".parse::<HumanDuration>().is_err());
        assert!("m".parse::<HumanDuration>().is_err());
        assert!("5w".parse::<HumanDuration>().is_err());
    }

    #[test]
    fn test_human_duration_overflow_is_an_error() {
        let err = "999999999999999999d".parse::<HumanDuration>().unwrap_err();
        assert!(err.contains("too large"));
        assert!(format!("{}s 1s", u64::MAX).parse::<HumanDuration>().is_err());
        assert!(Cli::try_parse_from(["nd", "--cache-ttl", "999999999999999999d", "presets"]).is_err());
    }

    #[test]
    fn test_cli_builds_config() {
        let cli = Cli::parse_from(["nd", "--cache-ttl", "30s", "--timeout", "5s", "--language", "en", "--region", "US", "presets"]);
        let config = cli.feed_config();
        assert_eq!(config.cache_ttl, Duration::from_secs(30));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.ceid(), "US:en");
        assert!(matches!(cli.command, Commands::Feed(FeedCommands::Presets)));
    }

    #[test]
    fn test_cli_parses_fetch() {
        let cli = Cli::parse_from(["nd", "fetch", "호텔 매각", "--window", "24h", "--only", "호텔 매각"]);
        match cli.command {
            Commands::Feed(FeedCommands::Fetch { keywords, window, only, .. }) => {
                assert_eq!(keywords, vec!["호텔 매각".to_string()]);
                assert_eq!(window, nd_core::RecencyWindow::Last24Hours);
                assert_eq!(only, vec!["호텔 매각".to_string()]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
