use clap::{Args, Subcommand};
use nd_core::presets::{all_keywords, default_groups, find_group};
use nd_core::{Error, RecencyWindow, Result};

use crate::aggregator::{KeywordOutcome, NewsAggregator};
use crate::view::{format_datetime_kr, NewsQuery, NewsView};

#[derive(Args, Debug, Clone)]
pub struct FeedArgs {
    #[command(subcommand)]
    pub command: FeedCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FeedCommands {
    /// Fetch, deduplicate and print news for keywords
    Fetch {
        /// Keywords to search. Defaults to every preset keyword.
        keywords: Vec<String>,
        /// Use a preset keyword group (core, orders, industry) instead
        #[arg(long, conflicts_with = "keywords")]
        preset: Option<String>,
        /// Recency window: all, 24h, 1d, 3d, 7d, 30d, 90d
        #[arg(long, default_value = "all")]
        window: RecencyWindow,
        /// Only show titles containing this text
        #[arg(long)]
        title: Option<String>,
        /// Only show results for these keywords
        #[arg(long)]
        only: Vec<String>,
        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the built-in keyword groups
    Presets,
}

pub async fn handle_command(args: FeedArgs, aggregator: &NewsAggregator) -> Result<()> {
    match args.command {
        FeedCommands::Fetch { keywords, preset, window, title, only, json } => {
            let query = NewsQuery {
                keywords: resolve_keywords(keywords, preset.as_deref())?,
                window,
                title_filter: title,
                keyword_subset: if only.is_empty() { None } else { Some(only) },
            };
            let view = aggregator.query(&query).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_view(&view);
            }
        }
        FeedCommands::Presets => {
            for group in default_groups() {
                println!("{} ({}):", group.label, group.id);
                for keyword in group.keywords {
                    println!("  - {}", keyword);
                }
            }
        }
    }
    Ok(())
}

/// Explicit keywords, else a preset group, else every preset keyword.
pub fn resolve_keywords(keywords: Vec<String>, preset: Option<&str>) -> Result<Vec<String>> {
    if let Some(id) = preset {
        return find_group(id)
            .map(|g| g.keywords())
            .ok_or_else(|| Error::Config(format!("Unknown preset: {}", id)));
    }
    if keywords.is_empty() {
        return Ok(all_keywords());
    }
    Ok(keywords)
}

fn print_view(view: &NewsView) {
    for outcome in view.report.failures() {
        if let KeywordOutcome::Failed { keyword, reason } = outcome {
            eprintln!("⚠️ {}: {}", keyword, reason);
        }
    }

    println!("총 {}건 ({})", view.total, view.window);
    if view.total == 0 {
        println!("현재 조건에 맞는 뉴스가 없습니다.");
        return;
    }

    for (keyword, records) in view.grouped() {
        println!();
        println!("🔸 {} ({})", keyword, records.len());
        for (idx, record) in records.iter().enumerate() {
            println!("{:>3}. {}", idx + 1, record.title);
            println!("     {} · {}", format_datetime_kr(record.published_at), record.source_name);
            println!("     {}", record.link);
        }
    }
}
