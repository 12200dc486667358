use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use nd_core::{default_groups, KeywordCount, RecencyWindow};
use nd_feeds::{FetchReport, NewsItemView, NewsQuery, NewsView};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// Query string of `GET /api/news`. List values are comma separated.
#[derive(Debug, Default, Deserialize)]
pub struct NewsParams {
    pub keywords: Option<String>,
    pub window: Option<String>,
    pub title: Option<String>,
    pub only: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub items: Vec<NewsItemView>,
    pub keyword_counts: Vec<KeywordCount>,
    pub total: usize,
    pub window: RecencyWindow,
    pub generation: u64,
    pub fetched_at: DateTime<Utc>,
    pub report: FetchReport,
}

impl From<NewsView> for NewsResponse {
    fn from(view: NewsView) -> Self {
        Self {
            items: view.items(),
            keyword_counts: view.keyword_counts,
            total: view.total,
            window: view.window,
            generation: view.generation,
            fetched_at: view.fetched_at,
            report: view.report,
        }
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "source": state.aggregator.source_name(),
        "generation": state.aggregator.generation(),
    }))
}

pub async fn list_news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NewsParams>,
) -> Result<Json<NewsResponse>, ApiError> {
    let window = params
        .window
        .as_deref()
        .map(str::parse::<RecencyWindow>)
        .transpose()?
        .unwrap_or_default();

    let mut keywords = split_list(params.keywords.as_deref());
    if keywords.is_empty() {
        keywords = state.default_keywords.clone();
    }
    let only = split_list(params.only.as_deref());

    let query = NewsQuery {
        keywords,
        window,
        title_filter: params.title,
        keyword_subset: if only.is_empty() { None } else { Some(only) },
    };
    let view = state.aggregator.query(&query).await;
    tracing::debug!("📰 serving {} records ({})", view.total, view.window);

    Ok(Json(NewsResponse::from(view)))
}

pub async fn refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.aggregator.refresh().await;
    StatusCode::NO_CONTENT
}

pub async fn list_presets() -> impl IntoResponse {
    Json(default_groups())
}
