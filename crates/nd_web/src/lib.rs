use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod handlers;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/news", get(handlers::list_news))
        .route("/api/refresh", post(handlers::refresh))
        .route("/api/presets", get(handlers::list_presets))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use nd_core::{Error, Result};
    pub use crate::AppState;
}
