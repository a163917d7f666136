use crate::interface_adapters::handlers::solve::solve;
use crate::interface_adapters::state::AppState;
use axum::{Router, extract::DefaultBodyLimit, routing::post};
use std::sync::Arc;
use tower_http::services::ServeDir;

// Image parts arrive base64-encoded inside `contents`.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn app(state: Arc<AppState>) -> Router {
    let assets = ServeDir::new(&state.static_dir);

    // Wire the API route; everything else falls through to the asset directory.
    Router::new()
        .route("/api/solve", post(solve))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .fallback_service(assets)
        .with_state(state)
}
