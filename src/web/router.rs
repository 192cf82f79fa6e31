//! Route definitions for web server.

use axum::{routing::get, Router};

use super::{api, AppState};

/// Create the API router.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/memos", get(api::list_memos).post(api::create_memo))
        .route(
            "/memos/:id",
            get(api::get_memo)
                .put(api::update_memo)
                .delete(api::delete_memo),
        )
}

/// Create the full app router.
pub fn create_app_router(store: AppState) -> Router {
    Router::new()
        .nest("/api", create_api_router())
        .route("/health", get(health_check))
        .with_state(store)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
