//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Search page and redirect
        .route("/", get(handlers::index))
        .route("/search", get(handlers::search))
        // Preference editor
        .route("/preferences", get(handlers::preferences))
        .route("/preferences/toggle", post(handlers::toggle_engine))
        .route("/preferences/move", post(handlers::move_engine))
        .route("/preferences/reset", post(handlers::reset_preferences))
        // API routes
        .route(
            "/api/preferences",
            get(handlers::get_preferences).put(handlers::put_preferences),
        )
        .route("/api/engines", get(handlers::enabled_engines))
        .route("/health", get(handlers::health));

    // Engine icons
    if let Some(dir) = &state.settings.server.static_dir {
        router = router.nest_service("/engines", ServeDir::new(dir));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
