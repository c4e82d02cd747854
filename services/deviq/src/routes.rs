use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::state::SharedState;

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/recommend", post(crate::routes_advice::recommend_tech_stack))
        .route("/prioritize_tasks", post(crate::routes_advice::prioritize_tasks))
        .route("/chat", post(crate::routes_advice::chat))
        .route("/feedback", post(crate::routes_feedback::store_feedback))
        .route("/analyze_feedback", post(crate::routes_feedback::analyze_feedback))
        .route("/feedback/analysis", get(crate::routes_feedback::get_analysis))
        .route("/health", get(crate::routes_health::get_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
