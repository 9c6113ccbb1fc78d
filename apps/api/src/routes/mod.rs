pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::orientation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Tests
        .route("/api/v1/orientation/tests", get(handlers::handle_list_tests))
        .route(
            "/api/v1/orientation/tests/:test_id",
            get(handlers::handle_get_test),
        )
        .route(
            "/api/v1/orientation/sessions/:test_id/submit",
            post(handlers::handle_submit),
        )
        .route(
            "/api/v1/orientation/results",
            get(handlers::handle_user_results),
        )
        // Careers
        .route(
            "/api/v1/orientation/careers",
            get(handlers::handle_list_careers),
        )
        .route(
            "/api/v1/orientation/careers/:career_id",
            get(handlers::handle_get_career),
        )
        .route(
            "/api/v1/orientation/recommendations",
            get(handlers::handle_recommendations),
        )
        .with_state(state)
}
