pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::autofill::handlers as autofill_handlers;
use crate::insights::handlers as insights_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Content-strategy API
        .route(
            "/api/v1/content-strategy/autofill",
            get(autofill_handlers::handle_get_autofill),
        )
        .route(
            "/api/v1/content-strategy/insights",
            post(insights_handlers::handle_generate_insights),
        )
        .with_state(state)
}
