use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, patch}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/revenue", get(handlers::get_revenue))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/orders", get(handlers::list_orders).post(handlers::create_order))
        .route("/api/orders/:id/status", patch(handlers::update_status))
        .with_state(state)
}
