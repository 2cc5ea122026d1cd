use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/health/sleep",
            get(handlers::get_sleep).post(handlers::ingest_sleep),
        )
        .route(
            "/api/health/steps",
            get(handlers::get_steps).post(handlers::ingest_steps),
        )
        .route(
            "/api/health/heart-rate",
            get(handlers::get_heart_rate).post(handlers::ingest_heart_rate),
        )
        .route(
            "/api/health/activity",
            get(handlers::get_activity).post(handlers::ingest_activity),
        )
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/trends", get(handlers::get_trends))
        .with_state(state)
}
