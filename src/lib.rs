use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/slots/remaining", get(handlers::slots::remaining))
        .route("/api/bookings", post(handlers::bookings::reserve))
        .route("/api/admin/bookings", get(handlers::admin::get_bookings))
        .route("/api/admin/summary", get(handlers::admin::get_summary))
        .route(
            "/api/jobs/sms-reminders",
            post(handlers::reminders::dispatch),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
