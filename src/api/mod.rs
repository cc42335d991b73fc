//! HTTP API module
//! 
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Timer controls
        .route("/start", post(start_handler))
        .route("/stop", post(stop_handler))
        .route("/pause", post(pause_handler))
        .route("/resume", post(resume_handler))
        .route("/toggle-pause", post(toggle_pause_handler))
        .route("/next", post(next_handler))
        .route("/previous", post(previous_handler))
        .route("/reset", post(reset_current_handler))
        .route("/reset-all", post(reset_all_handler))
        .route("/minimize", post(minimize_handler))
        // Reads
        .route("/state", get(state_handler))
        .route("/settings", get(get_settings_handler).put(update_settings_handler))
        .route("/display", get(display_handler))
        .route("/summary", get(summary_handler))
        .route("/host-match", get(host_match_handler))
        .route("/events", get(events_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
