pub mod config;
pub mod models;
pub mod repositories;
pub mod services;
pub mod handlers;
pub mod middleware;
pub mod utils;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use repositories::InvoiceStore;
use services::ArchivalService;

#[derive(Clone)]
pub struct AppState {
    pub archival: Arc<ArchivalService>,
    pub invoices: Arc<dyn InvoiceStore>,
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::compliance::health_check))
        .nest(
            "/api/compliance",
            Router::new()
                .route("/sweep", post(handlers::compliance::run_sweep))
                .route("/status", get(handlers::compliance::compliance_status)),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
