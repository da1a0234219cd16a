//! HTTP surface: router, shared state and middleware
//!
//! All routes are read-only GETs. Cross-origin requests are allowed from
//! any origin.

pub mod handlers;
pub mod response;

use crate::app::services::join_service::JoinService;
use crate::config::Config;
use axum::Router;
use axum::http::Method;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone)]
pub struct AppState {
    pub service: JoinService,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            service: JoinService::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/subcatchments", get(handlers::subcatchments_handler))
        .route(
            "/mapdata/:scenario/:variable/:year",
            get(handlers::mapdata_handler),
        )
        .route(
            "/vector/:scenario/:variable/:year",
            get(handlers::vector_handler),
        )
        .route(
            "/timeseries/:scenario/:variable/:sc_id",
            get(handlers::timeseries_handler),
        )
        .route("/years", get(handlers::years_handler))
        .route("/variables", get(handlers::variables_handler))
        .route("/scenarios", get(handlers::scenarios_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
