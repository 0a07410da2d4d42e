use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod app_config;
pub mod contract;
pub mod error;
pub mod http;
pub mod rpc;
pub mod state;

pub use state::AppState;

/// Builds the HTTP/JSON transport router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    Router::new()
        .merge(http::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
