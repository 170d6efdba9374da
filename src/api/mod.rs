// src/api/mod.rs
pub mod error;
pub mod prices;
pub mod records;
pub mod state;

use axum::{
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

pub use error::ApiError;
pub use state::{AppState, Backend, MemoryBackend, RedisBackend};

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "backoffice_hooks" }))
}

pub fn router<B: Backend>(state: AppState<B>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/orders/:id", put(records::put_order::<B>))
        .route("/api/donations/:id", put(records::put_donation::<B>))
        .route("/api/applications/:id", put(records::put_application::<B>))
        .route(
            "/api/prices/convert",
            get(prices::convert_price::<B>).post(prices::convert_prices::<B>),
        )
        .layer(cors)
        .with_state(state)
}
