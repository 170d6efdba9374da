// src/api/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::errors::LifecycleError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Path id {path} does not match body id {body}")]
    IdMismatch { path: String, body: String },

    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("Save failed: {0}")]
    Lifecycle(#[from] LifecycleError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::IdMismatch { .. } | ApiError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            ApiError::Lifecycle(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            log::error!("❌ {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
