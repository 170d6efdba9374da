// src/errors.rs
use thiserror::Error;

use crate::types::{RecordId, RecordKind};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Mail relay rejected message (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("No recipient address on {kind} {id}")]
    MissingRecipient { kind: RecordKind, id: RecordId },

    #[error("Email {email} does not apply to a {kind}")]
    SubjectMismatch { email: &'static str, kind: RecordKind },
}

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
