// src/lib.rs
pub mod api;
pub mod config;
pub mod currency;
pub mod errors;
pub mod lifecycle;
pub mod notifications;
pub mod store;
pub mod types;
