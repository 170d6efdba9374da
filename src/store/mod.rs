// src/store/mod.rs
pub mod exchange_rate_store;
pub mod record_store;

pub use exchange_rate_store::{ExchangeRateStore, MemoryExchangeRateStore, RedisExchangeRateStore};
pub use record_store::{MemoryRecordStore, RecordStore, RedisRecordStore};
