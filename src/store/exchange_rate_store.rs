// src/store/exchange_rate_store.rs
// Exchange rate rows, newest fetch wins

use log::debug;
use parking_lot::Mutex;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::StoreError;
use crate::types::ExchangeRate;

pub trait ExchangeRateStore: Send + Sync {
    /// Most recently fetched row for the pair, if any.
    fn latest(
        &self,
        base_code: &str,
        quote_code: &str,
    ) -> impl Future<Output = Result<Option<ExchangeRate>, StoreError>> + Send;
}

#[derive(Default)]
pub struct MemoryExchangeRateStore {
    rows: Mutex<Vec<ExchangeRate>>,
    lookups: AtomicUsize,
}

impl MemoryExchangeRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, rate: ExchangeRate) {
        self.rows.lock().push(rate);
    }

    /// Number of `latest` queries served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ExchangeRateStore for MemoryExchangeRateStore {
    async fn latest(&self, base_code: &str, quote_code: &str) -> Result<Option<ExchangeRate>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        let rows = self.rows.lock();
        Ok(rows
            .iter()
            .filter(|row| row.base_code == base_code && row.quote_code == quote_code)
            .max_by_key(|row| row.fetched_at)
            .cloned())
    }
}

/// Rows live in a sorted set `fx:{base}:{quote}` scored by fetch time.
#[derive(Clone)]
pub struct RedisExchangeRateStore {
    connection: MultiplexedConnection,
}

impl RedisExchangeRateStore {
    pub fn new(connection: MultiplexedConnection) -> Self {
        Self { connection }
    }

    pub fn key(base_code: &str, quote_code: &str) -> String {
        format!("fx:{}:{}", base_code, quote_code)
    }

    /// Sorted-set score: fetch time in epoch milliseconds.
    pub fn score(rate: &ExchangeRate) -> i64 {
        rate.fetched_at.timestamp_millis()
    }

    pub async fn record(&self, rate: &ExchangeRate) -> Result<(), StoreError> {
        let key = Self::key(&rate.base_code, &rate.quote_code);
        let payload = serde_json::to_string(rate)?;
        let mut connection = self.connection.clone();
        connection
            .zadd::<_, _, _, ()>(&key, payload, Self::score(rate))
            .await?;
        Ok(())
    }
}

impl ExchangeRateStore for RedisExchangeRateStore {
    async fn latest(&self, base_code: &str, quote_code: &str) -> Result<Option<ExchangeRate>, StoreError> {
        let key = Self::key(base_code, quote_code);
        let mut connection = self.connection.clone();
        let newest: Vec<String> = connection.zrevrange(&key, 0, 0).await?;

        match newest.first() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => {
                debug!("💱 No exchange rate rows at {}", key);
                Ok(None)
            }
        }
    }
}
