// src/store/record_store.rs
// Persistence for status-bearing records

use dashmap::DashMap;
use log::debug;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::future::Future;
use std::marker::PhantomData;

use crate::errors::StoreError;
use crate::types::{RecordId, StatusRecord};

pub trait RecordStore<R: StatusRecord>: Send + Sync {
    /// Fetch the persisted record with all of its relations.
    fn load(&self, id: &RecordId) -> impl Future<Output = Result<Option<R>, StoreError>> + Send;

    fn save(&self, record: &R) -> impl Future<Output = Result<(), StoreError>> + Send;
}

pub struct MemoryRecordStore<R> {
    rows: DashMap<RecordId, R>,
}

impl<R> Default for MemoryRecordStore<R> {
    fn default() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }
}

impl<R: StatusRecord> MemoryRecordStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Replace a row without going through the save hooks, as another writer would.
    pub fn put(&self, record: R) {
        self.rows.insert(record.id().clone(), record);
    }
}

impl<R: StatusRecord> RecordStore<R> for MemoryRecordStore<R> {
    async fn load(&self, id: &RecordId) -> Result<Option<R>, StoreError> {
        Ok(self.rows.get(id).map(|row| row.value().clone()))
    }

    async fn save(&self, record: &R) -> Result<(), StoreError> {
        self.rows.insert(record.id().clone(), record.clone());
        Ok(())
    }
}

/// One JSON document per record under `record:{kind}:{id}`, relations embedded.
pub struct RedisRecordStore<R> {
    connection: MultiplexedConnection,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for RedisRecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: StatusRecord> RedisRecordStore<R> {
    pub fn new(connection: MultiplexedConnection) -> Self {
        Self {
            connection,
            _record: PhantomData,
        }
    }

    pub fn key(id: &RecordId) -> String {
        format!("record:{}:{}", R::KIND, id)
    }
}

impl<R: StatusRecord> RecordStore<R> for RedisRecordStore<R> {
    async fn load(&self, id: &RecordId) -> Result<Option<R>, StoreError> {
        let key = Self::key(id);
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection.get(&key).await?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => {
                debug!("💾 No row at {}", key);
                Ok(None)
            }
        }
    }

    async fn save(&self, record: &R) -> Result<(), StoreError> {
        let key = Self::key(record.id());
        let payload = serde_json::to_string(record)?;
        let mut connection = self.connection.clone();
        connection.set::<_, _, ()>(&key, payload).await?;
        debug!("💾 Saved {}", key);
        Ok(())
    }
}
