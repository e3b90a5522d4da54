//! In-process implementation of the mapping store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{StoreError, UrlRepository};

/// Sharded in-memory store backed by a [`DashMap`].
///
/// `insert_if_absent` takes only the lock of the shard owning the code, so
/// inserts of different codes proceed concurrently and reads never wait on
/// other reads. Contents are lost on restart: use for development and tests,
/// not for production.
#[derive(Clone, Default)]
pub struct MemoryUrlRepository {
    records: Arc<DashMap<String, UrlRecord>>,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn insert_if_absent(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        match self.records.entry(new_record.code.clone()) {
            Entry::Occupied(_) => Err(StoreError::CodeTaken {
                code: new_record.code,
            }),
            Entry::Vacant(slot) => {
                let record = new_record.into_record(Utc::now());
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn get(&self, code: &str) -> Result<Option<UrlRecord>, StoreError> {
        Ok(self.records.get(code).map(|r| r.value().clone()))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.records.len() as i64)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
