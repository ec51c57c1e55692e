// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory user record store.

use crate::db::UserRecordStore;
use crate::error::StoreError;
use crate::models::UserRecord;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// User records held in process memory, keyed by email.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    records: Arc<DashMap<String, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records currently stored for `email` (at most one).
    pub fn records_for(&self, email: &str) -> Vec<UserRecord> {
        self.records
            .iter()
            .filter(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait]
impl UserRecordStore for MemoryUserStore {
    async fn get_by_key(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.records.get(email).map(|r| r.value().clone()))
    }

    async fn query_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .find(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone()))
    }

    async fn upsert(&self, record: &UserRecord) -> Result<(), StoreError> {
        self.records.insert(record.email.clone(), record.clone());
        Ok(())
    }
}
