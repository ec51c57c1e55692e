//! User record store (Firestore, or in-memory for local development).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreUserStore;
pub use memory::MemoryUserStore;

use crate::error::StoreError;
use crate::models::UserRecord;
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
}

/// Backing store for user records, keyed by email.
///
/// Writes are upserts keyed by email, so concurrent writers for the same
/// email never produce two records; the last write wins.
#[async_trait]
pub trait UserRecordStore: Send + Sync {
    /// Primary lookup by record key.
    async fn get_by_key(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Secondary lookup through the `email` field.
    async fn query_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Create or replace the record keyed by `record.email`.
    async fn upsert(&self, record: &UserRecord) -> Result<(), StoreError>;

    /// True if either lookup path finds a record.
    async fn exists(&self, email: &str) -> Result<bool, StoreError> {
        if self.get_by_key(email).await?.is_some() {
            return Ok(true);
        }
        Ok(self.query_by_email(email).await?.is_some())
    }
}
