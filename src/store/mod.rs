#[cfg(test)]
pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::leave_record::{LeaveDraft, LeaveRecord};

/// Persistence failure. Propagated to the caller as a generic
/// "operation failed" outcome; nothing in here is retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read/write access to the per-user leave record collection. The engine
/// treats every call as an opaque operation that completes before the next
/// rule runs.
#[async_trait]
pub trait LeaveStore: Send + Sync {
    /// All records owned by the user, oldest submission first.
    async fn list_by_user(&self, user_id: u64) -> StoreResult<Vec<LeaveRecord>>;

    /// Records whose start AND end both fall inside the given calendar
    /// year. A range spanning a year boundary belongs to neither year.
    async fn list_by_user_and_year(&self, user_id: u64, year: i32) -> StoreResult<Vec<LeaveRecord>>;

    async fn get_by_id(&self, id: u64) -> StoreResult<Option<LeaveRecord>>;

    /// Persists a validated draft and returns the stored record with its
    /// assigned id.
    async fn insert(&self, draft: &LeaveDraft) -> StoreResult<LeaveRecord>;

    async fn delete_by_id(&self, id: u64) -> StoreResult<()>;
}
