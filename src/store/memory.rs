//! In-memory `LeaveStore` used by the engine test suites. No I/O, no
//! failure modes; behaves like the MySQL store for filtering and id
//! assignment.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};

use crate::model::leave_record::{LeaveDraft, LeaveRecord};
use crate::store::{LeaveStore, StoreResult};

pub struct MemoryLeaveStore {
    records: Mutex<Vec<LeaveRecord>>,
    next_id: AtomicU64,
}

impl MemoryLeaveStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Seeds a record directly, bypassing validation.
    pub fn seed(&self, user_id: u64, start: NaiveDate, end: NaiveDate) -> LeaveRecord {
        let record = LeaveRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id,
            reason: "seeded".to_string(),
            date_start: start,
            date_end: end,
            date_created: chrono::Utc::now(),
        };
        self.records.lock().unwrap().push(record.clone());
        record
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl LeaveStore for MemoryLeaveStore {
    async fn list_by_user(&self, user_id: u64) -> StoreResult<Vec<LeaveRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_by_user_and_year(&self, user_id: u64, year: i32) -> StoreResult<Vec<LeaveRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| {
                r.user_id == user_id && r.date_start.year() == year && r.date_end.year() == year
            })
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: u64) -> StoreResult<Option<LeaveRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, draft: &LeaveDraft) -> StoreResult<LeaveRecord> {
        let record = LeaveRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id: draft.user_id,
            reason: draft.reason.clone(),
            date_start: draft.date_start,
            date_end: draft.date_end,
            date_created: draft.date_created,
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn delete_by_id(&self, id: u64) -> StoreResult<()> {
        self.records.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[actix_web::test]
    async fn year_listing_excludes_boundary_spanners() {
        let store = MemoryLeaveStore::new();
        store.seed(1, date(2024, 3, 1), date(2024, 3, 5));
        store.seed(1, date(2024, 12, 30), date(2025, 1, 2)); // spans the boundary
        store.seed(1, date(2025, 6, 1), date(2025, 6, 1));
        store.seed(2, date(2024, 3, 1), date(2024, 3, 5)); // other user

        let of_2024 = store.list_by_user_and_year(1, 2024).await.unwrap();
        assert_eq!(of_2024.len(), 1);
        assert_eq!(of_2024[0].date_start, date(2024, 3, 1));

        let of_2025 = store.list_by_user_and_year(1, 2025).await.unwrap();
        assert_eq!(of_2025.len(), 1);
    }

    #[actix_web::test]
    async fn year_listing_of_an_unrepresentable_year_is_empty() {
        let store = MemoryLeaveStore::new();
        store.seed(1, date(2024, 3, 1), date(2024, 3, 5));

        // Same verdict as the MySQL store: such a year holds no dates.
        let records = store.list_by_user_and_year(1, 300_000).await.unwrap();
        assert!(records.is_empty());
    }

    #[actix_web::test]
    async fn year_listing_is_idempotent_for_unchanged_state() {
        let store = MemoryLeaveStore::new();
        store.seed(1, date(2024, 3, 1), date(2024, 3, 5));
        store.seed(1, date(2024, 7, 1), date(2024, 7, 3));

        let first = store.list_by_user_and_year(1, 2024).await.unwrap();
        let second = store.list_by_user_and_year(1, 2024).await.unwrap();

        let ids = |v: &[LeaveRecord]| v.iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
    }
}
