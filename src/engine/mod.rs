//! Leave request validation engine: every create or delete goes through the
//! ordered rule checks in [`rules`] before the store is touched. The engine
//! owns no global state; the store and the policy are injected.

pub mod error;
pub mod rules;

use chrono::{DateTime, Datelike, Utc};

use crate::engine::error::{LeaveError, RuleViolation};
use crate::model::leave_record::LeaveRecord;
use crate::store::LeaveStore;
use crate::utils::user_locks::UserLocks;

/// Business policy the rule checks run against. Fixed per deployment, not
/// per user; see `Config::leave_policy` for the env overrides.
#[derive(Debug, Clone)]
pub struct LeavePolicy {
    /// Maximum total day cost of one user's records inside one calendar year.
    pub quota_days: i64,
    /// How many calendar months ahead a request may start.
    pub advance_months: u32,
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self {
            quota_days: 10,
            advance_months: 2,
        }
    }
}

/// Raw create-request fields exactly as the caller submitted them. Dates
/// stay strings until the engine parses them (`YYYY-MM-DD`).
#[derive(Debug, Clone)]
pub struct LeaveSubmission {
    pub reason: String,
    pub date_start: String,
    pub date_end: String,
}

/// Orchestrates the rule checks around a store. State-changing operations
/// take a per-user lock so the overlap and quota checks always observe the
/// latest committed records for that user (closing the read-then-write race
/// a bare store would have).
pub struct LeaveEngine<S> {
    store: S,
    policy: LeavePolicy,
    locks: UserLocks,
}

impl<S: LeaveStore> LeaveEngine<S> {
    pub fn new(store: S, policy: LeavePolicy) -> Self {
        Self {
            store,
            policy,
            locks: UserLocks::new(),
        }
    }

    pub fn policy(&self) -> &LeavePolicy {
        &self.policy
    }

    /// Validates and persists a new leave request for `user_id`. Returns
    /// the stored record, or the first violated rule. Nothing is written
    /// when any check fails.
    pub async fn submit(
        &self,
        user_id: u64,
        submission: &LeaveSubmission,
        now: DateTime<Utc>,
    ) -> Result<LeaveRecord, LeaveError> {
        let _guard = self.locks.acquire(user_id).await;

        let year = now.date_naive().year();
        let year_records = self.store.list_by_user_and_year(user_id, year).await?;
        let all_records = self.store.list_by_user(user_id).await?;

        let draft = rules::validate_create(
            &self.policy,
            user_id,
            submission,
            now,
            &year_records,
            &all_records,
        )?;

        let record = self.store.insert(&draft).await?;
        Ok(record)
    }

    /// Withdraws an existing request on behalf of `requester_id`. Ownership
    /// is checked before eligibility; a missing record is `NotFound`.
    pub async fn withdraw(
        &self,
        record_id: u64,
        requester_id: u64,
        now: DateTime<Utc>,
    ) -> Result<(), LeaveError> {
        let _guard = self.locks.acquire(requester_id).await;

        let record = self
            .store
            .get_by_id(record_id)
            .await?
            .ok_or(LeaveError::NotFound)?;

        rules::validate_delete(&record, requester_id, now.date_naive())?;

        self.store.delete_by_id(record.id).await?;
        Ok(())
    }

    /// Owner-only fetch of a single record.
    pub async fn fetch(&self, record_id: u64, requester_id: u64) -> Result<LeaveRecord, LeaveError> {
        let record = self
            .store
            .get_by_id(record_id)
            .await?
            .ok_or(LeaveError::NotFound)?;

        if record.user_id != requester_id {
            return Err(RuleViolation::NotOwner.into());
        }

        Ok(record)
    }

    /// The user's records, optionally narrowed to one calendar year.
    pub async fn list(&self, user_id: u64, year: Option<i32>) -> Result<Vec<LeaveRecord>, LeaveError> {
        let records = match year {
            Some(y) => self.store.list_by_user_and_year(user_id, y).await?,
            None => self.store.list_by_user(user_id).await?,
        };
        Ok(records)
    }

    /// Remaining allowance for the user in `year`. Zero or negative means
    /// nothing left.
    pub async fn remaining(&self, user_id: u64, year: i32) -> Result<i64, LeaveError> {
        let records = self.store.list_by_user_and_year(user_id, year).await?;
        Ok(rules::remaining_days(&self.policy, year, &records))
    }
}
