use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;
use tracing::debug;

use crate::model::leave_record::{LeaveDraft, LeaveRecord};
use crate::store::{LeaveStore, StoreResult};

/// `LeaveStore` backed by the `leave_records` table.
#[derive(Clone)]
pub struct MySqlLeaveStore {
    pool: MySqlPool,
}

impl MySqlLeaveStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// First and last day of a calendar year, or `None` when chrono cannot
/// represent the year at all.
fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let jan_1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let dec_31 = NaiveDate::from_ymd_opt(year, 12, 31)?;
    Some((jan_1, dec_31))
}

#[async_trait]
impl LeaveStore for MySqlLeaveStore {
    async fn list_by_user(&self, user_id: u64) -> StoreResult<Vec<LeaveRecord>> {
        let records = sqlx::query_as::<_, LeaveRecord>(
            r#"
            SELECT id, user_id, reason, date_start, date_end, date_created
            FROM leave_records
            WHERE user_id = ?
            ORDER BY date_created
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn list_by_user_and_year(&self, user_id: u64, year: i32) -> StoreResult<Vec<LeaveRecord>> {
        // Both bounds must sit inside the year; a range spanning the boundary
        // belongs to neither year.
        let (jan_1, dec_31) = match year_bounds(year) {
            Some(bounds) => bounds,
            // No representable date can fall inside such a year.
            None => return Ok(Vec::new()),
        };

        let records = sqlx::query_as::<_, LeaveRecord>(
            r#"
            SELECT id, user_id, reason, date_start, date_end, date_created
            FROM leave_records
            WHERE user_id = ? AND date_start >= ? AND date_end <= ?
            ORDER BY date_created
            "#,
        )
        .bind(user_id)
        .bind(jan_1)
        .bind(dec_31)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn get_by_id(&self, id: u64) -> StoreResult<Option<LeaveRecord>> {
        let record = sqlx::query_as::<_, LeaveRecord>(
            r#"
            SELECT id, user_id, reason, date_start, date_end, date_created
            FROM leave_records
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn insert(&self, draft: &LeaveDraft) -> StoreResult<LeaveRecord> {
        debug!(
            user_id = draft.user_id,
            date_start = %draft.date_start,
            date_end = %draft.date_end,
            "Inserting leave record"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO leave_records (user_id, reason, date_start, date_end, date_created)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(draft.user_id)
        .bind(&draft.reason)
        .bind(draft.date_start)
        .bind(draft.date_end)
        .bind(draft.date_created)
        .execute(&self.pool)
        .await?;

        Ok(LeaveRecord {
            id: result.last_insert_id(),
            user_id: draft.user_id,
            reason: draft.reason.clone(),
            date_start: draft.date_start,
            date_end: draft.date_end,
            date_created: draft.date_created,
        })
    }

    async fn delete_by_id(&self, id: u64) -> StoreResult<()> {
        debug!(id, "Deleting leave record");

        sqlx::query("DELETE FROM leave_records WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
