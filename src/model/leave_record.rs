use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A persisted leave request. The date range is inclusive on both ends and
/// is never mutated after creation; withdrawal removes the row entirely.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "user_id": 42,
        "reason": "Family trip",
        "date_start": "2026-02-02",
        "date_end": "2026-02-06",
        "date_created": "2026-01-15T09:30:00Z"
    })
)]
pub struct LeaveRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 42)]
    pub user_id: u64,

    #[schema(example = "Family trip")]
    pub reason: String,

    #[schema(example = "2026-02-02", value_type = String, format = "date")]
    pub date_start: NaiveDate,

    #[schema(example = "2026-02-06", value_type = String, format = "date")]
    pub date_end: NaiveDate,

    #[schema(example = "2026-01-15T09:30:00Z", value_type = String, format = "date-time")]
    pub date_created: DateTime<Utc>,
}

/// A validated request that has not been persisted yet. The store assigns
/// the id on insert; everything else is final.
#[derive(Debug, Clone)]
pub struct LeaveDraft {
    pub user_id: u64,
    pub reason: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub date_created: DateTime<Utc>,
}
