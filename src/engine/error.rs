use thiserror::Error;

use crate::store::StoreError;

/// A business rule the candidate operation ran into. Every variant is an
/// expected, user-correctable outcome; the display text is what the HTTP
/// layer hands back to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleViolation {
    /// A date field did not parse as `YYYY-MM-DD`.
    #[error("Please enter valid dates")]
    InvalidDateFormat,

    /// End date before start date.
    #[error("date_start cannot be after date_end")]
    InvalidRange,

    /// Start date lies beyond the configured advance horizon.
    #[error("Requested start date is too far in advance")]
    TooFarInAdvance,

    /// The requested span does not fit into the remaining annual allowance.
    /// `remaining` is the allowance left for the year at check time and may
    /// be zero or negative.
    #[error("Not enough leave days left: {remaining} remaining this year")]
    QuotaExceeded { remaining: i64 },

    /// The candidate range shares at least one day with an existing record.
    #[error("Requested dates overlap an existing leave request")]
    OverlappingRequest,

    /// Delete attempted by a user who does not own the record.
    #[error("You do not have permission to delete this request")]
    NotOwner,

    /// Delete attempted after the leave period fully elapsed.
    #[error("Leave that has already ended cannot be withdrawn")]
    AlreadyElapsed,
}

/// Engine-level outcome of a create or delete attempt.
#[derive(Debug, Error)]
pub enum LeaveError {
    #[error(transparent)]
    Rule(#[from] RuleViolation),

    /// The addressed record does not exist (delete/fetch path).
    #[error("Leave request not found")]
    NotFound,

    /// The persistence layer failed; surfaced as-is, never retried.
    #[error(transparent)]
    Store(#[from] StoreError),
}
