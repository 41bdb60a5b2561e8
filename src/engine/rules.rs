//! The leave rule set. Everything in here is pure: callers fetch the
//! relevant records up front and the checks run over plain values, so the
//! whole module is testable without a database.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

use crate::engine::error::RuleViolation;
use crate::engine::{LeavePolicy, LeaveSubmission};
use crate::model::leave_record::{LeaveDraft, LeaveRecord};

/// Expected wire format for leave dates, e.g. `2026-02-02`.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar days spanned by an inclusive range. Always >= 1 for a valid
/// range.
pub fn day_cost(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Allowance left for `year`: the policy quota minus the day cost of every
/// record lying entirely inside that calendar year. A record spanning a
/// year boundary counts towards neither year. May go negative; callers
/// treat zero/negative as "nothing left".
pub fn remaining_days(policy: &LeavePolicy, year: i32, records: &[LeaveRecord]) -> i64 {
    let consumed: i64 = records
        .iter()
        .filter(|r| r.date_start.year() == year && r.date_end.year() == year)
        .map(|r| day_cost(r.date_start, r.date_end))
        .sum();

    policy.quota_days - consumed
}

/// Whether the candidate range shares at least one calendar day with any of
/// the user's existing records. Ranges are inclusive, so two single-day
/// requests on the same date overlap. Records of other users never count.
pub fn has_overlap(user_id: u64, start: NaiveDate, end: NaiveDate, records: &[LeaveRecord]) -> bool {
    records
        .iter()
        .any(|r| r.user_id == user_id && r.date_start <= end && r.date_end >= start)
}

/// Whether `start` is no later than `today` plus the policy's advance
/// horizon in calendar months. Month addition clamps the day-of-month to
/// the last valid day of the target month (chrono `Months` semantics), so
/// Jan 31 + 2 months is Mar 31 and Dec 31 + 2 months is Feb 28/29.
pub fn within_advance_window(policy: &LeavePolicy, start: NaiveDate, today: NaiveDate) -> bool {
    let horizon = today
        .checked_add_months(Months::new(policy.advance_months))
        .unwrap_or(NaiveDate::MAX);

    start <= horizon
}

/// A record may be withdrawn until its end date has passed. Once the leave
/// period is over the record is permanent history.
pub fn can_withdraw(record: &LeaveRecord, today: NaiveDate) -> bool {
    record.date_end >= today
}

fn parse_date(raw: &str) -> Result<NaiveDate, RuleViolation> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| RuleViolation::InvalidDateFormat)
}

/// Runs the ordered create checks and, if they all pass, produces the draft
/// to persist. Fail-fast: the first violated rule is returned, in this
/// order — date format, range sanity, advance window, quota, overlap.
///
/// `year_records` must be the user's records for the current calendar year
/// (quota input), `all_records` the user's full set (overlap input); both
/// are expected to come from the same store read.
pub fn validate_create(
    policy: &LeavePolicy,
    user_id: u64,
    submission: &LeaveSubmission,
    now: DateTime<Utc>,
    year_records: &[LeaveRecord],
    all_records: &[LeaveRecord],
) -> Result<LeaveDraft, RuleViolation> {
    let date_start = parse_date(&submission.date_start)?;
    let date_end = parse_date(&submission.date_end)?;

    if date_end < date_start {
        return Err(RuleViolation::InvalidRange);
    }

    let today = now.date_naive();

    if !within_advance_window(policy, date_start, today) {
        return Err(RuleViolation::TooFarInAdvance);
    }

    let remaining = remaining_days(policy, today.year(), year_records);
    if day_cost(date_start, date_end) > remaining {
        return Err(RuleViolation::QuotaExceeded { remaining });
    }

    if has_overlap(user_id, date_start, date_end, all_records) {
        return Err(RuleViolation::OverlappingRequest);
    }

    Ok(LeaveDraft {
        user_id,
        reason: submission.reason.clone(),
        date_start,
        date_end,
        date_created: now,
    })
}

/// Ordered delete checks: ownership first (a foreign requester is rejected
/// regardless of eligibility), then withdrawal eligibility.
pub fn validate_delete(
    record: &LeaveRecord,
    requester_id: u64,
    today: NaiveDate,
) -> Result<(), RuleViolation> {
    if record.user_id != requester_id {
        return Err(RuleViolation::NotOwner);
    }

    if !can_withdraw(record, today) {
        return Err(RuleViolation::AlreadyElapsed);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(user_id: u64, start: NaiveDate, end: NaiveDate) -> LeaveRecord {
        LeaveRecord {
            id: 0,
            user_id,
            reason: "test".to_string(),
            date_start: start,
            date_end: end,
            date_created: Utc::now(),
        }
    }

    fn policy() -> LeavePolicy {
        LeavePolicy::default()
    }

    fn submission(start: &str, end: &str) -> LeaveSubmission {
        LeaveSubmission {
            reason: "trip".to_string(),
            date_start: start.to_string(),
            date_end: end.to_string(),
        }
    }

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn day_cost_is_inclusive() {
        assert_eq!(day_cost(date(2024, 3, 1), date(2024, 3, 1)), 1);
        assert_eq!(day_cost(date(2024, 3, 1), date(2024, 3, 5)), 5);
        assert_eq!(day_cost(date(2024, 12, 30), date(2025, 1, 2)), 4);
    }

    #[test]
    fn remaining_days_full_quota_for_empty_input() {
        assert_eq!(remaining_days(&policy(), 2024, &[]), 10);
    }

    #[test]
    fn remaining_days_subtracts_in_year_records() {
        let records = vec![
            record(1, date(2024, 2, 1), date(2024, 2, 3)), // 3 days
            record(1, date(2024, 6, 10), date(2024, 6, 11)), // 2 days
        ];
        assert_eq!(remaining_days(&policy(), 2024, &records), 5);
    }

    #[test]
    fn remaining_days_ignores_year_boundary_spanners() {
        let records = vec![
            record(1, date(2023, 12, 28), date(2024, 1, 2)), // neither year
            record(1, date(2024, 3, 1), date(2024, 3, 4)),   // 4 days
        ];
        assert_eq!(remaining_days(&policy(), 2024, &records), 6);
        assert_eq!(remaining_days(&policy(), 2023, &records), 10);
    }

    #[test]
    fn remaining_days_may_go_negative() {
        let records = vec![record(1, date(2024, 5, 1), date(2024, 5, 12))]; // 12 days
        assert_eq!(remaining_days(&policy(), 2024, &records), -2);
    }

    #[test]
    fn overlap_detects_same_single_day() {
        let records = vec![record(1, date(2024, 4, 10), date(2024, 4, 10))];
        assert!(has_overlap(1, date(2024, 4, 10), date(2024, 4, 10), &records));
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = (date(2024, 4, 1), date(2024, 4, 5));
        let b = (date(2024, 4, 5), date(2024, 4, 9));

        let holding_a = vec![record(1, a.0, a.1)];
        let holding_b = vec![record(1, b.0, b.1)];

        assert_eq!(
            has_overlap(1, b.0, b.1, &holding_a),
            has_overlap(1, a.0, a.1, &holding_b)
        );
    }

    #[test]
    fn overlap_ignores_adjacent_and_foreign_ranges() {
        let records = vec![
            record(1, date(2024, 4, 1), date(2024, 4, 5)),
            record(2, date(2024, 4, 8), date(2024, 4, 12)), // other user
        ];

        // Next calendar day after an existing range is free.
        assert!(!has_overlap(1, date(2024, 4, 6), date(2024, 4, 7), &records));
        // User 2's range never blocks user 1.
        assert!(!has_overlap(1, date(2024, 4, 8), date(2024, 4, 12), &records));
    }

    #[test]
    fn overlap_detects_containment() {
        let records = vec![record(1, date(2024, 4, 1), date(2024, 4, 30))];
        assert!(has_overlap(1, date(2024, 4, 10), date(2024, 4, 12), &records));
    }

    #[test]
    fn advance_window_boundary() {
        let today = date(2024, 1, 1);
        assert!(within_advance_window(&policy(), date(2024, 3, 1), today));
        assert!(!within_advance_window(&policy(), date(2024, 3, 2), today));
    }

    #[test]
    fn advance_window_clamps_month_end() {
        // Jan 31 + 2 months = Mar 31.
        assert!(within_advance_window(&policy(), date(2024, 3, 31), date(2024, 1, 31)));
        assert!(!within_advance_window(&policy(), date(2024, 4, 1), date(2024, 1, 31)));

        // Dec 31 + 2 months clamps to Feb 29 (2024 is a leap year).
        assert!(within_advance_window(&policy(), date(2024, 2, 29), date(2023, 12, 31)));
        assert!(!within_advance_window(&policy(), date(2024, 3, 1), date(2023, 12, 31)));
    }

    #[test]
    fn can_withdraw_until_end_date_passes() {
        let today = date(2024, 6, 15);

        let elapsed = record(1, date(2024, 6, 10), date(2024, 6, 14));
        assert!(!can_withdraw(&elapsed, today));

        let ends_today = record(1, date(2024, 6, 10), date(2024, 6, 15));
        assert!(can_withdraw(&ends_today, today));

        let future = record(1, date(2024, 7, 1), date(2024, 7, 5));
        assert!(can_withdraw(&future, today));
    }

    #[test]
    fn create_rejects_malformed_dates() {
        let now = noon(2024, 1, 1);

        let result = validate_create(&policy(), 1, &submission("01/03/2024", "2024-03-05"), now, &[], &[]);
        assert_eq!(result.unwrap_err(), RuleViolation::InvalidDateFormat);

        let result = validate_create(&policy(), 1, &submission("2024-02-01", "2024-02-30"), now, &[], &[]);
        assert_eq!(result.unwrap_err(), RuleViolation::InvalidDateFormat);
    }

    #[test]
    fn create_rejects_inverted_range() {
        let now = noon(2024, 1, 1);
        let result = validate_create(&policy(), 1, &submission("2024-02-10", "2024-02-08"), now, &[], &[]);
        assert_eq!(result.unwrap_err(), RuleViolation::InvalidRange);
    }

    #[test]
    fn create_rejects_start_beyond_horizon() {
        let now = noon(2024, 1, 1);

        // Exactly two months out is still allowed.
        assert!(validate_create(&policy(), 1, &submission("2024-03-01", "2024-03-01"), now, &[], &[]).is_ok());

        let result = validate_create(&policy(), 1, &submission("2024-03-02", "2024-03-02"), now, &[], &[]);
        assert_eq!(result.unwrap_err(), RuleViolation::TooFarInAdvance);
    }

    #[test]
    fn advance_window_outranks_overlap() {
        let now = noon(2024, 1, 1);
        let records = vec![record(1, date(2024, 3, 2), date(2024, 3, 2))];

        let result = validate_create(
            &policy(),
            1,
            &submission("2024-03-02", "2024-03-02"),
            now,
            &records,
            &records,
        );
        assert_eq!(result.unwrap_err(), RuleViolation::TooFarInAdvance);
    }

    #[test]
    fn create_quota_exact_boundary() {
        let now = noon(2024, 1, 1);

        // Ten days with a clean slate fits exactly.
        assert!(validate_create(&policy(), 1, &submission("2024-01-10", "2024-01-19"), now, &[], &[]).is_ok());

        // Eleven days does not.
        let result = validate_create(&policy(), 1, &submission("2024-01-10", "2024-01-20"), now, &[], &[]);
        assert_eq!(result.unwrap_err(), RuleViolation::QuotaExceeded { remaining: 10 });
    }

    #[test]
    fn create_quota_accumulates_prior_records() {
        let now = noon(2024, 1, 1);
        let records = vec![record(1, date(2024, 1, 2), date(2024, 1, 4))]; // 3 days used

        let result = validate_create(
            &policy(),
            1,
            &submission("2024-02-01", "2024-02-08"), // 8 days
            now,
            &records,
            &records,
        );
        assert_eq!(result.unwrap_err(), RuleViolation::QuotaExceeded { remaining: 7 });

        // A 7-day span still fits.
        assert!(
            validate_create(
                &policy(),
                1,
                &submission("2024-02-01", "2024-02-07"),
                now,
                &records,
                &records,
            )
            .is_ok()
        );
    }

    #[test]
    fn quota_outranks_overlap() {
        let now = noon(2024, 1, 1);
        let records = vec![record(1, date(2024, 1, 2), date(2024, 1, 9))]; // 8 days used

        // Overlaps the existing record AND exceeds the remaining 2 days.
        let result = validate_create(
            &policy(),
            1,
            &submission("2024-01-05", "2024-01-11"),
            now,
            &records,
            &records,
        );
        assert_eq!(result.unwrap_err(), RuleViolation::QuotaExceeded { remaining: 2 });
    }

    #[test]
    fn create_rejects_overlap() {
        let now = noon(2024, 1, 1);
        let records = vec![record(1, date(2024, 1, 10), date(2024, 1, 12))];

        let result = validate_create(
            &policy(),
            1,
            &submission("2024-01-12", "2024-01-13"),
            now,
            &records,
            &records,
        );
        assert_eq!(result.unwrap_err(), RuleViolation::OverlappingRequest);
    }

    #[test]
    fn create_builds_draft_from_submission() {
        let now = noon(2024, 1, 1);
        let draft = validate_create(&policy(), 7, &submission("2024-02-05", "2024-02-07"), now, &[], &[])
            .unwrap();

        assert_eq!(draft.user_id, 7);
        assert_eq!(draft.reason, "trip");
        assert_eq!(draft.date_start, date(2024, 2, 5));
        assert_eq!(draft.date_end, date(2024, 2, 7));
        assert_eq!(draft.date_created, now);
    }

    #[test]
    fn delete_checks_ownership_before_eligibility() {
        let today = date(2024, 6, 15);
        let elapsed_foreign = record(2, date(2024, 6, 1), date(2024, 6, 5));

        // Foreign requester gets NotOwner even though the record is also
        // past its end date.
        assert_eq!(
            validate_delete(&elapsed_foreign, 1, today).unwrap_err(),
            RuleViolation::NotOwner
        );

        let elapsed_own = record(1, date(2024, 6, 1), date(2024, 6, 5));
        assert_eq!(
            validate_delete(&elapsed_own, 1, today).unwrap_err(),
            RuleViolation::AlreadyElapsed
        );

        let active_own = record(1, date(2024, 6, 15), date(2024, 6, 20));
        assert!(validate_delete(&active_own, 1, today).is_ok());
    }
}
