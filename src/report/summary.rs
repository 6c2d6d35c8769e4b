//! Monthly metrics aggregation.
//!
//! Combines a user's raw check-in/check-out events, the configured
//! working-days count and the approved-leave count into the derived monthly
//! counters shown on the admin report.

use crate::model::event::{AttendanceEvent, EventStatus};
use serde::Serialize;
use utoipa::ToSchema;

/// Derived per-user counters for one month.
///
/// `holidays`, `absent` and `extra_days` are `None` when the month has no
/// working-days entry: a missing calendar must degrade the report, never be
/// papered over with a default of zero.
///
/// The flooring is deliberately uneven. `extra_days` and `absent` are floored
/// at zero, while `holidays` and `late_adjustment` are signed: a negative
/// holiday count surfaces a misconfigured calendar, and a negative late
/// adjustment means overtime check-outs outnumbered late check-ins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[schema(example = json!({
    "total_check_ins": 26,
    "late_check_ins": 3,
    "late_check_outs": 2,
    "approved_leaves": 1,
    "holidays": 2,
    "absent": 0,
    "extra_days": 2,
    "late_adjustment": 1
}))]
pub struct UserMonthlySummary {
    pub total_check_ins: u32,
    pub late_check_ins: u32,
    pub late_check_outs: u32,
    pub approved_leaves: u32,
    #[schema(nullable = true)]
    pub holidays: Option<i32>,
    #[schema(nullable = true)]
    pub absent: Option<u32>,
    #[schema(nullable = true)]
    pub extra_days: Option<u32>,
    pub late_adjustment: i32,
}

/// Aggregates one user's month. Pure; identical inputs give identical output.
///
/// `working_days` is `None` when the calendar has no entry for the month.
pub fn summarize_month(
    working_days: Option<u32>,
    days_in_month: u32,
    check_ins: &[AttendanceEvent],
    check_outs: &[AttendanceEvent],
    approved_leaves: u32,
) -> UserMonthlySummary {
    let total_check_ins = check_ins.len() as u32;
    let late_check_ins = check_ins
        .iter()
        .filter(|event| event.status == EventStatus::Late)
        .count() as u32;
    let late_check_outs = check_outs
        .iter()
        .filter(|event| event.status == EventStatus::Overtime)
        .count() as u32;

    let (holidays, absent, extra_days) = match working_days {
        Some(expected) => {
            let extra = total_check_ins.saturating_sub(expected);
            let holidays = days_in_month as i32 - expected as i32 - extra as i32;
            let absent = expected
                .saturating_sub(total_check_ins)
                .saturating_sub(approved_leaves);
            (Some(holidays), Some(absent), Some(extra))
        }
        None => (None, None, None),
    };

    UserMonthlySummary {
        total_check_ins,
        late_check_ins,
        late_check_outs,
        approved_leaves,
        holidays,
        absent,
        extra_days,
        late_adjustment: late_check_ins as i32 - late_check_outs as i32,
    }
}
