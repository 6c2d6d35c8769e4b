//! Day-by-day attendance grid.
//!
//! Lays one user's events out over every calendar day of the month, one
//! `{in, out}` slot per day, with clock times formatted for display.

use crate::model::event::AttendanceEvent;
use crate::report::month::MonthKey;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use utoipa::ToSchema;

/// Display format for slot clock times, e.g. "09:07 AM".
const SLOT_TIME_FORMAT: &str = "%I:%M %p";

/// One calendar day's formatted check-in/check-out pair. Empty strings mean
/// no event landed on that day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[schema(example = json!({ "in": "09:07 AM", "out": "07:12 PM" }))]
pub struct DaySlot {
    #[serde(rename = "in")]
    pub check_in: String,
    #[serde(rename = "out")]
    pub check_out: String,
}

/// Builds the daily grid for one user and month.
///
/// Returns exactly one slot per day `1..=days_in_month`, however many events
/// exist. Events are indexed by calendar date up front; when several events
/// of the same kind fall on one date, the first in provider order wins (the
/// event stores return events in ascending time order, so that is the
/// earliest of the day).
pub fn build_daily_grid(
    month: MonthKey,
    check_ins: &[AttendanceEvent],
    check_outs: &[AttendanceEvent],
) -> BTreeMap<u32, DaySlot> {
    let ins = index_by_date(check_ins);
    let outs = index_by_date(check_outs);

    month
        .days()
        .map(|(day, date)| {
            let slot = DaySlot {
                check_in: format_slot(ins.get(&date)),
                check_out: format_slot(outs.get(&date)),
            };
            (day, slot)
        })
        .collect()
}

fn index_by_date(events: &[AttendanceEvent]) -> HashMap<NaiveDate, NaiveDateTime> {
    let mut index = HashMap::with_capacity(events.len());
    for event in events {
        // First event per date wins.
        index.entry(event.time.date()).or_insert(event.time);
    }
    index
}

fn format_slot(time: Option<&NaiveDateTime>) -> String {
    time.map(|t| t.format(SLOT_TIME_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::{EventKind, EventStatus};
    use chrono::NaiveDate;

    fn event(kind: EventKind, day: u32, hour: u32, min: u32) -> AttendanceEvent {
        AttendanceEvent {
            user_id: 1,
            time: NaiveDate::from_ymd_opt(2025, 6, day)
                .unwrap()
                .and_hms_opt(hour, min, 0)
                .unwrap(),
            kind,
            status: match kind {
                EventKind::CheckIn => EventStatus::OnTime,
                EventKind::CheckOut => EventStatus::Normal,
            },
        }
    }

    #[test]
    fn one_slot_per_calendar_day() {
        // 2025-06 has 30 days; one check-in on day 15, no check-outs.
        let month: MonthKey = "2025-06".parse().unwrap();
        let check_ins = vec![event(EventKind::CheckIn, 15, 9, 7)];

        let grid = build_daily_grid(month, &check_ins, &[]);

        assert_eq!(grid.len(), 30);
        assert_eq!(grid.keys().copied().collect::<Vec<_>>(), (1..=30).collect::<Vec<_>>());
        assert_eq!(grid[&15].check_in, "09:07 AM");
        assert_eq!(grid[&15].check_out, "");
        for day in (1..=30).filter(|d| *d != 15) {
            assert_eq!(grid[&day], DaySlot::default());
        }
    }

    #[test]
    fn first_event_of_a_day_wins() {
        let month: MonthKey = "2025-06".parse().unwrap();
        let check_ins = vec![
            event(EventKind::CheckIn, 10, 8, 55),
            event(EventKind::CheckIn, 10, 13, 2),
        ];

        let grid = build_daily_grid(month, &check_ins, &[]);

        assert_eq!(grid[&10].check_in, "08:55 AM");
    }

    #[test]
    fn afternoon_times_render_with_pm_marker() {
        let month: MonthKey = "2025-06".parse().unwrap();
        let check_outs = vec![event(EventKind::CheckOut, 3, 19, 12)];

        let grid = build_daily_grid(month, &[], &check_outs);

        assert_eq!(grid[&3].check_out, "07:12 PM");
        assert_eq!(grid[&3].check_in, "");
    }

    #[test]
    fn events_outside_the_month_are_ignored() {
        let month: MonthKey = "2025-07".parse().unwrap();
        // Event dated in June must not leak into July's grid.
        let check_ins = vec![event(EventKind::CheckIn, 30, 9, 0)];

        let grid = build_daily_grid(month, &check_ins, &[]);

        assert_eq!(grid.len(), 31);
        assert!(grid.values().all(|slot| slot.check_in.is_empty()));
    }

    #[test]
    fn slot_serializes_with_short_field_names() {
        let slot = DaySlot {
            check_in: "09:07 AM".to_string(),
            check_out: String::new(),
        };
        assert_eq!(
            serde_json::to_string(&slot).unwrap(),
            r#"{"in":"09:07 AM","out":""}"#
        );
    }
}
