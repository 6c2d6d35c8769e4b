use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// A single check-in or check-out occurrence recorded by a check-in device.
///
/// Immutable once recorded; the reporting core only reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "user_id": 42,
    "time": "2025-02-15T09:07:00",
    "kind": "check_in",
    "status": "on_time"
}))]
pub struct AttendanceEvent {
    #[schema(example = 42)]
    pub user_id: u64,

    #[schema(example = "2025-02-15T09:07:00", value_type = String, format = "date-time")]
    pub time: NaiveDateTime,

    pub kind: EventKind,

    pub status: EventStatus,
}

/// Direction of an attendance event, stored as a TEXT column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    CheckIn,
    CheckOut,
}

/// Punctuality marker stamped when the event is recorded.
///
/// `OnTime`/`Late` apply to check-ins, `Normal`/`Overtime` to check-outs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventStatus {
    OnTime,
    Late,
    Normal,
    Overtime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_db_strings() {
        for status in [
            EventStatus::OnTime,
            EventStatus::Late,
            EventStatus::Normal,
            EventStatus::Overtime,
        ] {
            let stored = status.to_string();
            assert_eq!(stored.parse::<EventStatus>().unwrap(), status);
        }
        assert_eq!(EventStatus::OnTime.to_string(), "on_time");
        assert_eq!(EventKind::CheckIn.to_string(), "check_in");
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        assert!("very_late".parse::<EventStatus>().is_err());
    }
}
