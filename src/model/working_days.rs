use crate::report::month::MonthKey;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Configured expected-working-days count for one month.
///
/// At most one entry per month; a missing entry means the month is
/// unconfigured and reports must degrade rather than assume zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "month": "2025-02", "working_days": 24 }))]
pub struct WorkingDaysEntry {
    #[schema(example = "2025-02", value_type = String)]
    pub month: MonthKey,

    #[schema(example = 24, minimum = 1, maximum = 31)]
    pub working_days: u32,
}
