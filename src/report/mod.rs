//! The attendance aggregation engine.
//!
//! `summary` and `daily` are pure transforms over in-memory inputs; `service`
//! fans them out across a roster through the provider contracts.

pub mod daily;
pub mod error;
pub mod month;
pub mod service;
pub mod summary;

pub use daily::{DaySlot, build_daily_grid};
pub use error::ReportError;
pub use month::{MonthKey, MonthKeyError};
pub use service::{
    DailyGridReport, DailyGridRow, MonthlySummaryReport, ReportOptions, ReportService, SummaryRow,
};
pub use summary::{UserMonthlySummary, summarize_month};
