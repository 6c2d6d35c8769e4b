//! Provider contracts the reporting core consumes.
//!
//! The calendar, leave ledger, event store and roster are external
//! collaborators; the core only reads them through these traits. Each trait
//! has a MySQL implementation for the server and an in-memory one for tests
//! and embedding.

pub mod memory;
pub mod mysql;

use crate::model::event::AttendanceEvent;
use crate::model::user::{RosterFilter, UserRef};
use crate::model::working_days::WorkingDaysEntry;
use crate::report::month::MonthKey;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed stored event for user {user_id}: {message}")]
    MalformedEvent { user_id: u64, message: String },

    #[error("{message}")]
    Unavailable { message: String },
}

/// Working-days calendar lookups and configuration writes.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// `None` when no working-days entry exists for the month.
    async fn working_days(&self, month: MonthKey) -> Result<Option<u32>, ProviderError>;

    /// All configured entries of one year, in month order.
    async fn year_entries(&self, year: i32) -> Result<Vec<WorkingDaysEntry>, ProviderError>;

    /// Upserts the entry for `month`. Range validation happens at the HTTP
    /// write boundary before this is called.
    async fn set_working_days(&self, month: MonthKey, days: u32) -> Result<(), ProviderError>;
}

/// Approved-leave ledger, derived externally from the leave-request workflow.
#[async_trait]
pub trait LeaveLedgerProvider: Send + Sync {
    /// Approved leave days of one user clipped to the month.
    async fn approved_leave_days(&self, user_id: u64, month: MonthKey)
    -> Result<u32, ProviderError>;

    /// Count of leave requests still awaiting a decision.
    async fn pending_count(&self) -> Result<u64, ProviderError>;
}

/// Raw check-in/check-out event store.
#[async_trait]
pub trait EventStoreProvider: Send + Sync {
    /// One user's check-ins within the month, ascending by time.
    async fn check_ins(
        &self,
        user_id: u64,
        month: MonthKey,
    ) -> Result<Vec<AttendanceEvent>, ProviderError>;

    /// One user's check-outs within the month, ascending by time.
    async fn check_outs(
        &self,
        user_id: u64,
        month: MonthKey,
    ) -> Result<Vec<AttendanceEvent>, ProviderError>;

    /// Appends a freshly stamped event. Events are immutable once recorded.
    async fn record(&self, event: &AttendanceEvent) -> Result<(), ProviderError>;
}

/// Roster lookups, already filtered by role/group/zone.
#[async_trait]
pub trait RosterProvider: Send + Sync {
    /// Matching users in stable provider order; report rows keep this order.
    async fn roster(&self, filter: &RosterFilter) -> Result<Vec<UserRef>, ProviderError>;
}
