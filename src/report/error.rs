use crate::provider::ProviderError;
use crate::report::month::MonthKey;
use thiserror::Error;

/// Failures that abort a whole report.
///
/// Per-user fetch problems never surface here; they become `Failed` row
/// markers so the rest of the roster still reports. Only the shared inputs,
/// the roster itself and the calendar store, can fail the batch.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to fetch roster: {source}")]
    RosterFetch {
        #[source]
        source: ProviderError,
    },

    #[error("failed to resolve working days for {month}: {source}")]
    CalendarFetch {
        month: MonthKey,
        #[source]
        source: ProviderError,
    },
}
