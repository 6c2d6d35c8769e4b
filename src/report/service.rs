//! Report assembly: fans the per-user aggregation out across a roster.
//!
//! The roster is processed in fixed-size chunks; within a chunk the per-user
//! fetches run concurrently and are awaited together, so a large roster never
//! produces unbounded in-flight provider calls. Output order always matches
//! roster order.

use crate::model::event::AttendanceEvent;
use crate::model::user::{RosterFilter, UserRef};
use crate::provider::{
    CalendarProvider, EventStoreProvider, LeaveLedgerProvider, ProviderError, RosterProvider,
};
use crate::report::daily::{DaySlot, build_daily_grid};
use crate::report::error::ReportError;
use crate::report::month::MonthKey;
use crate::report::summary::{UserMonthlySummary, summarize_month};
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use utoipa::ToSchema;

/// Fan-out knobs, sourced from config.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// How many per-user fetches run concurrently.
    pub fetch_batch_size: usize,
    /// Per-user deadline; a slow fetch fails only its own row.
    pub fetch_timeout: Duration,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            fetch_batch_size: 16,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// One roster member's outcome in the summary report.
///
/// Every roster member produces exactly one row; a fetch failure is recorded
/// on the row instead of aborting the batch.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryRow {
    Ready {
        user: UserRef,
        summary: UserMonthlySummary,
    },
    Failed {
        user: UserRef,
        error: String,
    },
}

/// One roster member's outcome in the daily-grid report.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DailyGridRow {
    Ready {
        user: UserRef,
        days: BTreeMap<u32, DaySlot>,
    },
    Failed {
        user: UserRef,
        error: String,
    },
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlySummaryReport {
    #[schema(example = "2025-02", value_type = String)]
    pub month: MonthKey,
    #[schema(example = 28)]
    pub days_in_month: u32,
    /// `None` when the month has no working-days entry; rows then carry
    /// degraded summaries.
    #[schema(example = 24, nullable = true)]
    pub working_days: Option<u32>,
    pub rows: Vec<SummaryRow>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyGridReport {
    #[schema(example = "2025-02", value_type = String)]
    pub month: MonthKey,
    #[schema(example = 28)]
    pub days_in_month: u32,
    #[schema(example = 24, nullable = true)]
    pub working_days: Option<u32>,
    pub rows: Vec<DailyGridRow>,
}

/// Assembles monthly reports over the provider contracts.
///
/// Holds no per-request state; every report is computed fresh from the
/// providers and owned by the caller.
pub struct ReportService {
    calendar: Arc<dyn CalendarProvider>,
    leaves: Arc<dyn LeaveLedgerProvider>,
    events: Arc<dyn EventStoreProvider>,
    roster: Arc<dyn RosterProvider>,
    options: ReportOptions,
}

impl ReportService {
    pub fn new(
        calendar: Arc<dyn CalendarProvider>,
        leaves: Arc<dyn LeaveLedgerProvider>,
        events: Arc<dyn EventStoreProvider>,
        roster: Arc<dyn RosterProvider>,
        options: ReportOptions,
    ) -> Self {
        Self {
            calendar,
            leaves,
            events,
            roster,
            options,
        }
    }

    pub async fn monthly_summary(
        &self,
        month: MonthKey,
        filter: &RosterFilter,
    ) -> Result<MonthlySummaryReport, ReportError> {
        let (users, working_days) = self.shared_inputs(month, filter).await?;
        let days_in_month = month.days_in_month();

        let mut rows = Vec::with_capacity(users.len());
        for chunk in users.chunks(self.options.fetch_batch_size) {
            let fetches = chunk
                .iter()
                .map(|user| self.fetch_row(user, month, working_days, days_in_month));
            rows.extend(join_all(fetches).await);
        }

        Ok(MonthlySummaryReport {
            month,
            days_in_month,
            working_days,
            rows,
        })
    }

    pub async fn daily_grid(
        &self,
        month: MonthKey,
        filter: &RosterFilter,
    ) -> Result<DailyGridReport, ReportError> {
        let (users, working_days) = self.shared_inputs(month, filter).await?;

        let mut rows = Vec::with_capacity(users.len());
        for chunk in users.chunks(self.options.fetch_batch_size) {
            let fetches = chunk.iter().map(|user| self.fetch_grid_row(user, month));
            rows.extend(join_all(fetches).await);
        }

        Ok(DailyGridReport {
            month,
            days_in_month: month.days_in_month(),
            working_days,
            rows,
        })
    }

    async fn shared_inputs(
        &self,
        month: MonthKey,
        filter: &RosterFilter,
    ) -> Result<(Vec<UserRef>, Option<u32>), ReportError> {
        let users = self
            .roster
            .roster(filter)
            .await
            .map_err(|source| ReportError::RosterFetch { source })?;
        let working_days = self
            .calendar
            .working_days(month)
            .await
            .map_err(|source| ReportError::CalendarFetch { month, source })?;
        Ok((users, working_days))
    }

    async fn fetch_row(
        &self,
        user: &UserRef,
        month: MonthKey,
        working_days: Option<u32>,
        days_in_month: u32,
    ) -> SummaryRow {
        match self.with_deadline(self.fetch_summary_inputs(user.id, month)).await {
            Ok((check_ins, check_outs, approved_leaves)) => SummaryRow::Ready {
                user: user.clone(),
                summary: summarize_month(
                    working_days,
                    days_in_month,
                    &check_ins,
                    &check_outs,
                    approved_leaves,
                ),
            },
            Err(error) => {
                warn!(user_id = user.id, %month, %error, "summary row failed");
                SummaryRow::Failed {
                    user: user.clone(),
                    error,
                }
            }
        }
    }

    async fn fetch_grid_row(&self, user: &UserRef, month: MonthKey) -> DailyGridRow {
        match self.with_deadline(self.fetch_event_lists(user.id, month)).await {
            Ok((check_ins, check_outs)) => DailyGridRow::Ready {
                user: user.clone(),
                days: build_daily_grid(month, &check_ins, &check_outs),
            },
            Err(error) => {
                warn!(user_id = user.id, %month, %error, "daily grid row failed");
                DailyGridRow::Failed {
                    user: user.clone(),
                    error,
                }
            }
        }
    }

    async fn with_deadline<T>(
        &self,
        fetch: impl std::future::Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, String> {
        match actix_web::rt::time::timeout(self.options.fetch_timeout, fetch).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "fetch timed out after {}s",
                self.options.fetch_timeout.as_secs()
            )),
        }
    }

    async fn fetch_summary_inputs(
        &self,
        user_id: u64,
        month: MonthKey,
    ) -> Result<(Vec<AttendanceEvent>, Vec<AttendanceEvent>, u32), ProviderError> {
        let (check_ins, check_outs) = self.fetch_event_lists(user_id, month).await?;
        let approved_leaves = self.leaves.approved_leave_days(user_id, month).await?;
        Ok((check_ins, check_outs, approved_leaves))
    }

    async fn fetch_event_lists(
        &self,
        user_id: u64,
        month: MonthKey,
    ) -> Result<(Vec<AttendanceEvent>, Vec<AttendanceEvent>), ProviderError> {
        let check_ins = self.events.check_ins(user_id, month).await?;
        let check_outs = self.events.check_outs(user_id, month).await?;
        Ok((check_ins, check_outs))
    }
}
