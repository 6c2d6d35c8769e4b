//! MySQL-backed provider implementations.
//!
//! Uses the runtime sqlx API throughout so queries stay free of compile-time
//! database checks. The working-days calendar sits behind an in-process moka
//! cache that is warmed on boot for the current year.

use crate::model::event::{AttendanceEvent, EventKind};
use crate::model::user::{RosterFilter, UserRef};
use crate::model::working_days::WorkingDaysEntry;
use crate::provider::{
    CalendarProvider, EventStoreProvider, LeaveLedgerProvider, ProviderError, RosterProvider,
};
use crate::report::month::MonthKey;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

/// Month -> configured working days. Entries change rarely (an admin edit),
/// so a day-long TTL plus an explicit insert on every write keeps it fresh.
static CALENDAR_CACHE: Lazy<Cache<MonthKey, u32>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(1_024)
        .time_to_live(Duration::from_secs(86400))
        .build()
});

/// Preloads the calendar cache with every configured month of `year`.
pub async fn warmup_calendar_cache(pool: &MySqlPool, year: i32) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String, u32)>(
        r#"
        SELECT month, working_days
        FROM working_days
        WHERE month LIKE ?
        ORDER BY month
        "#,
    )
    .bind(format!("{year:04}-%"))
    .fetch(pool);

    let mut total_count = 0usize;
    while let Some(row) = stream.next().await {
        let (month_raw, days) = row?;
        let month: MonthKey = month_raw.parse()?;
        CALENDAR_CACHE.insert(month, days).await;
        total_count += 1;
    }

    log::info!(
        "Calendar cache warmup complete: {} configured months for {}",
        total_count,
        year
    );

    Ok(())
}

pub struct MySqlCalendarProvider {
    pool: MySqlPool,
}

impl MySqlCalendarProvider {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CalendarProvider for MySqlCalendarProvider {
    async fn working_days(&self, month: MonthKey) -> Result<Option<u32>, ProviderError> {
        if let Some(days) = CALENDAR_CACHE.get(&month).await {
            return Ok(Some(days));
        }

        let days: Option<u32> =
            sqlx::query_scalar("SELECT working_days FROM working_days WHERE month = ?")
                .bind(month.to_string())
                .fetch_optional(&self.pool)
                .await?;

        if let Some(days) = days {
            CALENDAR_CACHE.insert(month, days).await;
        }
        Ok(days)
    }

    async fn year_entries(&self, year: i32) -> Result<Vec<WorkingDaysEntry>, ProviderError> {
        let rows: Vec<(String, u32)> = sqlx::query_as(
            r#"
            SELECT month, working_days
            FROM working_days
            WHERE month LIKE ?
            ORDER BY month
            "#,
        )
        .bind(format!("{year:04}-%"))
        .fetch_all(&self.pool)
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for (month_raw, working_days) in rows {
            match month_raw.parse::<MonthKey>() {
                Ok(month) => entries.push(WorkingDaysEntry {
                    month,
                    working_days,
                }),
                Err(e) => {
                    tracing::warn!(month = %month_raw, error = %e, "skipping unparsable working-days row");
                }
            }
        }
        Ok(entries)
    }

    async fn set_working_days(&self, month: MonthKey, days: u32) -> Result<(), ProviderError> {
        sqlx::query(
            r#"
            INSERT INTO working_days (month, working_days)
            VALUES (?, ?)
            ON DUPLICATE KEY UPDATE working_days = VALUES(working_days)
            "#,
        )
        .bind(month.to_string())
        .bind(days)
        .execute(&self.pool)
        .await?;

        CALENDAR_CACHE.insert(month, days).await;
        Ok(())
    }
}

pub struct MySqlLeaveLedgerProvider {
    pool: MySqlPool,
}

impl MySqlLeaveLedgerProvider {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaveLedgerProvider for MySqlLeaveLedgerProvider {
    async fn approved_leave_days(
        &self,
        user_id: u64,
        month: MonthKey,
    ) -> Result<u32, ProviderError> {
        let start = month.first_day();
        let end = month.last_day();

        // Approved spans clipped to the month: a request running past either
        // month edge only contributes its in-month days.
        let days: i64 = sqlx::query_scalar(
            r#"
            SELECT CAST(COALESCE(SUM(
                DATEDIFF(LEAST(end_date, ?), GREATEST(start_date, ?)) + 1
            ), 0) AS SIGNED)
            FROM leave_requests
            WHERE user_id = ?
              AND status = 'approved'
              AND start_date <= ?
              AND end_date >= ?
            "#,
        )
        .bind(end)
        .bind(start)
        .bind(user_id)
        .bind(end)
        .bind(start)
        .fetch_one(&self.pool)
        .await?;

        Ok(days.max(0) as u32)
    }

    async fn pending_count(&self) -> Result<u64, ProviderError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM leave_requests WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count.max(0) as u64)
    }
}

pub struct MySqlEventStoreProvider {
    pool: MySqlPool,
}

impl MySqlEventStoreProvider {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn events_of_kind(
        &self,
        user_id: u64,
        month: MonthKey,
        kind: EventKind,
    ) -> Result<Vec<AttendanceEvent>, ProviderError> {
        let (start, end) = month.datetime_range();
        let rows: Vec<(NaiveDateTime, String)> = sqlx::query_as(
            r#"
            SELECT time, status
            FROM attendance_events
            WHERE user_id = ? AND kind = ? AND time >= ? AND time < ?
            ORDER BY time ASC
            "#,
        )
        .bind(user_id)
        .bind(kind.to_string())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(time, status)| {
                let status = status.parse().map_err(|_| ProviderError::MalformedEvent {
                    user_id,
                    message: format!("unknown event status '{status}'"),
                })?;
                Ok(AttendanceEvent {
                    user_id,
                    time,
                    kind,
                    status,
                })
            })
            .collect()
    }
}

#[async_trait]
impl EventStoreProvider for MySqlEventStoreProvider {
    async fn check_ins(
        &self,
        user_id: u64,
        month: MonthKey,
    ) -> Result<Vec<AttendanceEvent>, ProviderError> {
        self.events_of_kind(user_id, month, EventKind::CheckIn).await
    }

    async fn check_outs(
        &self,
        user_id: u64,
        month: MonthKey,
    ) -> Result<Vec<AttendanceEvent>, ProviderError> {
        self.events_of_kind(user_id, month, EventKind::CheckOut).await
    }

    async fn record(&self, event: &AttendanceEvent) -> Result<(), ProviderError> {
        sqlx::query(
            r#"
            INSERT INTO attendance_events (user_id, time, kind, status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(event.user_id)
        .bind(event.time)
        .bind(event.kind.to_string())
        .bind(event.status.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

pub struct MySqlRosterProvider {
    pool: MySqlPool,
}

impl MySqlRosterProvider {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RosterProvider for MySqlRosterProvider {
    async fn roster(&self, filter: &RosterFilter) -> Result<Vec<UserRef>, ProviderError> {
        let mut where_sql = String::from(" WHERE 1=1");
        let mut args: Vec<&str> = Vec::new();

        if let Some(role) = filter.role.as_deref() {
            where_sql.push_str(" AND role = ?");
            args.push(role);
        }
        if let Some(group) = filter.group.as_deref() {
            where_sql.push_str(" AND user_group = ?");
            args.push(group);
        }
        if let Some(zone) = filter.zone.as_deref() {
            where_sql.push_str(" AND zone = ?");
            args.push(zone);
        }

        let sql = format!(
            "SELECT id, name, phone, role, zone, outlet FROM users{} ORDER BY id",
            where_sql
        );

        let mut query = sqlx::query_as::<_, UserRef>(&sql);
        for arg in args {
            query = query.bind(arg);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }
}
