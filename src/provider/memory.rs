//! In-memory provider implementations for tests and embedding.
//!
//! Backed by std locks; no lock is held across an await point. The event
//! store preserves insertion order, which the daily-grid tie-break tests
//! rely on.

use crate::model::event::{AttendanceEvent, EventKind};
use crate::model::user::{RosterFilter, UserRef};
use crate::model::working_days::WorkingDaysEntry;
use crate::provider::{
    CalendarProvider, EventStoreProvider, LeaveLedgerProvider, ProviderError, RosterProvider,
};
use crate::report::month::MonthKey;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

#[derive(Default)]
pub struct InMemoryCalendarProvider {
    entries: RwLock<BTreeMap<MonthKey, u32>>,
}

#[async_trait]
impl CalendarProvider for InMemoryCalendarProvider {
    async fn working_days(&self, month: MonthKey) -> Result<Option<u32>, ProviderError> {
        Ok(self.entries.read().unwrap().get(&month).copied())
    }

    async fn year_entries(&self, year: i32) -> Result<Vec<WorkingDaysEntry>, ProviderError> {
        Ok(self
            .entries
            .read()
            .unwrap()
            .iter()
            .filter(|(month, _)| month.year() == year)
            .map(|(&month, &working_days)| WorkingDaysEntry {
                month,
                working_days,
            })
            .collect())
    }

    async fn set_working_days(&self, month: MonthKey, days: u32) -> Result<(), ProviderError> {
        self.entries.write().unwrap().insert(month, days);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryLeaveLedgerProvider {
    counts: RwLock<HashMap<(u64, MonthKey), u32>>,
    pending: RwLock<u64>,
}

impl InMemoryLeaveLedgerProvider {
    pub fn set_leaves(&self, user_id: u64, month: MonthKey, days: u32) {
        self.counts.write().unwrap().insert((user_id, month), days);
    }

    pub fn set_pending(&self, count: u64) {
        *self.pending.write().unwrap() = count;
    }
}

#[async_trait]
impl LeaveLedgerProvider for InMemoryLeaveLedgerProvider {
    async fn approved_leave_days(
        &self,
        user_id: u64,
        month: MonthKey,
    ) -> Result<u32, ProviderError> {
        Ok(self
            .counts
            .read()
            .unwrap()
            .get(&(user_id, month))
            .copied()
            .unwrap_or(0))
    }

    async fn pending_count(&self) -> Result<u64, ProviderError> {
        Ok(*self.pending.read().unwrap())
    }
}

#[derive(Default)]
pub struct InMemoryEventStoreProvider {
    events: RwLock<Vec<AttendanceEvent>>,
    failing_users: RwLock<HashSet<u64>>,
}

impl InMemoryEventStoreProvider {
    /// Makes every fetch for `user_id` fail, to exercise per-row failure
    /// handling in tests.
    pub fn fail_user(&self, user_id: u64) {
        self.failing_users.write().unwrap().insert(user_id);
    }

    fn events_of_kind(
        &self,
        user_id: u64,
        month: MonthKey,
        kind: EventKind,
    ) -> Result<Vec<AttendanceEvent>, ProviderError> {
        if self.failing_users.read().unwrap().contains(&user_id) {
            return Err(ProviderError::Unavailable {
                message: format!("event store unavailable for user {user_id}"),
            });
        }
        Ok(self
            .events
            .read()
            .unwrap()
            .iter()
            .filter(|event| {
                event.user_id == user_id && event.kind == kind && month.contains(event.time)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EventStoreProvider for InMemoryEventStoreProvider {
    async fn check_ins(
        &self,
        user_id: u64,
        month: MonthKey,
    ) -> Result<Vec<AttendanceEvent>, ProviderError> {
        self.events_of_kind(user_id, month, EventKind::CheckIn)
    }

    async fn check_outs(
        &self,
        user_id: u64,
        month: MonthKey,
    ) -> Result<Vec<AttendanceEvent>, ProviderError> {
        self.events_of_kind(user_id, month, EventKind::CheckOut)
    }

    async fn record(&self, event: &AttendanceEvent) -> Result<(), ProviderError> {
        self.events.write().unwrap().push(event.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRosterProvider {
    members: RwLock<Vec<(UserRef, Option<String>)>>,
}

impl InMemoryRosterProvider {
    /// Adds a roster member; insertion order is the roster order.
    pub fn add_user(&self, user: UserRef, group: Option<&str>) {
        self.members
            .write()
            .unwrap()
            .push((user, group.map(str::to_string)));
    }
}

#[async_trait]
impl RosterProvider for InMemoryRosterProvider {
    async fn roster(&self, filter: &RosterFilter) -> Result<Vec<UserRef>, ProviderError> {
        Ok(self
            .members
            .read()
            .unwrap()
            .iter()
            .filter(|(user, group)| {
                filter.role.as_deref().is_none_or(|r| user.role == r)
                    && filter
                        .zone
                        .as_deref()
                        .is_none_or(|z| user.zone.as_deref() == Some(z))
                    && filter
                        .group
                        .as_deref()
                        .is_none_or(|g| group.as_deref() == Some(g))
            })
            .map(|(user, _)| user.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::EventStatus;
    use chrono::NaiveDate;

    fn user(id: u64, role: &str, zone: &str) -> UserRef {
        UserRef {
            id,
            name: format!("User {id}"),
            phone: None,
            role: role.to_string(),
            zone: Some(zone.to_string()),
            outlet: None,
        }
    }

    #[actix_web::test]
    async fn roster_filters_on_all_three_dimensions() {
        let roster = InMemoryRosterProvider::default();
        roster.add_user(user(1, "WH", "RL"), Some("WH"));
        roster.add_user(user(2, "WH", "Damage"), Some("WH"));
        roster.add_user(user(3, "Admin", "RL"), Some("HQ"));

        let filter = RosterFilter {
            role: Some("WH".to_string()),
            group: Some("WH".to_string()),
            zone: Some("RL".to_string()),
        };
        let matches = roster.roster(&filter).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, 1);

        let unfiltered = roster.roster(&RosterFilter::default()).await.unwrap();
        assert_eq!(unfiltered.len(), 3);
    }

    #[actix_web::test]
    async fn event_store_scopes_by_user_kind_and_month() {
        let store = InMemoryEventStoreProvider::default();
        let month: MonthKey = "2025-02".parse().unwrap();
        let event = AttendanceEvent {
            user_id: 1,
            time: NaiveDate::from_ymd_opt(2025, 2, 3)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            kind: EventKind::CheckIn,
            status: EventStatus::OnTime,
        };
        store.record(&event).await.unwrap();

        assert_eq!(store.check_ins(1, month).await.unwrap(), vec![event]);
        assert!(store.check_outs(1, month).await.unwrap().is_empty());
        assert!(store.check_ins(2, month).await.unwrap().is_empty());
        assert!(
            store
                .check_ins(1, "2025-03".parse().unwrap())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[actix_web::test]
    async fn poisoned_user_fetch_fails() {
        let store = InMemoryEventStoreProvider::default();
        store.fail_user(7);
        let month: MonthKey = "2025-02".parse().unwrap();
        assert!(store.check_ins(7, month).await.is_err());
        assert!(store.check_ins(8, month).await.is_ok());
    }
}
