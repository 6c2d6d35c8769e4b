use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// A `YYYY-MM` month identifier scoping calendar, leave and event queries.
///
/// Parsed strictly: four-digit year, dash, two-digit month in `01..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display(fmt = "{:04}-{:02}", year, month)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonthKeyError {
    #[error("month must look like YYYY-MM, got '{0}'")]
    Malformed(String),
    #[error("month out of range in '{0}': expected 01..=12")]
    MonthOutOfRange(String),
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthKeyError> {
        if !(1..=12).contains(&month) {
            return Err(MonthKeyError::MonthOutOfRange(format!(
                "{year:04}-{month:02}"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Safe: month is validated on construction.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day() + Days::new(self.days_in_month() as u64 - 1)
    }

    pub fn days_in_month(&self) -> u32 {
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        next.unwrap_or_default()
            .signed_duration_since(self.first_day())
            .num_days() as u32
    }

    /// Iterates the month's calendar days as `(day_of_month, date)` pairs.
    pub fn days(&self) -> impl Iterator<Item = (u32, NaiveDate)> {
        let first = self.first_day();
        (0..self.days_in_month()).map(move |i| (i + 1, first + Days::new(i as u64)))
    }

    /// Half-open `[start, end)` datetime range covering the whole month.
    pub fn datetime_range(&self) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.first_day().and_time(NaiveTime::MIN);
        let end = (self.last_day() + Days::new(1)).and_time(NaiveTime::MIN);
        (start, end)
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        ts.date().year() == self.year && ts.date().month() == self.month
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MonthKeyError::Malformed(s.to_string());
        let (year_part, month_part) = match s.split_once('-') {
            Some(parts) => parts,
            None => return Err(malformed()),
        };
        if year_part.len() != 4 || month_part.len() != 2 {
            return Err(malformed());
        }
        let year: i32 = year_part.parse().map_err(|_| malformed())?;
        let month: u32 = month_part.parse().map_err(|_| malformed())?;
        if !(1..=12).contains(&month) {
            return Err(MonthKeyError::MonthOutOfRange(s.to_string()));
        }
        Ok(Self { year, month })
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
