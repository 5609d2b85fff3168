//! Calendar month keys.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use splitbook_shared::AppError;
use thiserror::Error;

/// Errors raised while building insight data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsightError {
    /// Month key is not a valid "YYYY-MM".
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
}

impl InsightError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMonth(_) => "INVALID_MONTH",
        }
    }
}

impl From<InsightError> for AppError {
    fn from(err: InsightError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// A calendar month, written "YYYY-MM".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a month key, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self, InsightError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self { year, month })
            .ok_or_else(|| InsightError::InvalidMonth(format!("{year:04}-{month:02}")))
    }

    /// The year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// The month number, 1 to 12.
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Whether `at` falls inside this month (UTC).
    #[must_use]
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        at.year() == self.year && at.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InsightError::InvalidMonth(s.to_string());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
