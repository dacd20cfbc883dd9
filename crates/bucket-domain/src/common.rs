//! Month keys and shared enums for the monthly bucket cycle.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifies a budgeting month. Displays as `MM/YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self(date - chrono::Duration::days(i64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn next(&self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(Self)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month(), self.year())
    }
}

impl FromStr for MonthKey {
    type Err = DomainError;

    /// Accepts `YYYY-MM` and `MM/YYYY`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidMonth(value.to_string());
        let trimmed = value.trim();
        let (year, month) = if let Some((year, month)) = trimmed.split_once('-') {
            (year, month)
        } else if let Some((month, year)) = trimmed.split_once('/') {
            (year, month)
        } else {
            return Err(invalid());
        };
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        format!("{:04}-{:02}", value.year(), value.month())
    }
}

/// Identifies the boundary between two consecutive months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransitionKey {
    pub from: MonthKey,
    pub to: MonthKey,
}

impl TransitionKey {
    pub fn new(from: MonthKey, to: MonthKey) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for TransitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// What happens to slush still unspent once every bucket is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlushPolicy {
    /// Recorded on the month as leftover and not moved anywhere.
    #[default]
    Unassigned,
    /// Added to the following month's slush pool.
    CarryForward,
}

impl fmt::Display for SlushPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SlushPolicy::Unassigned => "unassigned",
            SlushPolicy::CarryForward => "carry_forward",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_month_formats() {
        let iso: MonthKey = "2024-03".parse().expect("iso month");
        let slash: MonthKey = "03/2024".parse().expect("slash month");
        assert_eq!(iso, slash);
        assert_eq!(iso.to_string(), "03/2024");
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("March".parse::<MonthKey>().is_err());
    }

    #[test]
    fn next_rolls_over_year() {
        let december = MonthKey::new(2023, 12).unwrap();
        assert_eq!(december.next(), MonthKey::new(2024, 1));
    }

    #[test]
    fn containing_normalizes_to_first_day() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(MonthKey::containing(date), MonthKey::new(2024, 2).unwrap());
    }

    #[test]
    fn month_key_serializes_as_iso_string() {
        let key = MonthKey::new(2024, 9).unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-09\"");
    }
}
