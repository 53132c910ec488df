use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// `YYYY-MM`, stored as the first day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthYear(NaiveDate);

impl MonthYear {
    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| LedgerError::malformed(format!("invalid month {year}-{month:02}")))
    }

    pub fn of(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
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

    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        self.0.with_day(day)
    }

    pub fn plus_months(&self, months: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(months)).map(Self)
    }

    /// Whole calendar months from `earlier` to `self`, ignoring the day of
    /// month. Negative when `earlier` is later.
    pub fn months_since(&self, earlier: MonthYear) -> i64 {
        let years = i64::from(self.year()) - i64::from(earlier.year());
        years * 12 + i64::from(self.month()) - i64::from(earlier.month())
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthYear {
    type Err = LedgerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| LedgerError::malformed(format!("expected YYYY-MM, got {raw:?}")))?;
        if year.len() != 4 || month.len() != 2 {
            return Err(LedgerError::malformed(format!(
                "expected YYYY-MM, got {raw:?}"
            )));
        }
        let year: i32 = year
            .parse()
            .map_err(|_| LedgerError::malformed(format!("invalid year in {raw:?}")))?;
        let month: u32 = month
            .parse()
            .map_err(|_| LedgerError::malformed(format!("invalid month in {raw:?}")))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for MonthYear {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthYear> for String {
    fn from(value: MonthYear) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_and_formats_year_month() {
        let month: MonthYear = "2024-03".parse().unwrap();
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 3);
        assert_eq!(month.to_string(), "2024-03");
        assert_eq!(month.first_day(), date(2024, 3, 1));
    }

    #[test]
    fn rejects_malformed_months() {
        for raw in ["2024-13", "2024-00", "2024/03", "24-03", "2024-3", ""] {
            assert!(
                matches!(raw.parse::<MonthYear>(), Err(LedgerError::MalformedInput(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn month_arithmetic_crosses_year_boundary() {
        let nov: MonthYear = "2024-11".parse().unwrap();
        assert_eq!(nov.plus_months(3).unwrap().to_string(), "2025-02");
        assert_eq!(
            "2025-02".parse::<MonthYear>().unwrap().months_since(nov),
            3
        );
        assert_eq!(nov.months_since("2025-02".parse().unwrap()), -3);
    }

    #[test]
    fn of_truncates_to_first_day() {
        assert_eq!(MonthYear::of(date(2024, 2, 29)).to_string(), "2024-02");
        assert_eq!(MonthYear::of(date(2024, 2, 29)).day(30), None);
    }

    #[test]
    fn serializes_as_plain_string() {
        let month: MonthYear = "2024-01".parse().unwrap();
        assert_eq!(serde_json::to_string(&month).unwrap(), "\"2024-01\"");
        let back: MonthYear = serde_json::from_str("\"2024-01\"").unwrap();
        assert_eq!(back, month);
        assert!(serde_json::from_str::<MonthYear>("\"2024-1x\"").is_err());
    }
}
