// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar month value type.
//!
//! Every monthly record in the book (settings, summaries, savings) is keyed by
//! a `(month, year)` pair, and every dated record is filtered through the
//! half-open window `[first day, first day of next month)`.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{MeiError, MeiResult};

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 9999;

/// A calendar month, internally anchored on its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period(NaiveDate);

impl Period {
    pub fn new(month: u32, year: i32) -> MeiResult<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(MeiError::validation(format!(
                "year {} outside {}..={}",
                year, MIN_YEAR, MAX_YEAR
            )));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Period)
            .ok_or_else(|| MeiError::validation(format!("invalid month number {}", month)))
    }

    pub fn of(date: NaiveDate) -> Self {
        Period(date.with_day(1).unwrap_or(date))
    }

    /// Like [`Period::of`], but refuses dates whose year is outside the
    /// range [`Period::new`] accepts.
    pub fn checked_of(date: NaiveDate) -> MeiResult<Self> {
        Period::new(date.month(), date.year())
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Following month; December wraps to January of the next year.
    pub fn next(&self) -> Self {
        Period(self.0 + Months::new(1))
    }

    pub fn prev(&self) -> Self {
        Period(self.0 - Months::new(1))
    }

    pub fn start(&self) -> NaiveDate {
        self.0
    }

    /// First day of the following month; the window is `[start, end_exclusive)`.
    pub fn end_exclusive(&self) -> NaiveDate {
        self.next().0
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end_exclusive().pred_opt().unwrap_or(self.0)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start() && date < self.end_exclusive()
    }

    /// The given day-of-month inside this period, clamped to the last day.
    pub fn day_clamped(&self, day: u32) -> NaiveDate {
        let last = self.last_day();
        last.with_day(day.clamp(1, last.day())).unwrap_or(last)
    }

    /// `MM/YYYY`, the label used in exports and tables.
    pub fn label(&self) -> String {
        format!("{:02}/{}", self.month(), self.year())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Period {
    type Err = MeiError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let date = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map_err(|_| MeiError::validation(format!("invalid month '{}', expected YYYY-MM", s)))?;
        Period::new(date.month(), date.year())
    }
}

impl TryFrom<String> for Period {
    type Error = MeiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.to_string()
    }
}

/// Advances `date` by `months`, clamping the day to the target month's length.
pub fn add_months(date: NaiveDate, months: u32) -> MeiResult<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| MeiError::validation(format!("{} + {} months is out of range", date, months)))
}
