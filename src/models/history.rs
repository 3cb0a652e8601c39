//! Defines the rollup row types and the bucket keys that address them.
//!
//! Rollup rows are a cached, incrementally maintained view of the ledger: the
//! day table sums every transaction on one UTC calendar day and the month
//! table sums a whole calendar month. Rows come into existence lazily when the
//! first transaction lands in their bucket and converge back to zero as
//! transactions are removed; zero-valued rows are never pruned.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::models::OwnerId;

/// The `(year, month[, day])` part of a rollup bucket key.
///
/// Months are 0-based (March = 2), matching the rollup tables and the history
/// projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketKey {
    /// The calendar year.
    pub year: i32,
    /// The 0-based calendar month.
    pub month: u8,
    /// The day of the month, or `None` for a month-granularity bucket.
    pub day: Option<u8>,
}

impl BucketKey {
    /// The day bucket a transaction dated `date` falls into.
    pub fn day_of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month() as u8 - 1,
            day: Some(date.day()),
        }
    }

    /// The month bucket a transaction dated `date` falls into.
    pub fn month_of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month() as u8 - 1,
            day: None,
        }
    }
}

impl Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.day {
            Some(day) => write!(f, "{}/{}/{}", self.year, self.month, day),
            None => write!(f, "{}/{}", self.year, self.month),
        }
    }
}

/// The running totals for all of one owner's transactions on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayHistory {
    /// The owner the totals belong to.
    pub owner: OwnerId,
    /// The calendar year.
    pub year: i32,
    /// The 0-based calendar month.
    pub month: u8,
    /// The day of the month.
    pub day: u8,
    /// The sum of income transaction amounts in this bucket.
    pub income: f64,
    /// The sum of expense transaction amounts in this bucket.
    pub expense: f64,
}

/// The running totals for all of one owner's transactions in one calendar
/// month.
///
/// Maintained by mirrored increments alongside [DayHistory]: for every
/// `(owner, year, month)` this row's totals equal the sum of the matching day
/// rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthHistory {
    /// The owner the totals belong to.
    pub owner: OwnerId,
    /// The calendar year.
    pub year: i32,
    /// The 0-based calendar month.
    pub month: u8,
    /// The sum of income transaction amounts in this bucket.
    pub income: f64,
    /// The sum of expense transaction amounts in this bucket.
    pub expense: f64,
}
