//! Defines the report store trait and its projection types.
//!
//! Reports are the sole data surface exposed to presentation layers: plain
//! values only, no storage internals beyond the transaction's own ID. Nothing
//! in this module mutates state.

use serde::Serialize;
use time::Date;

use crate::{
    Error,
    models::{CategoryName, OwnerId, Transaction, TransactionType},
};

/// Which granularity a history query should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    /// One entry per calendar day of a single month.
    Month,
    /// One entry per month of a single year.
    Year,
}

/// The year (and 0-based month) a history query is scoped to.
///
/// The month is ignored for [Timeframe::Year] queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    /// The calendar year.
    pub year: i32,
    /// The 0-based calendar month.
    pub month: u8,
}

/// One slot of a history series.
///
/// Series are dense: every day or month slot in the requested period is
/// present, zero-valued when no transactions landed in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// The calendar year.
    pub year: i32,
    /// The 0-based calendar month.
    pub month: u8,
    /// The day of the month; `None` for year-granularity series.
    pub day: Option<u8>,
    /// Total income in this slot.
    pub income: f64,
    /// Total expenses in this slot.
    pub expense: f64,
}

/// Income and expense totals over a date range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalanceStats {
    /// The sum of income transaction amounts, 0 if there were none.
    pub income: f64,
    /// The sum of expense transaction amounts, 0 if there were none.
    pub expense: f64,
}

/// The summed amount for one `(type, category, icon)` group.
///
/// Percentage shares are computed by the caller: a group's share is its amount
/// divided by the total of its type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    /// Whether the group is income or expenses.
    pub kind: TransactionType,
    /// The category's name.
    pub category: CategoryName,
    /// The icon recorded on the grouped transactions.
    pub category_icon: String,
    /// The sum of the group's transaction amounts.
    pub amount: f64,
}

/// A ledger row annotated with its display string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    /// The underlying transaction.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The amount rendered in the owner's configured currency, e.g.
    /// "$1,234.50".
    pub formatted_amount: String,
}

/// Read-only projections over the ledger and the rollup tables.
///
/// All date ranges are inclusive on both ends and filter on the transaction's
/// logical `date` field.
pub trait ReportStore {
    /// Sum transaction amounts grouped by type within `[from, to]`.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if there is an SQL error.
    async fn balance_stats(
        &self,
        owner: &OwnerId,
        from: Date,
        to: Date,
    ) -> Result<BalanceStats, Error>;

    /// Sum transaction amounts grouped by `(type, category, icon)` within
    /// `[from, to]`, ordered by summed amount descending.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if there is an SQL error.
    async fn category_stats(
        &self,
        owner: &OwnerId,
        from: Date,
        to: Date,
    ) -> Result<Vec<CategorySummary>, Error>;

    /// The distinct years the owner has day rollup rows for, ascending.
    ///
    /// Returns the current UTC calendar year as the only element when the
    /// owner has no rollup rows at all, so period selectors always have at
    /// least one choice.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if there is an SQL error.
    async fn history_periods(&self, owner: &OwnerId) -> Result<Vec<i32>, Error>;

    /// The owner's income/expense series for one year or one month.
    ///
    /// For [Timeframe::Year] the series has exactly 12 entries (months 0-11);
    /// for [Timeframe::Month] it has one entry per calendar day of the
    /// period's month, using that month's true day count (leap years
    /// included). Slots without a rollup row are zero-filled.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if there is an SQL error.
    async fn history_data(
        &self,
        owner: &OwnerId,
        timeframe: Timeframe,
        period: Period,
    ) -> Result<Vec<HistoryEntry>, Error>;

    /// The owner's transactions within `[from, to]`, date descending, each
    /// annotated with an amount string in the owner's configured currency.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if there is an SQL error.
    async fn transaction_history(
        &self,
        owner: &OwnerId,
        from: Date,
        to: Date,
    ) -> Result<Vec<TransactionRecord>, Error>;
}
