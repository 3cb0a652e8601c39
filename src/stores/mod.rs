//! Contains traits and implementations for objects that store the domain
//! [models](crate::models).
//!
//! The mutating side ([LedgerStore]) and the read-only side ([ReportStore])
//! share one data model: the ledger of transactions plus the day and month
//! rollup tables derived from it. Keeping the rollups consistent with the
//! ledger across every mutation is the [LedgerStore] implementation's job.

mod category;
mod ledger;
mod reports;
mod settings;

pub mod sqlite;

pub use category::CategoryStore;
pub use ledger::LedgerStore;
pub use reports::{
    BalanceStats, CategorySummary, HistoryEntry, Period, ReportStore, Timeframe, TransactionRecord,
};
pub use settings::{DEFAULT_CURRENCY, SettingsStore};
