//! Tallybook is the storage core of a personal finance tracker: a transaction
//! ledger with incrementally maintained day and month rollup tables, read-only
//! reporting projections over both, and a bounded admission gate for storage
//! work.
//!
//! Every mutation keeps the ledger and its rollups in lockstep by running them
//! as one atomic unit: recording a transaction also folds it into its day and
//! month buckets, removing one subtracts it back out, and deleting a category
//! reverses every transaction filed under it. The reporting side never
//! recomputes what the rollups already hold.
//!
//! [create_app_state](crate::stores::sqlite::create_app_state) wires up the
//! SQLite backed stores behind a shared connection and [StorageGate].

#![warn(missing_docs)]
#![allow(async_fn_in_trait)]

mod app_state;
mod error;

pub mod db;
pub mod format;
pub mod gate;
pub mod models;
pub mod stores;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use gate::{DEFAULT_STORAGE_PERMITS, StorageGate, StoragePermit};
