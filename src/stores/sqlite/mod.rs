//! Contains convenience type alias and function for [AppState] that uses the
//! SQLite backend.

pub mod category;
pub mod ledger;
pub mod reports;
pub mod settings;

pub use category::SQLiteCategoryStore;
pub use ledger::SQLiteLedgerStore;
pub use reports::SQLiteReportStore;
pub use settings::SQLiteSettingsStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{AppState, Error, db::initialize, gate::StorageGate};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SQLAppState =
    AppState<SQLiteCategoryStore, SQLiteLedgerStore, SQLiteReportStore, SQLiteSettingsStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models. One [StorageGate] admitting `storage_permits` concurrent operations
/// is shared by all stores.
///
/// # Errors
/// Returns an error if the database schema could not be created.
pub fn create_app_state(
    db_connection: Connection,
    storage_permits: usize,
) -> Result<SQLAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));
    let gate = StorageGate::new(storage_permits);

    Ok(AppState::new(
        connection.clone(),
        SQLiteCategoryStore::new(connection.clone(), gate.clone()),
        SQLiteLedgerStore::new(connection.clone(), gate.clone()),
        SQLiteReportStore::new(connection.clone(), gate.clone()),
        SQLiteSettingsStore::new(connection, gate),
    ))
}
