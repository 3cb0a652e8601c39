//! Implements a struct that bundles the application's stores.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

/// The stores an embedding application works through.
///
/// Generic over the store traits so tests and alternative backends can swap
/// implementations; [SQLAppState](crate::stores::sqlite::SQLAppState) is the
/// SQLite-backed instantiation.
#[derive(Debug, Clone)]
pub struct AppState<C, L, R, S> {
    /// The shared database connection.
    pub db_connection: Arc<Mutex<Connection>>,

    /// Creates and lists transaction categories.
    pub category_store: C,

    /// Mutates the transaction ledger and its rollup tables.
    pub ledger_store: L,

    /// Read-only projections for dashboards.
    pub report_store: R,

    /// Per-owner presentation settings.
    pub settings_store: S,
}

impl<C, L, R, S> AppState<C, L, R, S> {
    /// Create a new [AppState] from the shared connection and stores.
    pub fn new(
        db_connection: Arc<Mutex<Connection>>,
        category_store: C,
        ledger_store: L,
        report_store: R,
        settings_store: S,
    ) -> Self {
        Self {
            db_connection,
            category_store,
            ledger_store,
            report_store,
            settings_store,
        }
    }
}
