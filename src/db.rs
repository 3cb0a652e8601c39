//! Defines traits for setting up the database schema and reading rows back
//! into domain models.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    stores::sqlite::{SQLiteCategoryStore, SQLiteLedgerStore, SQLiteSettingsStore},
};

/// A trait for adding a store's schema to a database.
pub trait CreateTable {
    /// Create the tables the store reads and writes.
    ///
    /// Table creation must be idempotent (`CREATE TABLE IF NOT EXISTS`) so
    /// that opening an existing database is a no-op.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// A trait for mapping a `rusqlite::Row` to a concrete Rust type.
pub trait MapRow {
    /// The type a row maps to.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// Expects the row to contain all the table's columns in the order they
    /// were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding Rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type, reading from column `offset`.
    ///
    /// Useful when tables have been joined and two types are constructed from
    /// the one query.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding Rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// Create the tables for the ledger, the rollup tables, categories and
/// settings.
///
/// All tables are created within one exclusive transaction so a half-created
/// schema is never visible.
///
/// # Errors
/// Returns an error if the schema could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = rusqlite::Transaction::new_unchecked(
        connection,
        rusqlite::TransactionBehavior::Exclusive,
    )?;

    SQLiteCategoryStore::create_table(&transaction)?;
    SQLiteLedgerStore::create_table(&transaction)?;
    SQLiteSettingsStore::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
