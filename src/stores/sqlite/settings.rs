//! Implements a SQLite backed settings store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    format::currency_by_code,
    gate::StorageGate,
    models::{OwnerId, UserSettings},
    stores::{DEFAULT_CURRENCY, SettingsStore},
};

/// Stores per-owner presentation settings in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteSettingsStore {
    connection: Arc<Mutex<Connection>>,
    gate: StorageGate,
}

impl SQLiteSettingsStore {
    /// Create a new store for the SQLite `connection`, admitted through
    /// `gate`.
    pub fn new(connection: Arc<Mutex<Connection>>, gate: StorageGate) -> Self {
        Self { connection, gate }
    }
}

impl SettingsStore for SQLiteSettingsStore {
    async fn get_or_create(&mut self, owner: &OwnerId) -> Result<UserSettings, Error> {
        let _permit = self.gate.acquire().await?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        let existing = connection
            .prepare("SELECT owner_id, currency FROM user_settings WHERE owner_id = :owner")?
            .query_row(&[(":owner", owner.as_ref())], Self::map_row);

        match existing {
            Ok(settings) => Ok(settings),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                connection.execute(
                    "INSERT INTO user_settings (owner_id, currency) VALUES (?1, ?2)",
                    (owner.as_ref(), DEFAULT_CURRENCY),
                )?;

                Ok(UserSettings {
                    owner: owner.clone(),
                    currency: DEFAULT_CURRENCY.to_string(),
                })
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn update_currency(
        &mut self,
        owner: &OwnerId,
        currency: &str,
    ) -> Result<UserSettings, Error> {
        let currency = currency_by_code(currency)?;

        let _permit = self.gate.acquire().await?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        connection.execute(
            "INSERT INTO user_settings (owner_id, currency) VALUES (?1, ?2)
             ON CONFLICT(owner_id) DO UPDATE SET currency = excluded.currency",
            (owner.as_ref(), currency.code),
        )?;

        Ok(UserSettings {
            owner: owner.clone(),
            currency: currency.code.to_string(),
        })
    }
}

impl CreateTable for SQLiteSettingsStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user_settings (
                    owner_id TEXT PRIMARY KEY,
                    currency TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteSettingsStore {
    type ReturnType = UserSettings;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_owner: String = row.get(offset)?;
        let currency = row.get(offset + 1)?;

        Ok(UserSettings {
            owner: OwnerId::new_unchecked(&raw_owner),
            currency,
        })
    }
}
