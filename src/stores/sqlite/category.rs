//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    gate::StorageGate,
    models::{Category, CategoryName, OwnerId, TransactionType},
    stores::CategoryStore,
};

/// Creates and retrieves transaction categories to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
    gate: StorageGate,
}

impl SQLiteCategoryStore {
    /// Create a new store for the SQLite `connection`, admitted through
    /// `gate`.
    pub fn new(connection: Arc<Mutex<Connection>>, gate: StorageGate) -> Self {
        Self { connection, gate }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    async fn create(
        &mut self,
        owner: &OwnerId,
        name: CategoryName,
        kind: TransactionType,
        icon: &str,
    ) -> Result<Category, Error> {
        let _permit = self.gate.acquire().await?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        let created_at = OffsetDateTime::now_utc();

        connection
            .execute(
                "INSERT INTO category (owner_id, name, kind, icon, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (
                    owner.as_ref(),
                    name.as_ref(),
                    kind.as_str(),
                    icon,
                    created_at,
                ),
            )
            .map_err(|error| match error {
                // Codes 1555 and 2067 occur when a PRIMARY KEY or UNIQUE
                // constraint failed: the owner already filed this name under
                // this type.
                rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                    if (sql_error.extended_code == 1555 || sql_error.extended_code == 2067)
                        && desc.contains("category.") =>
                {
                    Error::DuplicateCategory(name.to_string())
                }
                error => error.into(),
            })?;

        Ok(Category {
            owner: owner.clone(),
            name,
            kind,
            icon: icon.to_string(),
            created_at,
        })
    }

    async fn get(&self, owner: &OwnerId, name: &CategoryName) -> Result<Category, Error> {
        let _permit = self.gate.acquire().await?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        connection
            .prepare(
                "SELECT owner_id, name, kind, icon, created_at FROM category
                 WHERE owner_id = :owner AND name = :name
                 LIMIT 1",
            )?
            .query_row(
                &[(":owner", owner.as_ref()), (":name", name.as_ref())],
                Self::map_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::CategoryNotFound,
                error => error.into(),
            })
    }

    async fn get_all(
        &self,
        owner: &OwnerId,
        kind: Option<TransactionType>,
    ) -> Result<Vec<Category>, Error> {
        let _permit = self.gate.acquire().await?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        match kind {
            Some(kind) => connection
                .prepare(
                    "SELECT owner_id, name, kind, icon, created_at FROM category
                     WHERE owner_id = :owner AND kind = :kind
                     ORDER BY name ASC",
                )?
                .query_map(
                    &[(":owner", owner.as_ref()), (":kind", kind.as_str())],
                    Self::map_row,
                )?
                .map(|maybe_category| maybe_category.map_err(Error::SqlError))
                .collect(),
            None => connection
                .prepare(
                    "SELECT owner_id, name, kind, icon, created_at FROM category
                     WHERE owner_id = :owner
                     ORDER BY name ASC",
                )?
                .query_map(&[(":owner", owner.as_ref())], Self::map_row)?
                .map(|maybe_category| maybe_category.map_err(Error::SqlError))
                .collect(),
        }
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                    owner_id TEXT NOT NULL,
                    name TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    icon TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    PRIMARY KEY (name, owner_id, kind)
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_owner: String = row.get(offset)?;
        let raw_name: String = row.get(offset + 1)?;
        let raw_kind: String = row.get(offset + 2)?;
        let icon = row.get(offset + 3)?;
        let created_at = row.get(offset + 4)?;

        let kind = raw_kind.parse().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                offset + 2,
                rusqlite::types::Type::Text,
                format!("invalid transaction type \"{raw_kind}\"").into(),
            )
        })?;

        Ok(Category {
            owner: OwnerId::new_unchecked(&raw_owner),
            name: CategoryName::new_unchecked(&raw_name),
            kind,
            icon,
            created_at,
        })
    }
}
