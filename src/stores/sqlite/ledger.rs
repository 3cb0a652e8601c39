//! Implements a SQLite backed ledger store.
//!
//! This is where ledger/rollup consistency is enforced: every mutation runs
//! the ledger change and all of its rollup updates inside one SQL transaction,
//! including the category cascade. Rollup rows are created lazily by
//! upsert-with-increment and are decremented (never deleted) when
//! transactions are removed, so a bucket whose transactions are all gone
//! remains as a zero-valued row.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    gate::StorageGate,
    models::{
        BucketKey, CategoryName, DatabaseID, NewTransaction, OwnerId, Transaction, TransactionType,
    },
    stores::LedgerStore,
};

/// Stores transactions in a SQLite database and keeps the day and month
/// rollup tables in lockstep with them.
#[derive(Debug, Clone)]
pub struct SQLiteLedgerStore {
    connection: Arc<Mutex<Connection>>,
    gate: StorageGate,
}

impl SQLiteLedgerStore {
    /// Create a new store for the SQLite `connection`, admitted through
    /// `gate`.
    pub fn new(connection: Arc<Mutex<Connection>>, gate: StorageGate) -> Self {
        Self { connection, gate }
    }
}

/// Fold `amount` into the day and month buckets for `date`, creating either
/// bucket seeded with the amount if it does not exist yet.
///
/// The field that does not match `kind` is incremented by zero, so one
/// statement per table covers both the seed and the increment case.
fn apply_rollups(
    tx: &rusqlite::Transaction,
    owner: &OwnerId,
    date: Date,
    kind: TransactionType,
    amount: f64,
) -> Result<(), rusqlite::Error> {
    let (income, expense) = match kind {
        TransactionType::Income => (amount, 0.0),
        TransactionType::Expense => (0.0, amount),
    };
    let bucket = BucketKey::day_of(date);

    tx.execute(
        "INSERT INTO day_history (owner_id, year, month, day, income, expense)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(owner_id, year, month, day) DO UPDATE SET
             income = income + excluded.income,
             expense = expense + excluded.expense",
        (
            owner.as_ref(),
            bucket.year,
            bucket.month,
            date.day(),
            income,
            expense,
        ),
    )?;

    tx.execute(
        "INSERT INTO month_history (owner_id, year, month, income, expense)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(owner_id, year, month) DO UPDATE SET
             income = income + excluded.income,
             expense = expense + excluded.expense",
        (owner.as_ref(), bucket.year, bucket.month, income, expense),
    )?;

    Ok(())
}

/// Subtract `amount` from the day and month buckets for `date`.
///
/// A decrement that matches no row means the rollups have drifted from the
/// ledger; the error aborts the surrounding SQL transaction so nothing is
/// partially applied.
fn reverse_rollups(
    tx: &rusqlite::Transaction,
    owner: &OwnerId,
    date: Date,
    kind: TransactionType,
    amount: f64,
) -> Result<(), Error> {
    let column = match kind {
        TransactionType::Income => "income",
        TransactionType::Expense => "expense",
    };
    let day_bucket = BucketKey::day_of(date);

    let updated_days = tx.execute(
        &format!(
            "UPDATE day_history SET {column} = {column} - ?1
             WHERE owner_id = ?2 AND year = ?3 AND month = ?4 AND day = ?5"
        ),
        (
            amount,
            owner.as_ref(),
            day_bucket.year,
            day_bucket.month,
            date.day(),
        ),
    )?;
    if updated_days == 0 {
        tracing::error!("rollup drift detected: no day row for bucket {day_bucket}");
        return Err(Error::AggregateMissing(day_bucket));
    }

    let month_bucket = BucketKey::month_of(date);
    let updated_months = tx.execute(
        &format!(
            "UPDATE month_history SET {column} = {column} - ?1
             WHERE owner_id = ?2 AND year = ?3 AND month = ?4"
        ),
        (
            amount,
            owner.as_ref(),
            month_bucket.year,
            month_bucket.month,
        ),
    )?;
    if updated_months == 0 {
        tracing::error!("rollup drift detected: no month row for bucket {month_bucket}");
        return Err(Error::AggregateMissing(month_bucket));
    }

    Ok(())
}

impl LedgerStore for SQLiteLedgerStore {
    async fn record_transaction(
        &mut self,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        // NewTransaction::new already validates, but its fields are public,
        // so reject malformed amounts before any write.
        if !new_transaction.amount.is_finite() || new_transaction.amount < 0.0 {
            return Err(Error::InvalidAmount(new_transaction.amount));
        }

        let _permit = self.gate.acquire().await?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        let category_icon: String = connection
            .prepare("SELECT icon FROM category WHERE owner_id = :owner AND name = :name LIMIT 1")?
            .query_row(
                &[
                    (":owner", new_transaction.owner.as_ref()),
                    (":name", new_transaction.category.as_ref()),
                ],
                |row| row.get(0),
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::CategoryNotFound,
                error => error.into(),
            })?;

        let created_at = OffsetDateTime::now_utc();
        let tx = connection.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO \"transaction\"
                 (owner_id, amount, date, created_at, description, kind, category, category_icon)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            (
                new_transaction.owner.as_ref(),
                new_transaction.amount,
                new_transaction.date,
                created_at,
                &new_transaction.description,
                new_transaction.kind.as_str(),
                new_transaction.category.as_ref(),
                &category_icon,
            ),
        )?;
        let id = tx.last_insert_rowid();

        apply_rollups(
            &tx,
            &new_transaction.owner,
            new_transaction.date,
            new_transaction.kind,
            new_transaction.amount,
        )?;

        tx.commit()?;

        Ok(Transaction {
            id,
            owner: new_transaction.owner,
            amount: new_transaction.amount,
            date: new_transaction.date,
            created_at,
            description: new_transaction.description,
            kind: new_transaction.kind,
            category: new_transaction.category,
            category_icon,
        })
    }

    async fn remove_transaction(&mut self, owner: &OwnerId, id: DatabaseID) -> Result<(), Error> {
        let _permit = self.gate.acquire().await?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        let (amount, date, kind): (f64, Date, TransactionType) = connection
            .prepare(
                "SELECT amount, date, kind FROM \"transaction\"
                 WHERE id = :id AND owner_id = :owner",
            )?
            .query_row(
                rusqlite::named_params! {":id": id, ":owner": owner.as_ref()},
                |row| {
                    let amount = row.get(0)?;
                    let date = row.get(1)?;
                    let kind = parse_kind(row, 2)?;
                    Ok((amount, date, kind))
                },
            )?;

        let tx = connection.unchecked_transaction()?;

        tx.execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND owner_id = ?2",
            (id, owner.as_ref()),
        )?;
        reverse_rollups(&tx, owner, date, kind, amount)?;

        tx.commit()?;

        Ok(())
    }

    async fn remove_category(
        &mut self,
        owner: &OwnerId,
        name: &CategoryName,
        kind: TransactionType,
    ) -> Result<usize, Error> {
        let _permit = self.gate.acquire().await?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        connection
            .prepare(
                "SELECT 1 FROM category
                 WHERE owner_id = :owner AND name = :name AND kind = :kind",
            )?
            .query_row(
                &[
                    (":owner", owner.as_ref()),
                    (":name", name.as_ref()),
                    (":kind", kind.as_str()),
                ],
                |_| Ok(()),
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::CategoryNotFound,
                error => error.into(),
            })?;

        let tx = connection.unchecked_transaction()?;

        let cascade: Vec<(f64, Date)> = {
            let mut statement = tx.prepare(
                "SELECT amount, date FROM \"transaction\"
                 WHERE owner_id = ?1 AND category = ?2 AND kind = ?3",
            )?;
            let rows = statement
                .query_map((owner.as_ref(), name.as_ref(), kind.as_str()), |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        for (amount, date) in &cascade {
            reverse_rollups(&tx, owner, *date, kind, *amount)?;
        }

        let removed = tx.execute(
            "DELETE FROM \"transaction\" WHERE owner_id = ?1 AND category = ?2 AND kind = ?3",
            (owner.as_ref(), name.as_ref(), kind.as_str()),
        )?;
        tx.execute(
            "DELETE FROM category WHERE owner_id = ?1 AND name = ?2 AND kind = ?3",
            (owner.as_ref(), name.as_ref(), kind.as_str()),
        )?;

        tx.commit()?;

        Ok(removed)
    }
}

/// Read the transaction type stored in `column`, surfacing bad data as a
/// column conversion failure.
fn parse_kind(row: &Row, column: usize) -> Result<TransactionType, rusqlite::Error> {
    let raw: String = row.get(column)?;
    raw.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            format!("invalid transaction type \"{raw}\"").into(),
        )
    })
}

impl CreateTable for SQLiteLedgerStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    owner_id TEXT NOT NULL,
                    amount REAL NOT NULL,
                    date TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    description TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    category TEXT NOT NULL,
                    category_icon TEXT NOT NULL
                    )",
            (),
        )?;

        connection.execute(
            "CREATE TABLE IF NOT EXISTS day_history (
                    owner_id TEXT NOT NULL,
                    year INTEGER NOT NULL,
                    month INTEGER NOT NULL,
                    day INTEGER NOT NULL,
                    income REAL NOT NULL,
                    expense REAL NOT NULL,
                    PRIMARY KEY (owner_id, year, month, day)
                    )",
            (),
        )?;

        connection.execute(
            "CREATE TABLE IF NOT EXISTS month_history (
                    owner_id TEXT NOT NULL,
                    year INTEGER NOT NULL,
                    month INTEGER NOT NULL,
                    income REAL NOT NULL,
                    expense REAL NOT NULL,
                    PRIMARY KEY (owner_id, year, month)
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteLedgerStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let raw_owner: String = row.get(offset + 1)?;
        let amount = row.get(offset + 2)?;
        let date = row.get(offset + 3)?;
        let created_at = row.get(offset + 4)?;
        let description = row.get(offset + 5)?;
        let kind = parse_kind(row, offset + 6)?;
        let raw_category: String = row.get(offset + 7)?;
        let category_icon = row.get(offset + 8)?;

        Ok(Transaction {
            id,
            owner: OwnerId::new_unchecked(&raw_owner),
            amount,
            date,
            created_at,
            description,
            kind,
            category: CategoryName::new_unchecked(&raw_category),
            category_icon,
        })
    }
}
