//! Defines the transaction type and the builder used to record one.
//!
//! A transaction is immutable after creation: it is inserted by
//! [record_transaction](crate::stores::LedgerStore::record_transaction) and
//! only ever leaves the ledger through
//! [remove_transaction](crate::stores::LedgerStore::remove_transaction) or a
//! cascading category delete.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    models::{CategoryName, DatabaseID, OwnerId},
};

/// Whether a monetary event adds to or subtracts from the owner's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, e.g. wages.
    Income,
    /// Money going out, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The lowercase string stored in the database for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_string())),
        }
    }
}

/// A single monetary event in the ledger.
///
/// The `category` and `category_icon` fields are snapshots taken when the
/// transaction was recorded. If the category's icon changes later, historical
/// transactions keep the icon they were recorded with; this is a deliberate
/// denormalization for historical fidelity, not a live reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The unique ID assigned by the ledger.
    pub id: DatabaseID,
    /// The owner the transaction belongs to.
    pub owner: OwnerId,
    /// The non-negative amount of money that changed hands.
    pub amount: f64,
    /// The UTC calendar date the event happened on. Rollup bucket keys are
    /// derived from this date, never from `created_at`.
    pub date: Date,
    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
    /// A free-form note. May be empty.
    pub description: String,
    /// Whether this is income or an expense.
    pub kind: TransactionType,
    /// The name of the category the transaction was filed under.
    pub category: CategoryName,
    /// The category's icon at the time the transaction was recorded.
    pub category_icon: String,
}

/// The validated inputs for recording a new transaction.
///
/// Construct with [NewTransaction::new], which rejects invalid amounts up
/// front so the storage layer only ever sees well-formed values.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The owner recording the transaction.
    pub owner: OwnerId,
    /// The non-negative amount of money that changed hands.
    pub amount: f64,
    /// The UTC calendar date the event happened on.
    pub date: Date,
    /// A free-form note. May be empty.
    pub description: String,
    /// Whether this is income or an expense.
    pub kind: TransactionType,
    /// The name of an existing category owned by `owner`.
    pub category: CategoryName,
}

impl NewTransaction {
    /// Create the inputs for recording a transaction.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `amount` is negative, NaN or
    /// infinite.
    pub fn new(
        owner: OwnerId,
        amount: f64,
        date: Date,
        description: &str,
        kind: TransactionType,
        category: CategoryName,
    ) -> Result<Self, Error> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount(amount));
        }

        Ok(Self {
            owner,
            amount,
            date,
            description: description.to_string(),
            kind,
            category,
        })
    }
}
