//! Defines the ledger store trait: the operations that mutate the transaction
//! log and its rollup tables together.

use crate::{
    Error,
    models::{CategoryName, DatabaseID, NewTransaction, OwnerId, Transaction, TransactionType},
};

/// Handles the mutations that must keep the ledger and the day/month rollup
/// tables consistent with each other.
///
/// Every method is one atomic unit: either the ledger change and all of its
/// rollup updates become visible together, or none of them do. After any
/// successful call, for each owner the rollup totals equal the sums over the
/// currently existing transactions, and each month row equals the sum of its
/// day rows.
pub trait LedgerStore {
    /// Record a new transaction and fold its amount into the day and month
    /// buckets for its date.
    ///
    /// The referenced category's icon is snapshotted onto the transaction.
    /// Buckets that do not exist yet are created seeded with the amount;
    /// existing buckets are incremented in place.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::CategoryNotFound] if the owner has no category with the
    ///   given name,
    /// - [Error::InvalidAmount] if the amount is not a valid monetary value,
    /// - [Error::SqlError] if the atomic unit could not be committed.
    async fn record_transaction(
        &mut self,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, Error>;

    /// Delete a transaction and subtract its amount from the day and month
    /// buckets derived from its stored date.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::NotFound] if no transaction with `id` exists for `owner`,
    /// - [Error::AggregateMissing] if a rollup row that should exist does
    ///   not; the deletion is rolled back and the ledger is left untouched,
    /// - [Error::SqlError] if the atomic unit could not be committed.
    async fn remove_transaction(&mut self, owner: &OwnerId, id: DatabaseID) -> Result<(), Error>;

    /// Delete a category together with every transaction filed under it,
    /// reversing each transaction's rollup contributions.
    ///
    /// The whole cascade runs as one atomic unit, so an interrupted delete
    /// never leaves the rollups partially decremented while the transactions
    /// still exist.
    ///
    /// Returns the number of transactions that were removed.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::CategoryNotFound] if `(name, owner, kind)` does not resolve
    ///   to a category,
    /// - [Error::AggregateMissing] if a rollup row that should exist does
    ///   not; nothing is deleted in that case,
    /// - [Error::SqlError] if the atomic unit could not be committed.
    async fn remove_category(
        &mut self,
        owner: &OwnerId,
        name: &CategoryName,
        kind: TransactionType,
    ) -> Result<usize, Error>;
}
