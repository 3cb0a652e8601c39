//! Defines the crate level error type and conversions from SQL errors.

use crate::models::BucketKey;

/// The errors that may occur while maintaining or querying the ledger.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction amount was negative, NaN or infinite.
    ///
    /// Amounts record the magnitude of a monetary event; whether it adds to or
    /// subtracts from the balance is decided by the transaction type, so
    /// negative amounts are rejected.
    #[error("{0} is not a valid transaction amount")]
    InvalidAmount(f64),

    /// An empty string was used as an owner ID.
    ///
    /// Owner IDs come from the identity provider and are opaque but never
    /// empty. An empty ID reaching this crate means the authorization
    /// boundary upstream was bypassed.
    #[error("owner ID cannot be empty")]
    EmptyOwnerId,

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A string other than "income" or "expense" was parsed as a transaction
    /// type.
    #[error("\"{0}\" is not a valid transaction type")]
    InvalidTransactionType(String),

    /// The currency code is not in the supported currency table.
    #[error("\"{0}\" is not a supported currency")]
    UnknownCurrency(String),

    /// A 0-based month index outside 0-11 was used in a history query.
    #[error("{0} is not a valid 0-based month")]
    InvalidMonth(u8),

    /// The category referenced when recording a transaction or deleting a
    /// category does not exist for the requesting owner.
    ///
    /// Distinct from [Error::NotFound] so callers can tell the user which
    /// input to fix.
    #[error("the category could not be found for this owner")]
    CategoryNotFound,

    /// A category with the same name, owner and type already exists.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategory(String),

    /// The requested resource was not found.
    ///
    /// Returned when a transaction ID does not exist or belongs to another
    /// owner. Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A rollup decrement targeted an aggregate row that does not exist.
    ///
    /// Under correct operation every transaction has matching day and month
    /// rollup rows, so a missing decrement target means the rollups have
    /// drifted from the ledger. The whole atomic unit is rolled back when this
    /// is detected; nothing is partially applied.
    #[error("no rollup row exists for bucket {0}")]
    AggregateMissing(BucketKey),

    /// The storage gate was closed while a caller was waiting for admission.
    #[error("the storage gate is closed")]
    GateClosed,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
