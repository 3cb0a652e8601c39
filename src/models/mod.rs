//! Defines the domain models for the ledger and its rollup tables.

mod category;
mod history;
mod settings;
mod transaction;

pub use category::{Category, CategoryName};
pub use history::{BucketKey, DayHistory, MonthHistory};
pub use settings::UserSettings;
pub use transaction::{NewTransaction, Transaction, TransactionType};

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Alias for the integer type used for auto-incremented database IDs.
pub type DatabaseID = i64;

/// The opaque identifier the identity provider assigns to each user.
///
/// Every row in the ledger and the rollup tables is scoped by an owner ID, and
/// no operation may read or mutate rows belonging to another owner. The inner
/// string is guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    /// Create an owner ID from the string supplied by the identity provider.
    ///
    /// # Errors
    /// Returns [Error::EmptyOwnerId] if `id` is an empty string. Requests
    /// without an owner should have been rejected at the authorization
    /// boundary, so this is a defensive check.
    pub fn new(id: &str) -> Result<Self, Error> {
        if id.is_empty() {
            Err(Error::EmptyOwnerId)
        } else {
            Ok(Self(id.to_string()))
        }
    }

    /// Create an owner ID without validation.
    ///
    /// The caller should ensure that the string is not empty. This is intended
    /// for reconstructing IDs that were already validated before being stored.
    pub fn new_unchecked(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod owner_id_tests {
    use crate::Error;

    use super::OwnerId;

    #[test]
    fn new_fails_on_empty_string() {
        let owner = OwnerId::new("");

        assert_eq!(owner, Err(Error::EmptyOwnerId));
    }

    #[test]
    fn new_succeeds_on_non_empty_string() {
        let owner = OwnerId::new("user_2NNEqL2nrIRdJ194ndJqAHwEfxC");

        assert!(owner.is_ok());
    }
}
