//! Defines the category store trait.

use crate::{
    Error,
    models::{Category, CategoryName, OwnerId, TransactionType},
};

/// Creates and retrieves the named, typed tags transactions are filed under.
///
/// Deleting a category is deliberately *not* part of this trait: it cascades
/// onto the ledger and the rollup tables, so it lives on
/// [LedgerStore](crate::stores::LedgerStore) with the other aggregate-touching
/// operations.
pub trait CategoryStore {
    /// Create a new category for `owner`.
    ///
    /// # Errors
    /// Returns [Error::DuplicateCategory] if the owner already has a category
    /// with this name and type, or [Error::SqlError] if there is some other
    /// SQL error.
    async fn create(
        &mut self,
        owner: &OwnerId,
        name: CategoryName,
        kind: TransactionType,
        icon: &str,
    ) -> Result<Category, Error>;

    /// Get the category `owner` filed `name` under, regardless of type.
    ///
    /// # Errors
    /// Returns [Error::CategoryNotFound] if the owner has no such category.
    async fn get(&self, owner: &OwnerId, name: &CategoryName) -> Result<Category, Error>;

    /// List `owner`'s categories, optionally restricted to one transaction
    /// type, ordered by name.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if there is an SQL error.
    async fn get_all(
        &self,
        owner: &OwnerId,
        kind: Option<TransactionType>,
    ) -> Result<Vec<Category>, Error>;
}
