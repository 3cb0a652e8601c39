//! Defines the category type and its validated name.
//!
//! A category is a named, typed tag for transactions, unique per
//! `(name, owner, type)`. Deleting one cascades onto every transaction that
//! references it.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    models::{OwnerId, TransactionType},
};

/// The name of a category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    /// Returns [Error::EmptyCategoryName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty. This is intended
    /// for reconstructing names that were already validated before being
    /// stored.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category for income or expenses, e.g. 'Groceries', 'Wages'.
///
/// The same name may exist once as an income category and once as an expense
/// category for the same owner; the natural key is `(name, owner, kind)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The owner the category belongs to.
    pub owner: OwnerId,
    /// The category's display name.
    pub name: CategoryName,
    /// Whether transactions filed under this category are income or expenses.
    pub kind: TransactionType,
    /// An emoji or similar glyph shown next to the name.
    pub icon: String,
    /// When the category was created.
    pub created_at: OffsetDateTime,
}
