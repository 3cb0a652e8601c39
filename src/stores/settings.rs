//! Defines the store trait for per-owner settings.

use crate::{
    Error,
    models::{OwnerId, UserSettings},
};

/// The currency an owner's settings start with.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Stores per-owner presentation settings.
pub trait SettingsStore {
    /// Get the owner's settings, creating them with defaults on first read.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if there is an SQL error.
    async fn get_or_create(&mut self, owner: &OwnerId) -> Result<UserSettings, Error>;

    /// Change the currency the owner's amounts are displayed in.
    ///
    /// # Errors
    /// Returns [Error::UnknownCurrency] if `currency` is not a supported
    /// currency code, or [Error::SqlError] if there is an SQL error.
    async fn update_currency(
        &mut self,
        owner: &OwnerId,
        currency: &str,
    ) -> Result<UserSettings, Error>;
}
