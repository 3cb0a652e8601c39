//! Defines the per-owner settings row.

use serde::{Deserialize, Serialize};

use crate::models::OwnerId;

/// Per-owner presentation settings.
///
/// Created lazily with defaults the first time an owner's settings are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    /// The owner the settings belong to.
    pub owner: OwnerId,
    /// The code of the currency amounts are displayed in, e.g. "USD".
    ///
    /// Always one of the codes in [crate::format::CURRENCIES]. This only
    /// affects how amounts are rendered; stored amounts are plain numbers and
    /// no conversion is performed.
    pub currency: String,
}
