//! A bounded-admission gate for storage operations.
//!
//! The backing store is shared process-wide and backed by a finite resource
//! pool, so the number of in-flight storage operations is capped. Callers
//! above the cap queue in FIFO order and are admitted one-for-one as permits
//! are released, whether the releasing operation succeeded or failed. The gate
//! knows nothing about ledger semantics: it never reorders or batches work on
//! a caller's behalf.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::Error;

/// The default cap on concurrent storage operations.
pub const DEFAULT_STORAGE_PERMITS: usize = 5;

/// Caps how many storage operations may run concurrently.
///
/// Constructed once at start-up and cloned into every store; clones share the
/// same permit pool.
#[derive(Debug, Clone)]
pub struct StorageGate {
    permits: Arc<Semaphore>,
}

impl StorageGate {
    /// Create a gate that admits up to `limit` concurrent operations.
    pub fn new(limit: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(limit)),
        }
    }

    /// Wait for admission, queuing FIFO behind earlier callers if the gate is
    /// at capacity.
    ///
    /// The returned permit readmits the next queued caller when dropped, so it
    /// must be held for the duration of the storage operation.
    ///
    /// # Errors
    /// Returns [Error::GateClosed] if the semaphore has been closed.
    pub async fn acquire(&self) -> Result<StoragePermit, Error> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| Error::GateClosed)?;

        Ok(StoragePermit { _permit: permit })
    }

    /// The number of operations that could be admitted right now.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

impl Default for StorageGate {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_PERMITS)
    }
}

/// Admission to run one storage operation. Dropping it releases the slot.
#[derive(Debug)]
pub struct StoragePermit {
    _permit: OwnedSemaphorePermit,
}
