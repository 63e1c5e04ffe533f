//! Key-value persistence adapters.
//!
//! Both stores read and write whole JSON blobs through a [`PersistenceAdapter`].
//! Adapter failures are never fatal to a store: the in-memory collection stays
//! authoritative and the failure is logged and recorded.
//!
//! - [`MemoryAdapter`] - shared in-process map, used by tests and embedders
//! - [`FileAdapter`] - one file per key inside a data directory

mod file;
mod memory;

pub use file::FileAdapter;
pub use memory::MemoryAdapter;

use thiserror::Error;

/// Errors raised by a persistence adapter.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The backing medium cannot be reached (poisoned lock, missing mount, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A write was refused because the medium is full.
    #[error("storage quota exceeded for key {key}")]
    QuotaExceeded {
        /// Key that was being written.
        key: String,
    },

    /// The key cannot be represented by this adapter.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Underlying I/O failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A key-value blob store.
///
/// Implementations must be cheap to call and must not panic; every failure is
/// reported through [`PersistenceError`].
pub trait PersistenceAdapter {
    /// Read the value stored under `key`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Delete `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the medium cannot be updated.
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

impl<T: PersistenceAdapter + ?Sized> PersistenceAdapter for &T {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove(key)
    }
}

impl<T: PersistenceAdapter + ?Sized> PersistenceAdapter for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove(key)
    }
}

/// Read `key` and clear it.
///
/// The value is returned only if it was read; the key is then removed on a
/// best-effort basis (a failed removal is logged, the value still returned).
///
/// # Errors
///
/// Returns `PersistenceError` if the read itself fails.
pub fn pop(adapter: &impl PersistenceAdapter, key: &str) -> Result<Option<String>, PersistenceError> {
    let value = adapter.get(key)?;
    if value.is_some() {
        if let Err(e) = adapter.remove(key) {
            tracing::warn!(key, error = %e, "Failed to clear popped value");
        }
    }
    Ok(value)
}

/// Read `key`, logging and discarding any adapter error.
pub(crate) fn read_or_none(adapter: &impl PersistenceAdapter, key: &str) -> Option<String> {
    match adapter.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "Persistence read failed");
            None
        }
    }
}
