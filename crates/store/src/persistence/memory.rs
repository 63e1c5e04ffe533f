//! In-process adapter backed by a shared map.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{PersistenceAdapter, PersistenceError};

/// In-memory key-value store.
///
/// Clones share the same map, so a second store opened on a clone sees what
/// the first one persisted - the in-process equivalent of reloading a page.
///
/// Failure injection ([`fail_reads`](Self::fail_reads),
/// [`fail_writes`](Self::fail_writes), [`with_quota`](Self::with_quota)) lets
/// tests exercise the best-effort persistence paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryAdapter {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    quota: Option<usize>,
}

impl MemoryAdapter {
    /// Create an empty adapter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty adapter that refuses writes once the total stored
    /// bytes (keys plus values) would exceed `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::default()
        }
    }

    /// Make every subsequent `get` fail (shared across clones).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `set`/`remove` fail (shared across clones).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored keys. A poisoned map counts as empty.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |entries| entries.len())
    }

    /// Whether no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, PersistenceError> {
        self.entries
            .lock()
            .map_err(|_| PersistenceError::Unavailable("memory store lock poisoned".to_owned()))
    }

    fn check_writable(&self) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable(
                "writes disabled".to_owned(),
            ));
        }
        Ok(())
    }
}

impl PersistenceAdapter for MemoryAdapter {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("reads disabled".to_owned()));
        }
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.check_writable()?;
        let mut entries = self.lock()?;

        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if others + key.len() + value.len() > quota {
                return Err(PersistenceError::QuotaExceeded {
                    key: key.to_owned(),
                });
            }
        }

        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.check_writable()?;
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let adapter = MemoryAdapter::new();
        assert_eq!(adapter.get("a").unwrap(), None);

        adapter.set("a", "1").unwrap();
        assert_eq!(adapter.get("a").unwrap().as_deref(), Some("1"));

        adapter.set("a", "2").unwrap();
        assert_eq!(adapter.get("a").unwrap().as_deref(), Some("2"));

        adapter.remove("a").unwrap();
        assert_eq!(adapter.get("a").unwrap(), None);
        assert!(adapter.is_empty());
    }

    #[test]
    fn test_remove_absent_is_ok() {
        let adapter = MemoryAdapter::new();
        assert!(adapter.remove("nothing").is_ok());
    }

    #[test]
    fn test_clones_share_entries() {
        let a = MemoryAdapter::new();
        let b = a.clone();
        a.set("k", "v").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_fail_writes() {
        let adapter = MemoryAdapter::new();
        adapter.fail_writes(true);
        assert!(matches!(
            adapter.set("k", "v"),
            Err(PersistenceError::Unavailable(_))
        ));
        assert!(adapter.remove("k").is_err());

        adapter.fail_writes(false);
        assert!(adapter.set("k", "v").is_ok());
    }

    #[test]
    fn test_fail_reads() {
        let adapter = MemoryAdapter::new();
        adapter.set("k", "v").unwrap();
        adapter.fail_reads(true);
        assert!(adapter.get("k").is_err());
    }

    #[test]
    fn test_quota() {
        let adapter = MemoryAdapter::with_quota(10);
        adapter.set("k", "123456789").unwrap();
        // Replacing a value only counts the new size.
        adapter.set("k", "987654321").unwrap();
        assert!(matches!(
            adapter.set("k2", "x"),
            Err(PersistenceError::QuotaExceeded { .. })
        ));
        assert_eq!(adapter.get("k").unwrap().as_deref(), Some("987654321"));
    }
}
