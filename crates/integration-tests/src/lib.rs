//! Integration tests for Stockbook.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stockbook-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `inventory_flow` - Inventory store behaviour across reloads
//! - `credential_flow` - Registration, login, session slot and guards
//! - `file_persistence` - Both stores over the file adapter
//!
//! Tests needing a real directory use [`ScratchDir`], which is removed on drop.

use std::path::{Path, PathBuf};

use stockbook_store::FileAdapter;

/// A unique, initially absent directory under the system temp dir.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    #[must_use]
    pub fn new(label: &str) -> Self {
        let path = std::env::temp_dir().join(format!("stockbook-{label}-{}", uuid::Uuid::new_v4()));
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A fresh adapter over this directory. Adapters over the same directory
    /// see each other's writes.
    #[must_use]
    pub fn adapter(&self) -> FileAdapter {
        FileAdapter::new(&self.path)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
