//! Stockbook Store - persisted inventory and credential stores.
//!
//! Two independent components share one shape: an in-memory collection,
//! a validator that guards every mutation, and a [`PersistenceAdapter`]
//! the collection is written through on a best-effort basis.
//!
//! - [`InventoryStore`] - product records, validation, per-line and grand totals
//! - [`CredentialStore`] - user accounts, the single session slot, view guards
//!
//! Neither store shares state with the other; presentation code composes them.
//!
//! # Example
//!
//! ```
//! use stockbook_store::{InventoryStore, MemoryAdapter};
//!
//! let mut inventory = InventoryStore::open(MemoryAdapter::new());
//! inventory.add("Mouse", "19.999", "3").unwrap();
//!
//! let totals = inventory.totals();
//! assert_eq!(totals.grand_total.to_string(), "60.00");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
mod coerce;
pub mod config;
pub mod inventory;
pub mod keys;
pub mod persistence;

pub use auth::{
    AccountSummary, AuthError, CredentialStore, GuardOptions, GuardPaths, Navigator, Registration,
    Session, UserAccount,
};
pub use config::{ConfigError, StoreConfig};
pub use inventory::{InventoryStore, InventoryTotals, LineTotal, ProductError, ProductRecord};
pub use persistence::{FileAdapter, MemoryAdapter, PersistenceAdapter, PersistenceError};
