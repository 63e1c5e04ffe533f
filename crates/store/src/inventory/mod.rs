//! Inventory store.
//!
//! Owns the ordered list of [`ProductRecord`]s, validates every mutation,
//! and writes the full list through a [`PersistenceAdapter`] after each
//! successful change.
//!
//! # Persistence
//!
//! Writes are best-effort: a failed write is logged at `warn`, recorded for
//! [`InventoryStore::last_persistence_error`], and otherwise ignored. The
//! in-memory list stays authoritative for the life of the store.
//!
//! # Identity
//!
//! Records are addressed either by position (as shown to a user) or by their
//! stable [`ProductId`]. Positions shift after a removal; IDs do not.

mod error;
mod record;

pub use error::{ProductError, ValidationError};
pub use record::ProductRecord;

use rust_decimal::Decimal;
use serde_json::Value;

use stockbook_core::{CurrencyCode, Price, ProductId, round_to_cents};

use crate::keys;
use crate::persistence::{PersistenceAdapter, PersistenceError, read_or_none};

/// Validate raw input without touching any store.
///
/// # Errors
///
/// See [`ProductRecord::validate`].
pub fn validate(name: &str, price: &str, stock: &str) -> Result<ProductRecord, ValidationError> {
    ProductRecord::validate(name, price, stock)
}

/// Per-record total within [`InventoryTotals`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTotal {
    /// Record the total belongs to.
    pub id: ProductId,
    /// `unit_price * stock`.
    pub line_total: Decimal,
}

/// Derived aggregate over the whole inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryTotals {
    /// One entry per record, in store order.
    pub lines: Vec<LineTotal>,
    /// Sum of every line total; zero for an empty inventory.
    pub grand_total: Decimal,
}

/// Persisted, validated product collection.
#[derive(Debug)]
pub struct InventoryStore<A> {
    adapter: A,
    records: Vec<ProductRecord>,
    currency: CurrencyCode,
    last_persistence_error: Option<PersistenceError>,
}

impl<A: PersistenceAdapter> InventoryStore<A> {
    /// Create an empty store over `adapter` without reading it.
    #[must_use]
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            records: Vec::new(),
            currency: CurrencyCode::default(),
            last_persistence_error: None,
        }
    }

    /// Create a store and [`load`](Self::load) the persisted collection.
    #[must_use]
    pub fn open(adapter: A) -> Self {
        let mut store = Self::new(adapter);
        store.load();
        store
    }

    /// Use `currency` when formatting amounts.
    #[must_use]
    pub const fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// An absent, unreadable or malformed blob leaves the store empty. Within
    /// a well-formed array, entries that cannot be salvaged are dropped
    /// individually. Returns the number of records loaded.
    pub fn load(&mut self) -> usize {
        self.records.clear();

        let Some(raw) = read_or_none(&self.adapter, keys::PRODUCTS) else {
            return 0;
        };

        let entries = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                tracing::debug!("Product blob is not an array, starting empty");
                return 0;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Product blob is not valid JSON, starting empty");
                return 0;
            }
        };

        let total = entries.len();
        self.records = entries.iter().filter_map(ProductRecord::from_json).collect();

        let dropped = total - self.records.len();
        if dropped > 0 {
            tracing::debug!(
                dropped,
                kept = self.records.len(),
                "Dropped malformed product entries"
            );
        }
        self.records.len()
    }

    /// Append a validated record and persist.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Validation` if the input is rejected; the store
    /// is unchanged.
    pub fn add(
        &mut self,
        name: &str,
        price: &str,
        stock: &str,
    ) -> Result<&ProductRecord, ProductError> {
        let record = validate(name, price, stock)?;
        let index = self.records.len();
        self.insert(record);
        self.record_at(index)
    }

    /// Append an already-built record and persist. Returns its ID.
    pub fn insert(&mut self, record: ProductRecord) -> ProductId {
        let id = record.id();
        self.records.push(record);
        self.persist_best_effort();
        id
    }

    /// Replace the record at `index` in place, keeping its position and ID.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::IndexOutOfRange` or `ProductError::Validation`;
    /// the store is unchanged in both cases.
    pub fn update(
        &mut self,
        index: usize,
        name: &str,
        price: &str,
        stock: &str,
    ) -> Result<&ProductRecord, ProductError> {
        self.check_index(index)?;
        let replacement = validate(name, price, stock)?;
        self.apply_at(index, replacement)
    }

    /// Replace the record with `id` in place.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` or `ProductError::Validation`.
    pub fn update_by_id(
        &mut self,
        id: ProductId,
        name: &str,
        price: &str,
        stock: &str,
    ) -> Result<&ProductRecord, ProductError> {
        let index = self.position_of(id).ok_or(ProductError::NotFound(id))?;
        let replacement = validate(name, price, stock)?;
        self.apply_at(index, replacement)
    }

    /// Remove and return the record at `index`. Later positions shift down by one.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::IndexOutOfRange` if there is no such position.
    pub fn remove(&mut self, index: usize) -> Result<ProductRecord, ProductError> {
        self.check_index(index)?;
        let removed = self.records.remove(index);
        self.persist_best_effort();
        Ok(removed)
    }

    /// Remove and return the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if no record carries `id`.
    pub fn remove_by_id(&mut self, id: ProductId) -> Result<ProductRecord, ProductError> {
        let index = self.position_of(id).ok_or(ProductError::NotFound(id))?;
        self.remove(index)
    }

    /// Per-record and grand totals of the current contents.
    ///
    /// A grand total beyond the `Decimal` range saturates at `Decimal::MAX`.
    #[must_use]
    pub fn totals(&self) -> InventoryTotals {
        let lines: Vec<LineTotal> = self
            .records
            .iter()
            .map(|r| LineTotal {
                id: r.id(),
                line_total: r.line_total(),
            })
            .collect();
        let grand_total = lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.line_total))
            .unwrap_or_else(|| {
                tracing::warn!(records = lines.len(), "Grand total overflows, saturating");
                Decimal::MAX
            });
        let grand_total = round_to_cents(grand_total);

        InventoryTotals { lines, grand_total }
    }

    /// Write the full list to the adapter.
    ///
    /// Mutating operations call this themselves and swallow the error; it is
    /// public for callers that want to retry or surface durability problems.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the adapter rejects the write.
    pub fn persist(&self) -> Result<(), PersistenceError> {
        let blob = Value::Array(self.records.iter().map(ProductRecord::to_json).collect());
        self.adapter.set(keys::PRODUCTS, &blob.to_string())
    }

    /// Error from the most recent write, cleared by the next successful one.
    #[must_use]
    pub const fn last_persistence_error(&self) -> Option<&PersistenceError> {
        self.last_persistence_error.as_ref()
    }

    /// Records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ProductRecord> {
        self.records.get(index)
    }

    #[must_use]
    pub fn get_by_id(&self, id: ProductId) -> Option<&ProductRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Current position of the record with `id`.
    #[must_use]
    pub fn position_of(&self, id: ProductId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Currency used by [`format_amount`](Self::format_amount).
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Format an amount in the configured currency, e.g. `S/ 60.00`.
    #[must_use]
    pub fn format_amount(&self, amount: Decimal) -> String {
        Price::new(amount, self.currency).display()
    }

    /// Borrow the underlying adapter.
    #[must_use]
    pub const fn adapter(&self) -> &A {
        &self.adapter
    }

    fn check_index(&self, index: usize) -> Result<(), ProductError> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(ProductError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
        }
    }

    fn record_at(&self, index: usize) -> Result<&ProductRecord, ProductError> {
        self.records.get(index).ok_or(ProductError::IndexOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    fn apply_at(
        &mut self,
        index: usize,
        replacement: ProductRecord,
    ) -> Result<&ProductRecord, ProductError> {
        let len = self.records.len();
        let slot = self
            .records
            .get_mut(index)
            .ok_or(ProductError::IndexOutOfRange { index, len })?;
        slot.apply(replacement);
        self.persist_best_effort();
        self.record_at(index)
    }

    fn persist_best_effort(&mut self) {
        match self.persist() {
            Ok(()) => self.last_persistence_error = None,
            Err(e) => {
                tracing::warn!(key = keys::PRODUCTS, error = %e, "Failed to persist inventory");
                self.last_persistence_error = Some(e);
            }
        }
    }
}
