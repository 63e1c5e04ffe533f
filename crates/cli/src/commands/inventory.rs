//! Inventory commands.
//!
//! # Usage
//!
//! ```bash
//! sb-cli inventory add "Cable HDMI" 12.5 10
//! sb-cli inventory list
//! sb-cli inventory edit --row 1 "Cable HDMI 2m" 14 8
//! sb-cli inventory remove --row 1
//! sb-cli inventory total
//! ```

use std::io::Write;

use stockbook_core::ProductId;
use stockbook_store::{InventoryStore, PersistenceAdapter, ProductRecord};

use super::CommandError;

/// Record selector resolved from command-line arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Zero-based position.
    Index(usize),
    /// Stable ID.
    Id(ProductId),
}

impl Target {
    /// Convert a 1-based row as shown by `list`.
    pub fn from_row(row: usize) -> Result<Self, CommandError> {
        row.checked_sub(1)
            .map(Self::Index)
            .ok_or(CommandError::InvalidRow(row))
    }
}

/// Print every record as a table row followed by the grand total.
pub fn list<A: PersistenceAdapter>(
    inventory: &InventoryStore<A>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    if inventory.is_empty() {
        writeln!(out, "No products yet.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:>3}  {:<36}  {:<24}  {:>12}  {:>7}  {:>14}",
        "#", "ID", "Name", "Price", "Stock", "Total"
    )?;
    for (i, record) in inventory.records().iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {:<36}  {:<24}  {:>12}  {:>7}  {:>14}",
            i + 1,
            record.id(),
            record.name(),
            inventory.format_amount(record.unit_price()),
            record.stock(),
            inventory.format_amount(record.line_total()),
        )?;
    }
    total(inventory, out)
}

pub fn add<A: PersistenceAdapter>(
    inventory: &mut InventoryStore<A>,
    name: &str,
    price: &str,
    stock: &str,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let record = inventory.add(name, price, stock)?.clone();
    let row = inventory.len();
    describe(inventory, "Added", row, &record, out)
}

pub fn edit<A: PersistenceAdapter>(
    inventory: &mut InventoryStore<A>,
    target: Target,
    name: &str,
    price: &str,
    stock: &str,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let record = match target {
        Target::Index(index) => inventory.update(index, name, price, stock)?,
        Target::Id(id) => inventory.update_by_id(id, name, price, stock)?,
    }
    .clone();
    let row = inventory.position_of(record.id()).map_or(0, |i| i + 1);
    describe(inventory, "Updated", row, &record, out)
}

pub fn remove<A: PersistenceAdapter>(
    inventory: &mut InventoryStore<A>,
    target: Target,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let removed = match target {
        Target::Index(index) => inventory.remove(index)?,
        Target::Id(id) => inventory.remove_by_id(id)?,
    };
    writeln!(out, "Removed {} ({})", removed.name(), removed.id())?;
    Ok(())
}

/// Print the grand total in the configured currency.
pub fn total<A: PersistenceAdapter>(
    inventory: &InventoryStore<A>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let totals = inventory.totals();
    writeln!(
        out,
        "Grand total: {} ({} products)",
        inventory.format_amount(totals.grand_total),
        totals.lines.len()
    )?;
    Ok(())
}

fn describe<A: PersistenceAdapter>(
    inventory: &InventoryStore<A>,
    verb: &str,
    row: usize,
    record: &ProductRecord,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    writeln!(
        out,
        "{verb} row {row}: {} x{} at {} = {} ({})",
        record.name(),
        record.stock(),
        inventory.format_amount(record.unit_price()),
        inventory.format_amount(record.line_total()),
        record.id(),
    )?;
    Ok(())
}
