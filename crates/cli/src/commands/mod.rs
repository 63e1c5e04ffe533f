//! Command implementations.
//!
//! Every command writes its human-readable output to the supplied writer so
//! it can be exercised against an in-memory buffer.

pub mod account;
pub mod inventory;
pub mod notice;

use std::io::{self, Write};

use thiserror::Error;

use stockbook_store::{AuthError, PersistenceError, ProductError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Rows are numbered from 1.
    #[error("Invalid row {0}: rows start at 1")]
    InvalidRow(usize),

    /// Neither a row nor an ID was given.
    #[error("Select a record with --row or --id")]
    MissingTarget,

    /// Inventory validation or lookup failure.
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Registration or login refused.
    #[error("{0} ({code})", code = .0.code())]
    Auth(#[from] AuthError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Io(#[from] io::Error),
}

/// Tell the user a change was applied in memory but not saved.
pub fn warn_if_unsaved(error: Option<&PersistenceError>, out: &mut impl Write) -> io::Result<()> {
    if let Some(e) = error {
        writeln!(out, "warning: changes were not saved ({e})")?;
    }
    Ok(())
}
