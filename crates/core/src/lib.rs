//! Stockbook Core - Shared types library.
//!
//! This crate provides the domain types used across all Stockbook components:
//! - `store` - Inventory and credential stores with their persistence adapters
//! - `cli` - Command-line front end over the stores
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no persistence,
//! no clocks. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, emails, usernames and secrets

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
