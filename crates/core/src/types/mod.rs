//! Core types for Stockbook.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod email;
pub mod id;
pub mod price;
pub mod username;

pub use credential::CredentialSecret;
pub use email::{Email, EmailError};
pub use id::ProductId;
pub use price::{CurrencyCode, Price, UnknownCurrency, round_to_cents};
pub use username::Username;
