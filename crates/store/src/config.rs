//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOCKBOOK_DATA_DIR` - Directory used by the file adapter (default: `.stockbook`)
//! - `STOCKBOOK_CURRENCY` - ISO 4217 code for money formatting (default: PEN)
//! - `STOCKBOOK_PANEL_PATH` - Where guest-only views send signed-in users (default: `Menu.html`)
//! - `STOCKBOOK_LOGIN_PATH` - Where protected views send anonymous users (default: `login.html`)

use std::path::PathBuf;

use thiserror::Error;

use stockbook_core::CurrencyCode;

use crate::auth::{CredentialStore, GuardPaths};
use crate::inventory::InventoryStore;
use crate::persistence::FileAdapter;

const DEFAULT_DATA_DIR: &str = ".stockbook";
const DEFAULT_PANEL_PATH: &str = "Menu.html";
const DEFAULT_LOGIN_PATH: &str = "login.html";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Runtime settings shared by both stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding one JSON file per storage key
    pub data_dir: PathBuf,
    /// Currency used when formatting amounts
    pub currency: CurrencyCode,
    /// Default guard redirect targets
    pub guard_paths: GuardPaths,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            currency: CurrencyCode::default(),
            guard_paths: GuardPaths::default(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for an empty path or an unknown
    /// currency code.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = get_non_empty(&lookup, "STOCKBOOK_DATA_DIR", DEFAULT_DATA_DIR)?;
        let currency = lookup("STOCKBOOK_CURRENCY")
            .map_or(Ok(CurrencyCode::default()), |raw| raw.parse::<CurrencyCode>())
            .map_err(|e| ConfigError::InvalidEnvVar("STOCKBOOK_CURRENCY".to_string(), e.to_string()))?;
        let panel = get_non_empty(&lookup, "STOCKBOOK_PANEL_PATH", DEFAULT_PANEL_PATH)?;
        let login = get_non_empty(&lookup, "STOCKBOOK_LOGIN_PATH", DEFAULT_LOGIN_PATH)?;

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            currency,
            guard_paths: GuardPaths { login, panel },
        })
    }

    /// File adapter rooted at [`data_dir`](Self::data_dir).
    #[must_use]
    pub fn file_adapter(&self) -> FileAdapter {
        FileAdapter::new(&self.data_dir)
    }

    /// Inventory store over the data directory, loaded and using the configured currency.
    #[must_use]
    pub fn open_inventory(&self) -> InventoryStore<FileAdapter> {
        InventoryStore::open(self.file_adapter()).with_currency(self.currency)
    }

    /// Credential store over the data directory, loaded and using the configured paths.
    #[must_use]
    pub fn open_credentials(&self) -> CredentialStore<FileAdapter> {
        CredentialStore::open(self.file_adapter()).with_paths(self.guard_paths.clone())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value, rejecting blank overrides.
fn get_non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<String, ConfigError> {
    match lookup(key) {
        None => Ok(default.to_string()),
        Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be empty".to_string(),
        )),
        Some(value) => Ok(value.trim().to_string()),
    }
}
