//! User account types.

use serde::Serialize;
use serde_json::{Map, Value, json};

use stockbook_core::{CredentialSecret, Email, Username};

use crate::coerce;

/// Persisted field names. They match blobs written by earlier releases.
mod fields {
    pub const FULL_NAME: &str = "nombre";
    pub const USERNAME: &str = "usuario";
    pub const EMAIL: &str = "email";
    pub const SECRET: &str = "contrasena";
}

/// Full name of the bootstrap account.
pub const SEED_FULL_NAME: &str = "Administrador demo";
/// Username of the bootstrap account.
pub const SEED_USERNAME: &str = "admin";
/// Email of the bootstrap account.
pub const SEED_EMAIL: &str = "admin@demo.com";
/// Secret of the bootstrap account.
pub const SEED_SECRET: &str = "admin123";

const SEED_LOGIN: Username = Username::from_static(SEED_USERNAME);

/// A registered user.
#[derive(Debug, Clone)]
pub struct UserAccount {
    /// Trimmed display name.
    pub full_name: String,
    /// Login name, unique case-insensitively across the store.
    pub username: Username,
    /// Lower-cased address; `None` for legacy accounts stored without one.
    pub email: Option<Email>,
    /// Login secret.
    pub secret: CredentialSecret,
}

/// An account with its secret omitted, safe to hand to presentation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub full_name: String,
    pub username: Username,
    pub email: Option<Email>,
}

/// Input to [`CredentialStore::register`](super::CredentialStore::register).
#[derive(Debug, Clone, Copy)]
pub struct Registration<'a> {
    pub full_name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub secret: &'a str,
    pub confirm_secret: &'a str,
}

impl<'a> Registration<'a> {
    /// Registration whose confirmation equals the secret.
    #[must_use]
    pub const fn new(
        full_name: &'a str,
        username: &'a str,
        email: &'a str,
        secret: &'a str,
    ) -> Self {
        Self {
            full_name,
            username,
            email,
            secret,
            confirm_secret: secret,
        }
    }

    /// Set a separate confirmation value.
    #[must_use]
    pub const fn confirm(mut self, confirm_secret: &'a str) -> Self {
        self.confirm_secret = confirm_secret;
        self
    }
}

impl UserAccount {
    /// The bootstrap account created when no accounts exist.
    #[must_use]
    pub fn seed() -> Self {
        Self {
            full_name: SEED_FULL_NAME.to_owned(),
            username: SEED_LOGIN,
            email: Email::parse(SEED_EMAIL).ok(),
            secret: CredentialSecret::new(SEED_SECRET),
        }
    }

    /// The account without its secret.
    #[must_use]
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            full_name: self.full_name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }

    /// Whether this account's email equals `email`, ignoring case.
    #[must_use]
    pub fn has_email(&self, email: &Email) -> bool {
        self.email.as_ref().is_some_and(|own| own.eq_ignore_case(email))
    }

    pub(crate) fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(fields::FULL_NAME.to_owned(), json!(self.full_name));
        obj.insert(fields::USERNAME.to_owned(), json!(self.username.as_str()));
        obj.insert(
            fields::EMAIL.to_owned(),
            json!(self.email.as_ref().map_or("", Email::as_str)),
        );
        obj.insert(fields::SECRET.to_owned(), json!(self.secret.expose()));
        Value::Object(obj)
    }

    /// Tolerant decoding of one persisted account.
    ///
    /// Entries without a non-blank name, username and secret are dropped.
    /// Length minimums are registration rules and are not re-checked here.
    pub(crate) fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let full_name = coerce::text(obj.get(fields::FULL_NAME)).trim().to_owned();
        let username = Username::new(&coerce::text(obj.get(fields::USERNAME)))?;
        let secret = coerce::text(obj.get(fields::SECRET));
        if full_name.is_empty() || secret.is_empty() {
            return None;
        }

        Some(Self {
            full_name,
            username,
            email: Email::parse_normalized(&coerce::text(obj.get(fields::EMAIL))).ok(),
            secret: CredentialSecret::new(secret),
        })
    }
}
