//! The single active session.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::{Map, Value, json};

use stockbook_core::{Email, Username};

use super::account::UserAccount;
use crate::coerce;

mod fields {
    pub const USERNAME: &str = "usuario";
    pub const DISPLAY_NAME: &str = "nombre";
    pub const EMAIL: &str = "email";
    pub const CREATED_AT: &str = "ts";
}

/// Marker of the currently authenticated user. Never carries the secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub username: Username,
    pub display_name: String,
    pub email: Option<Email>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Start a session for `account` at `now`.
    #[must_use]
    pub fn start(account: &UserAccount, now: DateTime<Utc>) -> Self {
        Self {
            username: account.username.clone(),
            display_name: account.full_name.clone(),
            email: account.email.clone(),
            created_at: now,
        }
    }

    pub(crate) fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(fields::USERNAME.to_owned(), json!(self.username.as_str()));
        obj.insert(fields::DISPLAY_NAME.to_owned(), json!(self.display_name));
        obj.insert(
            fields::EMAIL.to_owned(),
            json!(self.email.as_ref().map_or("", Email::as_str)),
        );
        obj.insert(
            fields::CREATED_AT.to_owned(),
            json!(self.created_at.timestamp_millis()),
        );
        Value::Object(obj)
    }

    /// Tolerant decoding. A blob without a username is no session at all;
    /// other fields fall back to the username, no email, and `now`.
    pub(crate) fn from_json(value: &Value, now: DateTime<Utc>) -> Option<Self> {
        let obj = value.as_object()?;
        let username = Username::new(&coerce::text(obj.get(fields::USERNAME)))?;

        let display_name = coerce::optional_text(obj.get(fields::DISPLAY_NAME))
            .unwrap_or_else(|| username.as_str().to_owned());
        let email = Email::parse_normalized(&coerce::text(obj.get(fields::EMAIL))).ok();
        let created_at = coerce::number(obj.get(fields::CREATED_AT))
            .and_then(|ms| ms.trunc().to_i64())
            .filter(|ms| *ms != 0)
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or(now);

        Some(Self {
            username,
            display_name,
            email,
            created_at,
        })
    }
}
