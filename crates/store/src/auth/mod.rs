//! Credential store: accounts, the single active session, and view guards.
//!
//! Accounts live in memory and are written through the [`PersistenceAdapter`]
//! after every successful registration. The session slot is read back from
//! the adapter on each [`CredentialStore::current_session`] call, so a session
//! cleared by another store over the same adapter is seen immediately. After a
//! failed session write the in-memory slot wins until a later write succeeds.
//!
//! Registration and login failures are returned as [`AuthError`] values.
//! Persistence failures are logged, recorded, and otherwise ignored.

mod account;
mod error;
mod guard;
mod session;

pub use account::{
    AccountSummary, Registration, SEED_EMAIL, SEED_FULL_NAME, SEED_SECRET, SEED_USERNAME,
    UserAccount,
};
pub use error::AuthError;
pub use guard::{GuardOptions, GuardPaths, Navigator};
pub use session::Session;

use chrono::Utc;
use serde_json::Value;

use stockbook_core::{CredentialSecret, Email, Username};

use crate::keys;
use crate::persistence::{self, PersistenceAdapter, PersistenceError, read_or_none};

/// Minimum characters in a trimmed full name.
pub const MIN_NAME_LENGTH: usize = 3;
/// Minimum characters in a trimmed username.
pub const MIN_USERNAME_LENGTH: usize = 3;
/// Minimum characters in a secret.
pub const MIN_SECRET_LENGTH: usize = 6;

/// Persisted accounts plus the single session slot.
#[derive(Debug)]
pub struct CredentialStore<A> {
    adapter: A,
    accounts: Vec<UserAccount>,
    session: Option<Session>,
    session_unsaved: bool,
    paths: GuardPaths,
    last_persistence_error: Option<PersistenceError>,
}

impl<A: PersistenceAdapter> CredentialStore<A> {
    /// Create a store with no accounts loaded.
    #[must_use]
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            accounts: Vec::new(),
            session: None,
            session_unsaved: false,
            paths: GuardPaths::default(),
            last_persistence_error: None,
        }
    }

    /// Create a store and [`load`](Self::load) its accounts.
    #[must_use]
    pub fn open(adapter: A) -> Self {
        let mut store = Self::new(adapter);
        store.load();
        store
    }

    /// Override the default guard targets.
    #[must_use]
    pub fn with_paths(mut self, paths: GuardPaths) -> Self {
        self.paths = paths;
        self
    }

    /// Replace the in-memory accounts with the persisted ones.
    ///
    /// When nothing usable is stored the seed account is installed and
    /// written back immediately, so a loaded store always has at least one
    /// account. Returns the number of accounts held afterwards.
    pub fn load(&mut self) -> usize {
        self.accounts = read_or_none(&self.adapter, keys::USERS)
            .map(|raw| decode_accounts(&raw))
            .unwrap_or_default();

        if self.accounts.is_empty() {
            tracing::debug!(username = SEED_USERNAME, "No stored accounts, installing seed account");
            self.accounts.push(UserAccount::seed());
            self.persist_best_effort(keys::USERS);
        }

        self.session = self.read_session().ok().flatten();
        self.session_unsaved = false;
        self.accounts.len()
    }

    /// Validate and append a new account.
    ///
    /// Checks run in a fixed order and stop at the first failure: name,
    /// username, email, secret length, confirmation, username uniqueness,
    /// email uniqueness.
    ///
    /// # Errors
    ///
    /// Returns the `AuthError` for the first failed check; the store is
    /// unchanged.
    pub fn register(&mut self, registration: &Registration<'_>) -> Result<AccountSummary, AuthError> {
        let full_name = registration.full_name.trim();
        if full_name.chars().count() < MIN_NAME_LENGTH {
            return Err(AuthError::NameTooShort);
        }

        let username = Username::new(registration.username)
            .filter(|u| u.char_len() >= MIN_USERNAME_LENGTH)
            .ok_or(AuthError::UsernameTooShort)?;

        let email =
            Email::parse_normalized(registration.email).map_err(|_| AuthError::InvalidEmail)?;

        let secret = CredentialSecret::new(registration.secret);
        if secret.char_len() < MIN_SECRET_LENGTH {
            return Err(AuthError::SecretTooShort);
        }
        if !secret.matches(registration.confirm_secret) {
            return Err(AuthError::SecretMismatch);
        }

        if self.find(username.as_str()).is_some() {
            return Err(AuthError::UsernameTaken);
        }
        if self.accounts.iter().any(|a| a.has_email(&email)) {
            return Err(AuthError::EmailTaken);
        }

        let account = UserAccount {
            full_name: full_name.to_owned(),
            username,
            email: Some(email),
            secret,
        };
        let summary = account.summary();
        self.accounts.push(account);
        self.persist_best_effort(keys::USERS);

        tracing::info!(username = %summary.username, "Registered account");
        Ok(summary)
    }

    /// Authenticate and replace the session slot.
    ///
    /// The username is trimmed and matched case-insensitively; the secret is
    /// compared exactly.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials`, `UnknownUser` or `WrongSecret`; the
    /// current session is left untouched.
    pub fn login(&mut self, username: &str, secret: &str) -> Result<Session, AuthError> {
        let username = username.trim();
        if username.is_empty() || secret.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let account = self.find(username).ok_or(AuthError::UnknownUser)?;
        if !account.secret.matches(secret) {
            return Err(AuthError::WrongSecret);
        }

        let session = Session::start(account, Utc::now());
        self.session = Some(session.clone());
        self.session_unsaved = !self.persist_best_effort(keys::SESSION);

        tracing::info!(username = %session.username, "Logged in");
        Ok(session)
    }

    /// The active session, if any.
    ///
    /// Reads the persisted slot; an absent or malformed blob means no
    /// session. When the adapter cannot be read, or this store's last session
    /// change never reached it, the in-memory session is returned instead.
    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        if self.session_unsaved {
            return self.session.clone();
        }
        match self.read_session() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(key = keys::SESSION, error = %e, "Session read failed, using cached session");
                self.session.clone()
            }
        }
    }

    /// Clear the session slot. Succeeds even when no session exists.
    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(username = %session.username, "Logged out");
        }
        match self.adapter.remove(keys::SESSION) {
            Ok(()) => {
                self.session_unsaved = false;
                self.last_persistence_error = None;
            }
            Err(e) => {
                tracing::warn!(key = keys::SESSION, error = %e, "Failed to clear session");
                self.session_unsaved = true;
                self.last_persistence_error = Some(e);
            }
        }
    }

    /// Guard for protected views.
    ///
    /// Returns the session when one exists. Otherwise stores
    /// `options.message` as the notice (when given), redirects exactly once
    /// to `options.redirect_to` or the configured login path, and returns
    /// `None`.
    pub fn require_session(
        &self,
        navigator: &mut impl Navigator,
        options: &GuardOptions,
    ) -> Option<Session> {
        if let Some(session) = self.current_session() {
            return Some(session);
        }

        if let Some(message) = non_empty(options.message.as_deref()) {
            if let Err(e) = self.adapter.set(keys::NOTICE, message) {
                tracing::warn!(key = keys::NOTICE, error = %e, "Failed to store notice");
            }
        }
        navigator.navigate_to(non_empty(options.redirect_to.as_deref()).unwrap_or(&self.paths.login));
        None
    }

    /// Guard for guest-only views such as the login form.
    ///
    /// When a session exists, redirects once to `options.redirect_to` or the
    /// configured panel path and returns the session. Otherwise returns
    /// `None` without navigating.
    pub fn ensure_guest(
        &self,
        navigator: &mut impl Navigator,
        options: &GuardOptions,
    ) -> Option<Session> {
        let session = self.current_session()?;
        navigator.navigate_to(non_empty(options.redirect_to.as_deref()).unwrap_or(&self.paths.panel));
        Some(session)
    }

    /// Navigate to `path`, or to the configured panel when `None`.
    pub fn go_to_panel(&self, navigator: &mut impl Navigator, path: Option<&str>) {
        navigator.navigate_to(path.unwrap_or(&self.paths.panel));
    }

    /// Read and clear the one-shot notice left by a guard redirect.
    #[must_use]
    pub fn pop_notice(&self) -> Option<String> {
        match persistence::pop(&self.adapter, keys::NOTICE) {
            Ok(notice) => notice.filter(|n| !n.is_empty()),
            Err(e) => {
                tracing::warn!(key = keys::NOTICE, error = %e, "Failed to read notice");
                None
            }
        }
    }

    /// Every account with its secret omitted, in registration order.
    #[must_use]
    pub fn list_users(&self) -> Vec<AccountSummary> {
        self.accounts.iter().map(UserAccount::summary).collect()
    }

    /// Account whose username matches `username` case-insensitively.
    #[must_use]
    pub fn find(&self, username: &str) -> Option<&UserAccount> {
        self.accounts.iter().find(|a| a.username.matches(username))
    }

    #[must_use]
    pub fn accounts(&self) -> &[UserAccount] {
        &self.accounts
    }

    /// Configured guard targets.
    #[must_use]
    pub const fn paths(&self) -> &GuardPaths {
        &self.paths
    }

    /// Write the accounts and, when logged in, the session.
    ///
    /// # Errors
    ///
    /// Returns the first `PersistenceError` raised by the adapter.
    pub fn persist(&mut self) -> Result<(), PersistenceError> {
        self.write(keys::USERS)?;
        if self.session.is_some() {
            self.write(keys::SESSION)?;
        } else if self.session_unsaved {
            self.adapter.remove(keys::SESSION)?;
        }
        self.session_unsaved = false;
        Ok(())
    }

    /// Error from the most recent write, cleared by the next successful one.
    #[must_use]
    pub const fn last_persistence_error(&self) -> Option<&PersistenceError> {
        self.last_persistence_error.as_ref()
    }

    /// Borrow the underlying adapter.
    #[must_use]
    pub const fn adapter(&self) -> &A {
        &self.adapter
    }

    fn read_session(&self) -> Result<Option<Session>, PersistenceError> {
        let Some(raw) = self.adapter.get(keys::SESSION)? else {
            return Ok(None);
        };
        let session = serde_json::from_str::<Value>(&raw)
            .ok()
            .and_then(|value| Session::from_json(&value, Utc::now()));
        if session.is_none() {
            tracing::debug!("Stored session is malformed, treating as logged out");
        }
        Ok(session)
    }

    fn write(&self, key: &str) -> Result<(), PersistenceError> {
        let blob = if key == keys::SESSION {
            self.session.as_ref().map_or(Value::Null, Session::to_json)
        } else {
            Value::Array(self.accounts.iter().map(UserAccount::to_json).collect())
        };
        self.adapter.set(key, &blob.to_string())
    }

    fn persist_best_effort(&mut self, key: &str) -> bool {
        match self.write(key) {
            Ok(()) => {
                self.last_persistence_error = None;
                true
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to persist credentials");
                self.last_persistence_error = Some(e);
                false
            }
        }
    }
}

fn decode_accounts(raw: &str) -> Vec<UserAccount> {
    let Ok(Value::Array(entries)) = serde_json::from_str::<Value>(raw) else {
        tracing::debug!("Account blob is not a JSON array, ignoring it");
        return Vec::new();
    };

    let accounts: Vec<UserAccount> = entries.iter().filter_map(UserAccount::from_json).collect();
    let dropped = entries.len() - accounts.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = accounts.len(), "Dropped malformed account entries");
    }
    accounts
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persistence::MemoryAdapter;

    fn store() -> CredentialStore<MemoryAdapter> {
        CredentialStore::open(MemoryAdapter::new())
    }

    fn jane() -> Registration<'static> {
        Registration::new("Jane Doe", "jane", "jane@x.com", "abcdef")
    }

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Navigator for Recorder {
        fn navigate_to(&mut self, path: &str) {
            self.0.push(path.to_owned());
        }
    }

    #[test]
    fn test_bootstrap_installs_seed_once() {
        let adapter = MemoryAdapter::new();
        let mut auth = CredentialStore::open(adapter.clone());
        assert_eq!(auth.accounts().len(), 1);
        assert!(adapter.get(keys::USERS).unwrap().is_some());

        auth.login(SEED_USERNAME, SEED_SECRET).unwrap();

        let reloaded = CredentialStore::open(adapter);
        assert_eq!(reloaded.accounts().len(), 1);
    }

    #[test]
    fn test_bootstrap_replaces_unusable_blob() {
        let adapter = MemoryAdapter::new();
        for blob in ["garbage", "{}", "[]", r#"[{"usuario":"x"}]"#] {
            adapter.set(keys::USERS, blob).unwrap();
            let auth = CredentialStore::open(adapter.clone());
            let users = auth.list_users();
            assert_eq!(users.len(), 1, "blob {blob:?}");
            assert_eq!(users.first().unwrap().username.as_str(), SEED_USERNAME);
        }
    }

    #[test]
    fn test_register_then_login_case_insensitive() {
        let mut auth = store();
        let summary = auth.register(&jane()).unwrap();
        assert_eq!(summary.username.as_str(), "jane");
        assert_eq!(summary.email.unwrap().as_str(), "jane@x.com");

        let session = auth.login("JANE", "abcdef").unwrap();
        assert_eq!(session.username.as_str(), "jane");
        assert_eq!(session.display_name, "Jane Doe");

        assert_eq!(auth.login("jane", "wrong").unwrap_err(), AuthError::WrongSecret);
    }

    #[test]
    fn test_register_validation_order() {
        let mut auth = store();
        let cases = [
            (Registration::new("Jo", "x", "bad", "1"), AuthError::NameTooShort),
            (Registration::new("  Jo  ", "jane", "jane@x.com", "abcdef"), AuthError::NameTooShort),
            (Registration::new("Jane Doe", "ja", "bad", "1"), AuthError::UsernameTooShort),
            (Registration::new("Jane Doe", " ja ", "jane@x.com", "abcdef"), AuthError::UsernameTooShort),
            (Registration::new("Jane Doe", "jane", "jane@x", "1"), AuthError::InvalidEmail),
            (Registration::new("Jane Doe", "jane", "jane@x.com", "abcde"), AuthError::SecretTooShort),
            (
                Registration::new("Jane Doe", "jane", "jane@x.com", "abcdef").confirm("abcdeg"),
                AuthError::SecretMismatch,
            ),
            (Registration::new("Jane Doe", "ADMIN", "jane@x.com", "abcdef"), AuthError::UsernameTaken),
            (Registration::new("Jane Doe", "jane", "Admin@Demo.com", "abcdef"), AuthError::EmailTaken),
        ];

        for (registration, expected) in cases {
            assert_eq!(auth.register(&registration).unwrap_err(), expected, "{registration:?}");
        }
        assert_eq!(auth.accounts().len(), 1);
    }

    #[test]
    fn test_register_duplicate_username_any_case() {
        let mut auth = store();
        auth.register(&Registration::new("Abe", "bob", "a@x.com", "secret1"))
            .unwrap();
        let err = auth
            .register(&Registration::new("Bob B", "BoB", "b@x.com", "secret1"))
            .unwrap_err();
        assert_eq!(err, AuthError::UsernameTaken);
    }

    #[test]
    fn test_register_persists_normalized_account() {
        let adapter = MemoryAdapter::new();
        let mut auth = CredentialStore::open(adapter.clone());
        auth.register(&Registration::new("  Jane Doe ", " jane ", " Jane@X.com ", "abcdef"))
            .unwrap();

        let reloaded = CredentialStore::open(adapter);
        let account = reloaded.find("JANE").unwrap();
        assert_eq!(account.full_name, "Jane Doe");
        assert_eq!(account.username.as_str(), "jane");
        assert_eq!(account.email.as_ref().unwrap().as_str(), "jane@x.com");
        assert!(account.secret.matches("abcdef"));
    }

    #[test]
    fn test_login_failures_leave_session() {
        let mut auth = store();
        assert_eq!(auth.login("", "x").unwrap_err(), AuthError::MissingCredentials);
        assert_eq!(auth.login("   ", "x").unwrap_err(), AuthError::MissingCredentials);
        assert_eq!(auth.login("admin", "").unwrap_err(), AuthError::MissingCredentials);
        assert_eq!(auth.login("ghost", "x").unwrap_err(), AuthError::UnknownUser);
        assert_eq!(auth.login("admin", " admin123").unwrap_err(), AuthError::WrongSecret);
        assert!(auth.current_session().is_none());
    }

    #[test]
    fn test_latest_login_wins() {
        let mut auth = store();
        auth.register(&jane()).unwrap();
        auth.login("admin", "admin123").unwrap();
        auth.login(" jane ", "abcdef").unwrap();

        let session = auth.current_session().unwrap();
        assert_eq!(session.username.as_str(), "jane");
        assert!(!auth.adapter().get(keys::SESSION).unwrap().unwrap().contains("abcdef"));
    }

    #[test]
    fn test_logout_clears_slot() {
        let adapter = MemoryAdapter::new();
        let mut auth = CredentialStore::open(adapter.clone());
        auth.login("admin", "admin123").unwrap();
        assert!(CredentialStore::open(adapter.clone()).current_session().is_some());

        auth.logout();
        assert!(auth.current_session().is_none());
        assert_eq!(adapter.get(keys::SESSION).unwrap(), None);

        auth.logout();
        assert!(auth.last_persistence_error().is_none());
    }

    #[test]
    fn test_malformed_session_is_none() {
        let adapter = MemoryAdapter::new();
        let auth = CredentialStore::open(adapter.clone());
        for blob in ["nope", "null", "{}", r#"{"usuario":""}"#] {
            adapter.set(keys::SESSION, blob).unwrap();
            assert!(auth.current_session().is_none(), "blob {blob:?}");
        }
    }

    #[test]
    fn test_session_read_failure_uses_cache() {
        let adapter = MemoryAdapter::new();
        let mut auth = CredentialStore::open(adapter.clone());
        auth.login("admin", "admin123").unwrap();

        adapter.fail_reads(true);
        assert_eq!(auth.current_session().unwrap().username.as_str(), "admin");
    }

    #[test]
    fn test_failed_writes_do_not_block_login() {
        let adapter = MemoryAdapter::new();
        let mut auth = CredentialStore::open(adapter.clone());
        adapter.fail_writes(true);

        auth.register(&jane()).unwrap();
        auth.login("jane", "abcdef").unwrap();
        assert!(auth.last_persistence_error().is_some());
        assert!(auth.persist().is_err());

        adapter.fail_writes(false);
        auth.persist().unwrap();
        assert!(CredentialStore::open(adapter).find("jane").is_some());
    }

    #[test]
    fn test_unsaved_login_replaces_previous_session() {
        let adapter = MemoryAdapter::new();
        let mut auth = CredentialStore::open(adapter.clone());
        auth.register(&jane()).unwrap();
        auth.login("admin", "admin123").unwrap();

        adapter.fail_writes(true);
        auth.login("jane", "abcdef").unwrap();
        assert!(auth.last_persistence_error().is_some());
        assert_eq!(auth.current_session().unwrap().username.as_str(), "jane");

        let mut nav = Recorder::default();
        let session = auth.require_session(&mut nav, &GuardOptions::default()).unwrap();
        assert_eq!(session.username.as_str(), "jane");
        assert!(nav.0.is_empty());

        // A later successful write hands the slot back to the adapter.
        adapter.fail_writes(false);
        auth.persist().unwrap();
        let other = CredentialStore::open(adapter);
        assert_eq!(other.current_session().unwrap().username.as_str(), "jane");
    }

    #[test]
    fn test_unsaved_first_login_is_visible() {
        let adapter = MemoryAdapter::new();
        let mut auth = CredentialStore::open(adapter.clone());
        adapter.fail_writes(true);

        auth.login("admin", "admin123").unwrap();
        assert_eq!(adapter.get(keys::SESSION).unwrap(), None);
        assert_eq!(auth.current_session().unwrap().username.as_str(), "admin");
    }

    #[test]
    fn test_unsaved_logout_reads_as_signed_out() {
        let adapter = MemoryAdapter::new();
        let mut auth = CredentialStore::open(adapter.clone());
        auth.login("admin", "admin123").unwrap();

        adapter.fail_writes(true);
        auth.logout();
        assert!(auth.last_persistence_error().is_some());
        assert!(adapter.get(keys::SESSION).unwrap().is_some());
        assert!(auth.current_session().is_none());

        adapter.fail_writes(false);
        auth.persist().unwrap();
        assert_eq!(adapter.get(keys::SESSION).unwrap(), None);
    }

    #[test]
    fn test_require_session_redirects_once_with_notice() {
        let auth = store();
        let mut nav = Recorder::default();
        let options = GuardOptions::default().with_message("Please sign in");

        assert!(auth.require_session(&mut nav, &options).is_none());
        assert_eq!(nav.0, ["login.html"]);
        assert_eq!(auth.pop_notice().as_deref(), Some("Please sign in"));
        assert_eq!(auth.pop_notice(), None);
    }

    #[test]
    fn test_require_session_with_session_does_not_navigate() {
        let mut auth = store();
        auth.login("admin", "admin123").unwrap();
        let mut nav = Recorder::default();

        let session = auth.require_session(&mut nav, &GuardOptions::default()).unwrap();
        assert_eq!(session.username.as_str(), "admin");
        assert!(nav.0.is_empty());
    }

    #[test]
    fn test_require_session_custom_target_without_notice() {
        let auth = store();
        let mut nav = Recorder::default();
        auth.require_session(&mut nav, &GuardOptions::redirect_to("index.html"));
        assert_eq!(nav.0, ["index.html"]);
        assert_eq!(auth.pop_notice(), None);

        let empty = GuardOptions {
            redirect_to: Some(String::new()),
            message: Some(String::new()),
        };
        auth.require_session(&mut nav, &empty);
        assert_eq!(nav.0, ["index.html", "login.html"]);
        assert_eq!(auth.pop_notice(), None);
    }

    #[test]
    fn test_require_session_survives_notice_failure() {
        let adapter = MemoryAdapter::new();
        let auth = CredentialStore::open(adapter.clone());
        adapter.fail_writes(true);
        let mut nav = Recorder::default();

        let options = GuardOptions::default().with_message("x");
        assert!(auth.require_session(&mut nav, &options).is_none());
        assert_eq!(nav.0.len(), 1);
    }

    #[test]
    fn test_ensure_guest() {
        let mut auth = store().with_paths(GuardPaths {
            login: "/login".to_owned(),
            panel: "/panel".to_owned(),
        });
        let mut nav = Recorder::default();
        assert!(auth.ensure_guest(&mut nav, &GuardOptions::default()).is_none());
        assert!(nav.0.is_empty());

        auth.login("admin", "admin123").unwrap();
        assert!(auth.ensure_guest(&mut nav, &GuardOptions::default()).is_some());
        auth.ensure_guest(&mut nav, &GuardOptions::redirect_to("/home"));
        assert_eq!(nav.0, ["/panel", "/home"]);
    }

    #[test]
    fn test_go_to_panel_with_closure() {
        let auth = store();
        let mut visited = Vec::new();
        let mut nav = |path: &str| visited.push(path.to_owned());
        auth.go_to_panel(&mut nav, None);
        auth.go_to_panel(&mut nav, Some("Reportes.html"));
        assert_eq!(visited, ["Menu.html", "Reportes.html"]);
    }

    #[test]
    fn test_list_users_omits_secrets() {
        let mut auth = store();
        auth.register(&jane()).unwrap();
        let users = auth.list_users();
        assert_eq!(users.len(), 2);
        assert_eq!(users.get(1).unwrap().full_name, "Jane Doe");
        assert!(!serde_json::to_string(&users).unwrap().contains("abcdef"));
    }
}
