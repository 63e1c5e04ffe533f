//! Account credential types.
//!
//! The secret is held in a [`SecretString`] so it never shows up in `Debug`
//! output or log fields. Verification is an exact string comparison.

use secrecy::{ExposeSecret, SecretString};

/// The secret a user logs in with.
pub struct CredentialSecret(SecretString);

impl CredentialSecret {
    /// Wrap a secret. The value is kept verbatim (no trimming).
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(SecretString::from(secret.into()))
    }

    /// Number of characters in the secret.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.expose_secret().chars().count()
    }

    /// Whether the secret is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// Exact comparison with a supplied secret.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.expose_secret() == candidate
    }

    /// Expose the raw secret, for persistence only.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for CredentialSecret {
    fn clone(&self) -> Self {
        Self::new(self.0.expose_secret())
    }
}

impl core::fmt::Debug for CredentialSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("CredentialSecret([REDACTED])")
    }
}

impl From<String> for CredentialSecret {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

impl From<&str> for CredentialSecret {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}
