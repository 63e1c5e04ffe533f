//! Authentication error types.

use thiserror::Error;

/// Reasons a registration or login is refused.
///
/// These are ordinary outcomes reported to the user, never crashes. Use
/// [`AuthError::code`] for a stable machine-readable identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Full name shorter than the minimum.
    #[error("enter a valid full name (at least {min} characters)", min = super::MIN_NAME_LENGTH)]
    NameTooShort,

    /// Username shorter than the minimum.
    #[error("username must be at least {min} characters", min = super::MIN_USERNAME_LENGTH)]
    UsernameTooShort,

    /// Email does not look like `local@domain.tld`.
    #[error("enter a valid email address")]
    InvalidEmail,

    /// Secret shorter than the minimum.
    #[error("password must be at least {min} characters", min = super::MIN_SECRET_LENGTH)]
    SecretTooShort,

    /// Secret and confirmation differ.
    #[error("passwords do not match")]
    SecretMismatch,

    /// Another account already uses this username (case-insensitive).
    #[error("username is already registered")]
    UsernameTaken,

    /// Another account already uses this email (case-insensitive).
    #[error("email is already registered")]
    EmailTaken,

    /// Username or secret left empty at login.
    #[error("enter username and password")]
    MissingCredentials,

    /// No account matches the username.
    #[error("user not registered")]
    UnknownUser,

    /// The account exists but the secret is wrong.
    #[error("incorrect password")]
    WrongSecret,
}

impl AuthError {
    /// Stable reason code, e.g. `username_taken`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NameTooShort => "name_too_short",
            Self::UsernameTooShort => "username_too_short",
            Self::InvalidEmail => "invalid_email",
            Self::SecretTooShort => "secret_too_short",
            Self::SecretMismatch => "secret_mismatch",
            Self::UsernameTaken => "username_taken",
            Self::EmailTaken => "email_taken",
            Self::MissingCredentials => "missing_credentials",
            Self::UnknownUser => "unknown_user",
            Self::WrongSecret => "wrong_secret",
        }
    }
}
