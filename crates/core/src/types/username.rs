//! Account username type.

use core::fmt;
use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// A trimmed, non-empty login name.
///
/// Usernames keep the casing they were registered with but compare
/// case-insensitively for lookups and uniqueness.
///
/// ```
/// use stockbook_core::Username;
///
/// let name = Username::new("  Jane ").unwrap();
/// assert_eq!(name.as_str(), "Jane");
/// assert!(name.matches("JANE"));
/// assert!(Username::new("   ").is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(Cow<'static, str>);

impl Username {
    /// Trim the input and wrap it, or `None` when nothing is left.
    #[must_use]
    pub fn new(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(Cow::Owned(trimmed.to_owned())))
        }
    }

    /// Wrap a name fixed at compile time.
    ///
    /// Use it in a `const` item so a blank or padded name fails the build.
    /// Only ASCII whitespace is detected at the edges.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or starts or ends with whitespace.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        assert!(is_trimmed(name), "static username must be trimmed and non-blank");
        Self(Cow::Borrowed(name))
    }

    /// Number of characters in the name.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Case-insensitive comparison with raw input (surrounding whitespace ignored).
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.trim().to_lowercase()
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0.into_owned()
    }
}

const fn is_trimmed(name: &str) -> bool {
    match (name.as_bytes().first(), name.as_bytes().last()) {
        (Some(first), Some(last)) => !first.is_ascii_whitespace() && !last.is_ascii_whitespace(),
        _ => false,
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
