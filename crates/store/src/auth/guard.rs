//! View guards and the redirect collaborator.

/// Side-effecting redirect supplied by presentation code.
///
/// Any `FnMut(&str)` closure is a navigator:
///
/// ```
/// use stockbook_store::Navigator;
///
/// let mut visited = Vec::new();
/// let mut nav = |path: &str| visited.push(path.to_owned());
/// nav.navigate_to("login.html");
/// assert_eq!(visited, ["login.html"]);
/// ```
pub trait Navigator {
    /// Move the user to `path`.
    fn navigate_to(&mut self, path: &str);
}

impl<F: FnMut(&str)> Navigator for F {
    fn navigate_to(&mut self, path: &str) {
        self(path);
    }
}

/// Per-call overrides for [`require_session`](super::CredentialStore::require_session)
/// and [`ensure_guest`](super::CredentialStore::ensure_guest).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardOptions {
    /// Target instead of the configured default.
    pub redirect_to: Option<String>,
    /// Notice stored for the next page before redirecting (session guard only).
    pub message: Option<String>,
}

impl GuardOptions {
    #[must_use]
    pub fn redirect_to(path: impl Into<String>) -> Self {
        Self {
            redirect_to: Some(path.into()),
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Default guard targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPaths {
    /// Where unauthenticated visitors of a protected view are sent.
    pub login: String,
    /// Where authenticated visitors of a guest-only view are sent.
    pub panel: String,
}

impl Default for GuardPaths {
    fn default() -> Self {
        Self {
            login: "login.html".to_owned(),
            panel: "Menu.html".to_owned(),
        }
    }
}
