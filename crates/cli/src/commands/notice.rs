//! Notice commands.

use std::io::Write;

use stockbook_store::{CredentialStore, PersistenceAdapter};

use super::CommandError;

/// Print the pending notice, if any, and clear it.
pub fn pop<A: PersistenceAdapter>(
    credentials: &CredentialStore<A>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    if let Some(notice) = credentials.pop_notice() {
        writeln!(out, "{notice}")?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use stockbook_store::{GuardOptions, MemoryAdapter};

    use super::*;

    #[test]
    fn test_pop_prints_once() {
        let creds = CredentialStore::open(MemoryAdapter::new());
        let options = GuardOptions::default().with_message("Session expired");
        creds.require_session(&mut |_: &str| {}, &options);

        let mut out = Vec::new();
        pop(&creds, &mut out).unwrap();
        pop(&creds, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Session expired\n");
    }
}
