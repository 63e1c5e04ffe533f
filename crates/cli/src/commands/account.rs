//! Account and session commands.

use std::io::Write;

use stockbook_core::Email;
use stockbook_store::{CredentialStore, GuardOptions, PersistenceAdapter, Registration};

use super::CommandError;

pub fn register<A: PersistenceAdapter>(
    credentials: &mut CredentialStore<A>,
    registration: &Registration<'_>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let account = credentials.register(registration)?;
    writeln!(out, "Registered {} ({})", account.username, account.full_name)?;
    Ok(())
}

pub fn login<A: PersistenceAdapter>(
    credentials: &mut CredentialStore<A>,
    username: &str,
    password: &str,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let session = credentials.login(username, password)?;
    writeln!(out, "Welcome, {}", session.display_name)?;
    Ok(())
}

pub fn logout<A: PersistenceAdapter>(
    credentials: &mut CredentialStore<A>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    credentials.logout();
    writeln!(out, "Signed out")?;
    Ok(())
}

/// Show the signed-in user, or where a protected view would send the caller.
pub fn whoami<A: PersistenceAdapter>(
    credentials: &CredentialStore<A>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let mut redirect = None;
    let session = credentials.require_session(
        &mut |path: &str| redirect = Some(path.to_owned()),
        &GuardOptions::default(),
    );

    match (session, redirect) {
        (Some(session), _) => {
            let email = session.email.as_ref().map_or("-", Email::as_str);
            writeln!(
                out,
                "{} <{}> signed in as {} since {}",
                session.display_name,
                email,
                session.username,
                session.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            )?;
        }
        (None, path) => {
            writeln!(out, "Not signed in (login at {})", path.unwrap_or_default())?;
        }
    }
    Ok(())
}

/// List every account without passwords.
pub fn list<A: PersistenceAdapter>(
    credentials: &CredentialStore<A>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    for account in credentials.list_users() {
        let email = account.email.as_ref().map_or("-", Email::as_str);
        writeln!(
            out,
            "{:<20}  {:<30}  {}",
            account.username.as_str(),
            email,
            account.full_name
        )?;
    }
    Ok(())
}
