//! `login`, `logout` and `whoami`.

use std::io::{BufRead, Write};

use secrecy::SecretString;
use utpfund_admin::{GatewayError, LoginCredentials};

use super::Console;
use crate::error::CliError;

/// Read a password from the first line of `input`, without its line ending.
///
/// # Errors
///
/// Returns an error if `input` cannot be read.
pub fn read_password_line(mut input: impl BufRead) -> std::io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Sign in and persist the session.
///
/// A missing password is passed through as empty so the credential check
/// reports it.
///
/// # Errors
///
/// Returns the login failure, verbatim from the server when it gave one.
pub async fn login(
    console: &Console,
    out: &mut impl Write,
    email: &str,
    password: Option<String>,
) -> Result<(), CliError> {
    let credentials = LoginCredentials::new(email, SecretString::from(password.unwrap_or_default()))?;
    let admin = console.gateway().login(&credentials).await?;
    writeln!(out, "Signed in as {} <{}>", admin.name, admin.email)?;
    Ok(())
}

/// Forget the stored session.
///
/// # Errors
///
/// Returns an error if the session file cannot be removed.
pub fn logout(console: &Console, out: &mut impl Write) -> Result<(), CliError> {
    console.gateway().logout()?;
    writeln!(out, "Signed out")?;
    Ok(())
}

/// Show the stored admin without contacting the server.
///
/// # Errors
///
/// Returns `Unauthenticated` when no session is stored.
pub fn whoami(console: &Console, out: &mut impl Write) -> Result<(), CliError> {
    let admin = console
        .gateway()
        .session()
        .admin()
        .ok_or(GatewayError::Unauthenticated)?;

    writeln!(out, "{} <{}>", admin.name, admin.email)?;
    if !admin.role.is_empty() {
        writeln!(out, "role: {}", admin.role)?;
    }
    writeln!(out, "id:   {}", admin.id)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_line_strips_line_ending() {
        assert_eq!(read_password_line("s3cret pass\r\n".as_bytes()).unwrap(), "s3cret pass");
        assert_eq!(read_password_line("only\nsecond".as_bytes()).unwrap(), "only");
        assert_eq!(read_password_line("".as_bytes()).unwrap(), "");
    }
}
