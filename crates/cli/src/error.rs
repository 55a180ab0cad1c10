//! Errors surfaced by `utp-admin` commands.

use thiserror::Error;
use utpfund_admin::{
    ActionError, ConfigError, ConsoleError, GatewayError, LoginError, session::SessionError,
};

/// A command failed.
#[derive(Debug, Error)]
pub enum CliError {
    /// The console engine reported a failure.
    #[error(transparent)]
    Console(#[from] ConsoleError),

    /// Writing output or reading stdin failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

macro_rules! via_console_error {
    ($($source:ty),* $(,)?) => {$(
        impl From<$source> for CliError {
            fn from(err: $source) -> Self {
                Self::Console(err.into())
            }
        }
    )*};
}

via_console_error!(ConfigError, SessionError, GatewayError, ActionError, LoginError);

impl CliError {
    /// Whether the admin has to sign in again.
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Console(e) if e.is_unauthenticated())
    }

    /// Process exit code for this failure.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Console(e) => e.exit_code(),
            Self::Io(_) => 1,
        }
    }

    /// Log the failure; faults also go to Sentry.
    pub fn report(&self) {
        match self {
            Self::Console(e) => e.report(),
            Self::Io(e) => tracing::warn!(error = %e, "Console I/O failed"),
        }
    }
}
