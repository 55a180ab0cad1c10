//! Unified error handling for the console.

use thiserror::Error;

use crate::actions::ActionError;
use crate::config::ConfigError;
use crate::gateway::{GatewayError, LoginError};
use crate::models::session::AdminIdentity;
use crate::session::SessionError;

/// Application-level error type for console front ends.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session persistence failed.
    #[error("{0}")]
    Session(#[from] SessionError),

    /// A platform API call failed.
    #[error("{0}")]
    Gateway(#[from] GatewayError),

    /// An admin action failed.
    #[error("{0}")]
    Action(#[from] ActionError),

    /// Signing in failed.
    #[error("{0}")]
    Login(#[from] LoginError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Bad input from the operator.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ConsoleError {
    /// Whether the failure means the admin has to sign in again.
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::Gateway(GatewayError::Unauthenticated)
                | Self::Action(ActionError::Unauthenticated)
        )
    }

    /// Process exit code for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.is_unauthenticated() { 2 } else { 1 }
    }

    /// Log the error, and send it to Sentry when it points at a fault rather
    /// than an expected outcome (declined request, bad input, expired session).
    pub fn report(&self) {
        if matches!(
            self,
            Self::Session(_)
                | Self::Client(_)
                | Self::Gateway(GatewayError::RequestFailed(_))
                | Self::Action(ActionError::RequestFailed(_))
                | Self::Login(LoginError::RequestFailed(_) | LoginError::Session(_))
        ) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Console command failed"
            );
        } else {
            tracing::debug!(error = %self, "Console command declined");
        }
    }
}

/// Set the Sentry user context from the signed-in admin.
pub fn set_sentry_user(admin: &AdminIdentity) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin.id.to_string()),
            email: Some(admin.email.clone()),
            username: Some(admin.name.clone()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
