//! Admin sign-in and sign-out.
//!
//! `admin/login` is the only endpoint called without a bearer token. A
//! successful response carries `{ success: true, token, admin }`; failures
//! carry `{ success: false, message }` with any status code.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument, warn};

use utpfund_core::{Email, EmailError};

use super::{Gateway, GatewayError, envelope_message};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::session::AdminIdentity;
use crate::session::SessionError;

/// Login endpoint path.
const LOGIN_PATH: &str = "admin/login";

/// Shown when the server declines without saying why.
const LOGIN_FAILED: &str = "Login failed. Please try again.";

/// Errors that can occur while signing in.
#[derive(Debug, Error)]
pub enum LoginError {
    /// Email or password left blank.
    #[error("Please enter both email and password")]
    MissingCredentials,

    /// Email is not a usable address.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The server declined the credentials.
    #[error("{0}")]
    Rejected(String),

    /// The server could not be reached or answered nonsense.
    #[error("Login request failed: {0}")]
    RequestFailed(String),

    /// Signed in, but the session could not be stored.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Email and password for `admin/login`.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct LoginCredentials {
    email: Email,
    password: SecretString,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl LoginCredentials {
    /// Validate raw form input.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` if either field is blank, or
    /// `InvalidEmail` if the address is malformed.
    pub fn new(email: &str, password: SecretString) -> Result<Self, LoginError> {
        if email.trim().is_empty() || password.expose_secret().is_empty() {
            return Err(LoginError::MissingCredentials);
        }
        Ok(Self {
            email: Email::parse(email)?,
            password,
        })
    }

    /// The sign-in address.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    admin: Option<AdminIdentity>,
}

impl Gateway {
    /// Sign in and store the issued session.
    ///
    /// # Errors
    ///
    /// - `Rejected` with the server's message when credentials are declined
    /// - `RequestFailed` when the server is unreachable or the reply is malformed
    /// - `Session` when the session cannot be persisted
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AdminIdentity, LoginError> {
        let body = LoginBody {
            email: credentials.email.as_str(),
            password: credentials.password.expose_secret(),
        };

        let (status, envelope) = self
            .post_public(LOGIN_PATH, &body)
            .await
            .map_err(|e| match e {
                GatewayError::RequestFailed(message) | GatewayError::Rejected(message) => {
                    LoginError::RequestFailed(message)
                }
                GatewayError::Unauthenticated => LoginError::RequestFailed(e.to_string()),
            })?;

        let (token, admin) = parse_login(status, envelope)?;
        self.session().set(token, admin.clone())?;
        set_sentry_user(&admin);

        info!(admin_id = %admin.id, "Admin signed in");
        Ok(admin)
    }

    /// Sign out and erase the stored session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the persisted copy cannot be erased; the
    /// in-memory session is gone either way.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), SessionError> {
        let result = self.session().clear();
        clear_sentry_user();
        result
    }
}

fn parse_login(
    status: StatusCode,
    envelope: Value,
) -> Result<(SecretString, AdminIdentity), LoginError> {
    let declined = || {
        let message = envelope_message(&envelope).unwrap_or_else(|| LOGIN_FAILED.to_string());
        warn!(%status, message = %message, "Login declined");
        LoginError::Rejected(message)
    };

    let response: LoginResponse = match serde_json::from_value(envelope.clone()) {
        Ok(response) => response,
        Err(e) if status.is_success() => {
            return Err(LoginError::RequestFailed(format!(
                "Failed to parse login response: {e}"
            )));
        }
        Err(_) => return Err(declined()),
    };

    if !status.is_success() || !response.success {
        return Err(declined());
    }

    match (response.token, response.admin) {
        (Some(token), Some(admin)) if !token.is_empty() => Ok((SecretString::from(token), admin)),
        _ => Err(LoginError::RequestFailed(
            "Login response is missing the token or admin profile".to_string(),
        )),
    }
}
