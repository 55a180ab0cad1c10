//! Authenticated fetch gateway for the platform API.
//!
//! Every authenticated call goes through [`Gateway::call`], which:
//!
//! - refuses to touch the network when no session is held,
//! - attaches the session token as a bearer credential,
//! - on HTTP 401 drops that token from the [`SessionStore`] (which in turn
//!   broadcasts [`AuthState::SignedOut`](crate::session::AuthState)),
//! - unwraps the platform's `{ success, message, ... }` envelope.
//!
//! # API Reference
//!
//! - Base URL: `https://api.utpfund.live/api`
//! - Authentication: `Authorization: Bearer <token>` from `admin/login`

mod auth;

pub use auth::{LoginCredentials, LoginError};

use std::sync::Arc;

use reqwest::{Client, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

use crate::config::ApiConfig;
use crate::session::SessionStore;

/// Failure kinds surfaced by the gateway.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// No session was held, or the server rejected the token.
    #[error("Not signed in or session expired")]
    Unauthenticated,

    /// Network failure, non-success status, or an unreadable body.
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The server understood the request and declined it.
    #[error("Rejected by server: {0}")]
    Rejected(String),
}

impl GatewayError {
    /// Message suitable for showing to the admin.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Unauthenticated => "Your session has expired. Please sign in again.",
            Self::RequestFailed(message) | Self::Rejected(message) => message,
        }
    }
}

/// Client for the platform's admin API.
///
/// Cheap to clone; clones share the HTTP connection pool and session store.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    client: Client,
    base_url: String,
    session: SessionStore,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.inner.base_url)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// Create a gateway for `config` that authenticates with `session`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, session: SessionStore) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(GatewayInner {
                client: builder.build()?,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                session,
            }),
        })
    }

    /// The session store this gateway authenticates with.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Absolute URL for an API path such as `admin/users`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// Perform an authenticated request and return the response envelope.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` without a session (no request is sent) or on 401
    /// - `Rejected` when the server declines the request
    /// - `RequestFailed` for anything else
    #[instrument(skip(self, body))]
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, GatewayError> {
        let Some(token) = self.inner.session.token() else {
            debug!("No session held; request not sent");
            return Err(GatewayError::Unauthenticated);
        };

        let mut request = self
            .inner
            .client
            .request(method, self.url(path))
            .bearer_auth(token.expose_secret());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Platform request failed");
            GatewayError::RequestFailed(format!("Network error: {e}"))
        })?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.expire(&token);
            return Err(GatewayError::Unauthenticated);
        }

        handle_response(response).await
    }

    /// Authenticated GET, deserialized into `T`.
    ///
    /// # Errors
    ///
    /// See [`Gateway::call`]; also `RequestFailed` if the body does not match `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let value = self.call(Method::GET, path, None).await?;
        decode(value)
    }

    /// Fetch a list endpoint and pull the array stored under `key`.
    ///
    /// A missing or `null` collection is treated as empty.
    ///
    /// # Errors
    ///
    /// See [`Gateway::get`].
    #[instrument(skip(self))]
    pub async fn fetch_collection<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
    ) -> Result<Vec<T>, GatewayError> {
        let mut envelope = self.call(Method::GET, path, None).await?;

        let items = match envelope.get_mut(key).map(Value::take) {
            None | Some(Value::Null) => {
                debug!(key, "Collection missing from response; treating as empty");
                return Ok(Vec::new());
            }
            Some(items) => items,
        };

        let items: Vec<T> = serde_json::from_value(items).map_err(|e| {
            error!(key, error = %e, "Unexpected collection shape");
            GatewayError::RequestFailed(format!("Failed to parse {key}: {e}"))
        })?;
        debug!(key, count = items.len(), "Fetched collection");
        Ok(items)
    }

    /// Unauthenticated POST, used only for signing in.
    ///
    /// Returns the status and decoded body as-is; a 401 here means bad
    /// credentials, not an expired session, so the session store is not
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` for network failures or a non-JSON body.
    #[instrument(skip(self, body))]
    pub async fn post_public<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(StatusCode, Value), GatewayError> {
        let response = self
            .inner
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Platform request failed");
                GatewayError::RequestFailed(format!("Network error: {e}"))
            })?;

        let status = response.status();
        let envelope = read_envelope(response).await?;
        Ok((status, envelope))
    }

    fn expire(&self, token: &SecretString) {
        match self.inner.session.clear_if_current(token) {
            Ok(true) => warn!("Server rejected session token; signed out"),
            Ok(false) => debug!("Server rejected a token that was already replaced"),
            Err(e) => error!(error = %e, "Failed to erase expired session"),
        }
    }
}

/// Map an HTTP response to the envelope value or a gateway error.
async fn handle_response(response: reqwest::Response) -> Result<Value, GatewayError> {
    let status = response.status();

    if status.is_success() {
        let envelope = read_envelope(response).await?;
        if envelope.get("success").and_then(Value::as_bool) == Some(false) {
            let message = envelope_message(&envelope)
                .unwrap_or_else(|| "The server declined the request".to_string());
            warn!(%status, message = %message, "Platform declined request");
            return Err(GatewayError::Rejected(message));
        }
        return Ok(envelope);
    }

    Err(parse_error(status, response).await)
}

/// Build the error for a non-success response.
async fn parse_error(status: StatusCode, response: reqwest::Response) -> GatewayError {
    let message = read_envelope(response)
        .await
        .ok()
        .and_then(|v| envelope_message(&v));

    if matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY
    ) {
        let message = message.unwrap_or_else(|| "The server declined the request".to_string());
        warn!(%status, message = %message, "Platform declined request");
        return GatewayError::Rejected(message);
    }

    let message = message.map_or_else(
        || format!("HTTP {status}"),
        |m| format!("HTTP {status}: {m}"),
    );
    warn!(%status, message = %message, "Platform request failed");
    GatewayError::RequestFailed(message)
}

async fn read_envelope(response: reqwest::Response) -> Result<Value, GatewayError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| GatewayError::RequestFailed(format!("Failed to read response: {e}")))?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes)
        .map_err(|e| GatewayError::RequestFailed(format!("Failed to parse response: {e}")))
}

fn envelope_message(envelope: &Value) -> Option<String> {
    envelope
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(String::from)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, GatewayError> {
    serde_json::from_value(value)
        .map_err(|e| GatewayError::RequestFailed(format!("Failed to parse response: {e}")))
}
