//! UTP Fund admin console engine.
//!
//! Everything a console front end needs except the rendering:
//!
//! - [`session`]: the signed-in admin's token, persisted across restarts
//! - [`gateway`]: authenticated calls to the platform API, sign-in/out
//! - [`list`]: fetch, filter, search and paginate one list screen
//! - [`actions`]: approve/reject requests and manage game rooms
//! - [`services`]: dashboard, revenue summary, room details
//!
//! # Security
//!
//! The session token grants full admin access to the platform: approving a
//! deposit credits real money. The token is held as a [`secrecy::SecretString`],
//! never logged, and persisted with owner-only permissions.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod actions;
pub mod config;
pub mod error;
pub mod gateway;
pub mod list;
pub mod models;
pub mod resources;
pub mod services;
pub mod session;

pub use actions::{ActionError, ActionExecutor, ActionReceipt};
pub use config::{ApiConfig, ConfigError, ConsoleConfig};
pub use error::ConsoleError;
pub use gateway::{Gateway, GatewayError, LoginCredentials, LoginError};
pub use list::{ListController, ListSource, ListView, LoadState, StatusFilter};
pub use models::{AdminIdentity, Session};
pub use resources::Resource;
pub use session::{AuthState, SessionStore};
