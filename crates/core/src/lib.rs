//! UTP Core - Shared domain types for the admin console.
//!
//! This crate provides the types used across the console components:
//! - `admin` - Session, gateway, list controllers and actions
//! - `cli` - The `utp-admin` command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! Every record mirrors the JSON shape served by the platform's REST API so the
//! admin crate can deserialize responses straight into it.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money amounts, emails and status enums
//! - [`records`] - Customers, deposit/withdrawal requests, transactions, game rooms
//!   and dashboard figures

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod records;
pub mod types;

pub use records::*;
pub use types::*;
