//! Records served by the platform's admin REST API.
//!
//! Field names follow the API's camelCase JSON; optional or frequently missing
//! fields default rather than fail the whole collection.

pub mod customer;
pub mod dashboard;
pub mod request;
pub mod room;
pub mod transaction;

pub use customer::{Customer, UserSummary, Wallet};
pub use dashboard::*;
pub use request::{DepositRequest, Withdrawal};
pub use room::*;
pub use transaction::Transaction;
