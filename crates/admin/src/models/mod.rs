//! Domain models owned by the console rather than the platform API.

pub mod session;

pub use session::{AdminIdentity, Session};
