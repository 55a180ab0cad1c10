//! Read-only services beyond the list screens.

pub mod dashboard;
pub mod revenue;
pub mod rooms;

pub use dashboard::{Dashboard, DashboardService};
pub use revenue::RevenueSummary;
pub use rooms::RoomService;
