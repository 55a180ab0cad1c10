//! Game room lookups that are not list screens.

use tracing::instrument;

use utpfund_core::{RoomDetails, RoomId};

use crate::gateway::{Gateway, GatewayError};

/// Per-room queries.
#[derive(Debug, Clone)]
pub struct RoomService {
    gateway: Gateway,
}

impl RoomService {
    /// Create a service over `gateway`.
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Full detail of one number game room (players, bets, result).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the call fails.
    #[instrument(skip(self), fields(room = %room_id))]
    pub async fn number_room_details(&self, room_id: &RoomId) -> Result<RoomDetails, GatewayError> {
        let mut details: RoomDetails = self
            .gateway
            .get(&format!("admin/number-game/room/{room_id}/details"))
            .await?;
        // Envelope flags are not room data
        details.fields.remove("success");
        details.fields.remove("message");
        Ok(details)
    }
}
