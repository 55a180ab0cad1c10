//! Game rooms for the two prediction games.
//!
//! Rooms are addressed by their human-readable `roomId` (e.g. `NR-1042`) in
//! every API path, not by the storage `id`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Amount, RoomId, RoomStatus};

/// A Color Prediction room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorRoom {
    pub id: String,
    pub room_id: RoomId,
    pub entry_fee: Amount,
    #[serde(default)]
    pub benefit_fee_multiplier: Decimal,
    pub winning_amount: Amount,
    pub max_players: u32,
    #[serde(default)]
    pub current_players: u32,
    #[serde(default)]
    pub available_colors: Vec<String>,
    #[serde(default)]
    pub status: RoomStatus,
    pub created_at: DateTime<Utc>,
}

/// A Big & Small number room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberRoom {
    pub id: String,
    pub room_id: RoomId,
    pub entry_fee: Amount,
    pub winning_multiplier: Decimal,
    pub max_players: u32,
    #[serde(default)]
    pub current_players: u32,
    #[serde(default)]
    pub big_players: u32,
    #[serde(default)]
    pub small_players: u32,
    #[serde(default)]
    pub status: RoomStatus,
    /// `big` or `small` once the round has been decided.
    #[serde(default)]
    pub winning_type: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Body of a create-color-room request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColorRoom {
    pub entry_fee: Amount,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub benefit_fee_multiplier: Decimal,
    pub winning_amount: Amount,
    pub max_players: u32,
    pub available_colors: Vec<String>,
}

impl Default for CreateColorRoom {
    fn default() -> Self {
        Self {
            entry_fee: Amount::from_rupees(50),
            benefit_fee_multiplier: Decimal::ONE,
            winning_amount: Amount::from_rupees(100),
            max_players: 3,
            available_colors: ["red", "green", "blue", "yellow"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Body of a create-number-room request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNumberRoom {
    pub entry_fee: Amount,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub winning_multiplier: Decimal,
    pub max_players: u32,
}

impl Default for CreateNumberRoom {
    fn default() -> Self {
        Self {
            entry_fee: Amount::from_rupees(50),
            winning_multiplier: Decimal::TWO,
            max_players: 10,
        }
    }
}

/// Partial update of a number room. Unset fields are left out of the body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberRoomPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_fee: Option<Amount>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub winning_multiplier: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_players: Option<u32>,
}

impl NumberRoomPatch {
    /// Whether the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entry_fee.is_none() && self.winning_multiplier.is_none() && self.max_players.is_none()
    }
}

/// Detail payload for a single number room.
///
/// The shape varies with the room's state (bets, results, payouts), so it is
/// kept as an open JSON object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomDetails {
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}
