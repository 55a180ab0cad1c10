//! Platform customers (players).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Amount, UserId};

/// A registered player as listed on the customers screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub referral_code: Option<String>,
    #[serde(default)]
    pub referred_by: Option<String>,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub wallet: Wallet,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Balances of a player's three wallets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wallet {
    /// Withdrawable balance.
    #[serde(default)]
    pub normal: Amount,
    /// Promotional balance, playable but not withdrawable.
    #[serde(default)]
    pub benefit: Amount,
    /// Balance currently committed to games.
    #[serde(default)]
    pub game: Amount,
}

impl Wallet {
    /// Sum of all three wallets.
    #[must_use]
    pub fn total(&self) -> Amount {
        self.normal + self.benefit + self.game
    }
}

/// The embedded user reference carried by requests and ledger entries.
///
/// Deposit requests send `id`, transactions send `_id`; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
}
