//! Wallet ledger entries shown on the revenue screen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::customer::UserSummary;
use crate::types::{Amount, TransactionId, TransactionStatus, TransactionType};

/// A single wallet movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: TransactionId,
    /// The API populates the `userId` reference with the user document;
    /// `None` when the user no longer exists.
    #[serde(rename = "userId", default)]
    pub user: Option<UserSummary>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Amount,
    #[serde(default)]
    pub wallet_type: String,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub performed_by: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
