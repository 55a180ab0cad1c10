//! Deposit and withdrawal requests awaiting admin decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::customer::UserSummary;
use crate::types::{Amount, DepositRequestId, RequestStatus, UserId, WithdrawalId};

/// A player's request to credit a deposit to their wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    pub id: DepositRequestId,
    pub user: UserSummary,
    pub amount: Amount,
    pub status: RequestStatus,
    pub request_date: DateTime<Utc>,
    #[serde(default)]
    pub approved_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
}

/// A player's request to pay out wallet funds over UPI.
///
/// Unlike deposits, the user is flattened into `userName`/`userEmail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub id: WithdrawalId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: String,
    pub amount: Amount,
    #[serde(default)]
    pub upi_id: String,
    pub status: RequestStatus,
    /// Admin remarks on approval, or the rejection reason.
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub processed_by: Option<String>,
    #[serde(default)]
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
