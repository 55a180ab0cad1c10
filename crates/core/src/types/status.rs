//! Status enums for the records the console filters on.
//!
//! Each enum lists its variants in [`ALL`](RequestStatus::ALL) order so front
//! ends can build filter pickers without hard-coding values.

use serde::{Deserialize, Serialize};

/// Lifecycle of a deposit or withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting an admin decision.
    #[default]
    Pending,
    /// Approved and credited/paid out.
    Approved,
    /// Declined by an admin.
    Rejected,
}

impl RequestStatus {
    /// Every status, in display order.
    pub const ALL: &'static [Self] = &[Self::Pending, Self::Approved, Self::Rejected];

    /// Wire value of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("invalid request status: {s}")),
        }
    }
}

/// Kind of wallet ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money added to a wallet (a completed deposit).
    Recharge,
    /// Money paid out of a wallet.
    Withdrawal,
    /// Movement between a user's wallets.
    Transfer,
    /// Promotional credit.
    Bonus,
    /// Any ledger type this console does not know about yet.
    #[serde(other)]
    Other,
}

impl TransactionType {
    /// Every filterable type, in display order.
    pub const ALL: &'static [Self] = &[
        Self::Recharge,
        Self::Withdrawal,
        Self::Transfer,
        Self::Bonus,
    ];

    /// Wire value of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recharge => "recharge",
            Self::Withdrawal => "withdrawal",
            Self::Transfer => "transfer",
            Self::Bonus => "bonus",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recharge" => Ok(Self::Recharge),
            "withdrawal" => Ok(Self::Withdrawal),
            "transfer" => Ok(Self::Transfer),
            "bonus" => Ok(Self::Bonus),
            _ => Err(format!("invalid transaction type: {s}")),
        }
    }
}

/// Settlement state of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Completed,
    Pending,
    Failed,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Pending => write!(f, "pending"),
            Self::Failed => write!(f, "failed"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// State of a game room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// Open and waiting for players.
    #[default]
    Waiting,
    /// A round is being played.
    Playing,
    /// The round finished and winners were paid.
    Completed,
    /// Closed by an admin.
    Closed,
    /// Any state this console does not know about yet.
    #[serde(other)]
    Other,
}

impl RoomStatus {
    /// Every filterable status, in display order.
    pub const ALL: &'static [Self] = &[Self::Waiting, Self::Playing, Self::Completed, Self::Closed];

    /// Wire value of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Playing => "playing",
            Self::Completed => "completed",
            Self::Closed => "closed",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoomStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "waiting" => Ok(Self::Waiting),
            "playing" => Ok(Self::Playing),
            "completed" => Ok(Self::Completed),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("invalid room status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_status_wire_format() {
        let parsed: RequestStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(parsed, RequestStatus::Approved);
        assert_eq!(
            serde_json::to_string(&RequestStatus::Pending).unwrap(),
            "\"pending\""
        );
    }

    #[test]
    fn test_request_status_from_str_is_case_insensitive() {
        assert_eq!("Pending".parse::<RequestStatus>(), Ok(RequestStatus::Pending));
        assert!("all".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_unknown_wire_values_fall_back() {
        let kind: TransactionType = serde_json::from_str("\"cashback\"").unwrap();
        assert_eq!(kind, TransactionType::Other);

        let room: RoomStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(room, RoomStatus::Other);
    }

    #[test]
    fn test_display_matches_from_str() {
        for status in RoomStatus::ALL {
            assert_eq!(status.to_string().parse::<RoomStatus>(), Ok(*status));
        }
        for kind in TransactionType::ALL {
            assert_eq!(kind.to_string().parse::<TransactionType>(), Ok(*kind));
        }
    }
}
