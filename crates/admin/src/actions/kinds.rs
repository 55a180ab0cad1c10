//! Typed admin actions, one enum per record type.

use std::fmt;

use reqwest::Method;
use serde::Serialize;
use serde_json::{Value, json};

use utpfund_core::{
    CreateColorRoom, CreateNumberRoom, DepositRequestId, NumberRoomPatch, RoomId, WithdrawalId,
};

use super::ActionError;

/// What an action does, independent of its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Approve,
    Reject,
    Create,
    Close,
    Delete,
    Update,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Create => "create",
            Self::Close => "close",
            Self::Delete => "delete",
            Self::Update => "update",
        })
    }
}

/// A mutating call against the platform API.
pub trait ResourceAction: fmt::Debug + Send + Sync {
    /// What the action does.
    fn kind(&self) -> ActionKind;

    /// ID of the record acted on; `None` for creations.
    fn target(&self) -> Option<&str>;

    /// HTTP method.
    fn method(&self) -> Method;

    /// API path.
    fn path(&self) -> String;

    /// JSON body, if any.
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if a form cannot be encoded.
    fn body(&self) -> Result<Option<Value>, ActionError>;

    /// Local checks run before any request is sent.
    ///
    /// # Errors
    ///
    /// Returns `ValidationRejected` when the action cannot be sent as-is.
    fn validate(&self) -> Result<(), ActionError> {
        Ok(())
    }
}

/// Action type for read-only record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoActions {}

impl ResourceAction for NoActions {
    fn kind(&self) -> ActionKind {
        match *self {}
    }

    fn target(&self) -> Option<&str> {
        match *self {}
    }

    fn method(&self) -> Method {
        match *self {}
    }

    fn path(&self) -> String {
        match *self {}
    }

    fn body(&self) -> Result<Option<Value>, ActionError> {
        match *self {}
    }
}

/// Free text forwarded verbatim, or `None` when blank.
fn note(text: Option<&String>) -> Option<&str> {
    text.map(String::as_str).filter(|t| !t.trim().is_empty())
}

/// Encode a form as a request body.
fn encode<T: Serialize>(form: &T) -> Result<Option<Value>, ActionError> {
    serde_json::to_value(form)
        .map(Some)
        .map_err(|e| ActionError::RequestFailed(format!("Failed to encode request: {e}")))
}

/// Decisions on a pending deposit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositAction {
    /// Credit the deposit.
    Approve {
        id: DepositRequestId,
        remarks: Option<String>,
    },
    /// Decline the deposit.
    Reject {
        id: DepositRequestId,
        reason: Option<String>,
    },
}

impl ResourceAction for DepositAction {
    fn kind(&self) -> ActionKind {
        match self {
            Self::Approve { .. } => ActionKind::Approve,
            Self::Reject { .. } => ActionKind::Reject,
        }
    }

    fn target(&self) -> Option<&str> {
        match self {
            Self::Approve { id, .. } | Self::Reject { id, .. } => Some(id.as_str()),
        }
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> String {
        match self {
            Self::Approve { id, .. } => format!("admin/deposit-request/{id}/approve"),
            // The platform names this route in the past tense
            Self::Reject { id, .. } => format!("admin/deposit-request/{id}/rejected"),
        }
    }

    fn body(&self) -> Result<Option<Value>, ActionError> {
        Ok(match self {
            Self::Approve { remarks, .. } => {
                note(remarks.as_ref()).map(|remarks| json!({ "remarks": remarks }))
            }
            Self::Reject { reason, .. } => {
                note(reason.as_ref()).map(|reason| json!({ "reason": reason }))
            }
        })
    }
}

/// Decisions on a pending withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WithdrawalAction {
    /// Pay the withdrawal out.
    Approve {
        id: WithdrawalId,
        remarks: Option<String>,
    },
    /// Decline the withdrawal; a reason is mandatory.
    Reject { id: WithdrawalId, reason: String },
}

impl ResourceAction for WithdrawalAction {
    fn kind(&self) -> ActionKind {
        match self {
            Self::Approve { .. } => ActionKind::Approve,
            Self::Reject { .. } => ActionKind::Reject,
        }
    }

    fn target(&self) -> Option<&str> {
        match self {
            Self::Approve { id, .. } | Self::Reject { id, .. } => Some(id.as_str()),
        }
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> String {
        match self {
            Self::Approve { id, .. } => format!("admin/withdrawal/{id}/approve"),
            Self::Reject { id, .. } => format!("admin/withdrawal/{id}/reject"),
        }
    }

    fn body(&self) -> Result<Option<Value>, ActionError> {
        Ok(match self {
            Self::Approve { remarks, .. } => {
                note(remarks.as_ref()).map(|remarks| json!({ "remarks": remarks }))
            }
            Self::Reject { reason, .. } => {
                note(Some(reason)).map(|reason| json!({ "reason": reason }))
            }
        })
    }

    fn validate(&self) -> Result<(), ActionError> {
        match self {
            Self::Reject { reason, .. } if reason.trim().is_empty() => Err(
                ActionError::ValidationRejected("A reason is required to reject a withdrawal".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

/// Color game room management.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorRoomAction {
    /// Open a new room.
    Create(CreateColorRoom),
}

impl ResourceAction for ColorRoomAction {
    fn kind(&self) -> ActionKind {
        ActionKind::Create
    }

    fn target(&self) -> Option<&str> {
        None
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> String {
        "admin/game/room/create".to_string()
    }

    fn body(&self) -> Result<Option<Value>, ActionError> {
        match self {
            Self::Create(form) => encode(form),
        }
    }

    fn validate(&self) -> Result<(), ActionError> {
        let Self::Create(form) = self;
        if form.max_players == 0 {
            return Err(ActionError::ValidationRejected(
                "A room needs at least one player slot".to_string(),
            ));
        }
        if form.available_colors.is_empty() {
            return Err(ActionError::ValidationRejected(
                "Pick at least one color".to_string(),
            ));
        }
        Ok(())
    }
}

/// Number game room management.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberRoomAction {
    /// Open a new room.
    Create(CreateNumberRoom),
    /// Stop accepting players and settle the round.
    Close(RoomId),
    /// Remove the room.
    Delete(RoomId),
    /// Change room settings.
    Update(RoomId, NumberRoomPatch),
}

impl ResourceAction for NumberRoomAction {
    fn kind(&self) -> ActionKind {
        match self {
            Self::Create(_) => ActionKind::Create,
            Self::Close(_) => ActionKind::Close,
            Self::Delete(_) => ActionKind::Delete,
            Self::Update(..) => ActionKind::Update,
        }
    }

    fn target(&self) -> Option<&str> {
        match self {
            Self::Create(_) => None,
            Self::Close(id) | Self::Delete(id) | Self::Update(id, _) => Some(id.as_str()),
        }
    }

    fn method(&self) -> Method {
        match self {
            Self::Create(_) | Self::Close(_) => Method::POST,
            Self::Delete(_) => Method::DELETE,
            Self::Update(..) => Method::PUT,
        }
    }

    fn path(&self) -> String {
        match self {
            Self::Create(_) => "admin/number-game/room/create".to_string(),
            Self::Close(id) => format!("admin/number-game/room/{id}/close"),
            Self::Delete(id) => format!("admin/number-game/room/{id}"),
            Self::Update(id, _) => format!("admin/number-game/room/{id}"),
        }
    }

    fn body(&self) -> Result<Option<Value>, ActionError> {
        match self {
            Self::Create(form) => encode(form),
            Self::Update(_, patch) => encode(patch),
            Self::Close(_) | Self::Delete(_) => Ok(None),
        }
    }

    fn validate(&self) -> Result<(), ActionError> {
        match self {
            Self::Create(form) if form.max_players == 0 => Err(ActionError::ValidationRejected(
                "A room needs at least one player slot".to_string(),
            )),
            Self::Update(_, patch) if patch.is_empty() => Err(ActionError::ValidationRejected(
                "Nothing to update".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use utpfund_core::Amount;

    use super::*;

    #[test]
    fn test_deposit_paths() {
        let approve = DepositAction::Approve {
            id: DepositRequestId::new("d1"),
            remarks: None,
        };
        assert_eq!(approve.path(), "admin/deposit-request/d1/approve");
        assert!(approve.body().unwrap().is_none());

        let reject = DepositAction::Reject {
            id: DepositRequestId::new("d1"),
            reason: Some("Duplicate UTR".to_string()),
        };
        assert_eq!(reject.path(), "admin/deposit-request/d1/rejected");
        assert_eq!(reject.body().unwrap(), Some(json!({ "reason": "Duplicate UTR" })));
        assert_eq!(reject.kind(), ActionKind::Reject);
        assert_eq!(reject.target(), Some("d1"));
    }

    #[test]
    fn test_blank_remarks_are_omitted() {
        let approve = WithdrawalAction::Approve {
            id: WithdrawalId::new("w1"),
            remarks: Some("   ".to_string()),
        };
        assert!(approve.body().unwrap().is_none());

        let approve = WithdrawalAction::Approve {
            id: WithdrawalId::new("w1"),
            remarks: Some("  paid via UPI ".to_string()),
        };
        // Forwarded verbatim, not trimmed
        assert_eq!(approve.body().unwrap(), Some(json!({ "remarks": "  paid via UPI " })));
    }

    #[test]
    fn test_withdrawal_reject_requires_reason() {
        let reject = WithdrawalAction::Reject {
            id: WithdrawalId::new("w1"),
            reason: " ".to_string(),
        };
        assert!(matches!(
            reject.validate(),
            Err(ActionError::ValidationRejected(_))
        ));

        let reject = WithdrawalAction::Reject {
            id: WithdrawalId::new("w1"),
            reason: "UPI ID mismatch".to_string(),
        };
        assert!(reject.validate().is_ok());
        assert_eq!(reject.path(), "admin/withdrawal/w1/reject");
        assert_eq!(reject.body().unwrap(), Some(json!({ "reason": "UPI ID mismatch" })));
    }

    #[test]
    fn test_number_room_routes() {
        let id = RoomId::new("NR-7");
        let close = NumberRoomAction::Close(id.clone());
        assert_eq!(
            (close.method(), close.path()),
            (Method::POST, "admin/number-game/room/NR-7/close".to_string())
        );

        let delete = NumberRoomAction::Delete(id.clone());
        assert_eq!(
            (delete.method(), delete.path()),
            (Method::DELETE, "admin/number-game/room/NR-7".to_string())
        );

        let patch = NumberRoomPatch {
            max_players: Some(20),
            ..NumberRoomPatch::default()
        };
        let update = NumberRoomAction::Update(id, patch);
        assert_eq!(update.method(), Method::PUT);
        assert_eq!(update.body().unwrap(), Some(json!({ "maxPlayers": 20 })));
    }

    #[test]
    fn test_unencodable_form_is_an_error() {
        // JSON object keys must be strings
        let form = std::collections::HashMap::from([((1_u8, 2_u8), 3_u8)]);
        assert!(matches!(
            encode(&form),
            Err(ActionError::RequestFailed(message)) if message.starts_with("Failed to encode request")
        ));
    }

    #[test]
    fn test_empty_patch_is_rejected() {
        let update = NumberRoomAction::Update(RoomId::new("NR-7"), NumberRoomPatch::default());
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_create_room_bodies() {
        let create = NumberRoomAction::Create(CreateNumberRoom::default());
        assert_eq!(create.target(), None);
        assert_eq!(create.path(), "admin/number-game/room/create");
        let body = create.body().unwrap().unwrap();
        assert_eq!(body["maxPlayers"], 10);

        let form = CreateColorRoom {
            entry_fee: Amount::from_rupees(20),
            benefit_fee_multiplier: Decimal::ONE,
            winning_amount: Amount::from_rupees(50),
            max_players: 4,
            available_colors: vec!["red".to_string(), "green".to_string()],
        };
        let create = ColorRoomAction::Create(form);
        assert_eq!(create.path(), "admin/game/room/create");
        assert_eq!(create.body().unwrap().unwrap()["availableColors"], json!(["red", "green"]));
    }
}
