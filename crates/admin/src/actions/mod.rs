//! Action executor for admin decisions and room management.
//!
//! An action is one mutating round trip followed by a full refetch of the
//! list it came from:
//! 1. Validate locally (e.g. a withdrawal rejection needs a reason)
//! 2. Claim the `(target, kind)` slot so the same action cannot run twice
//! 3. Send the request through the [`Gateway`]
//! 4. On success, refresh the owning [`ListController`] exactly once
//!
//! Nothing is patched locally; on failure the list is left as it was.

mod kinds;

pub use kinds::{
    ActionKind, ColorRoomAction, DepositAction, NoActions, NumberRoomAction, ResourceAction,
    WithdrawalAction,
};

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::gateway::{Gateway, GatewayError};
use crate::list::{ListController, ListSource};
use crate::resources::Resource;

/// Errors that can occur when running an action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    /// No session, or the server rejected it.
    #[error("Not signed in or session expired")]
    Unauthenticated,

    /// Network failure or server error.
    #[error("Action failed: {0}")]
    RequestFailed(String),

    /// The action was refused, locally or by the server.
    #[error("{0}")]
    ValidationRejected(String),

    /// The same action on the same record is still running.
    #[error("Already running: {0}")]
    AlreadyInFlight(ActionSlot),
}

impl From<GatewayError> for ActionError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unauthenticated => Self::Unauthenticated,
            GatewayError::RequestFailed(message) => Self::RequestFailed(message),
            GatewayError::Rejected(message) => Self::ValidationRejected(message),
        }
    }
}

/// Identity of an in-flight action: what it does and to which record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionSlot {
    /// Record ID, or `None` for creations.
    pub target: Option<String>,
    /// What the action does.
    pub kind: ActionKind,
}

impl ActionSlot {
    /// Slot occupied by `action`.
    #[must_use]
    pub fn of<A: ResourceAction + ?Sized>(action: &A) -> Self {
        Self {
            target: action.target().map(String::from),
            kind: action.kind(),
        }
    }
}

impl fmt::Display for ActionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{} {target}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Outcome of a successful action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReceipt {
    /// The slot the action ran in.
    pub slot: ActionSlot,
    /// Confirmation message from the server, if it sent one.
    pub message: Option<String>,
    /// Whether the follow-up refresh succeeded. Always `false` for
    /// [`ActionExecutor::perform`], which does not refresh.
    pub refreshed: bool,
}

type SlotSet = Arc<Mutex<HashSet<ActionSlot>>>;

/// Runs admin actions through the gateway.
///
/// Cheap to clone; clones share the in-flight registry.
#[derive(Debug, Clone)]
pub struct ActionExecutor {
    gateway: Gateway,
    in_flight: SlotSet,
}

/// Releases a slot when the action finishes, however it finishes.
struct SlotGuard {
    slots: SlotSet,
    slot: ActionSlot,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.slot);
    }
}

impl ActionExecutor {
    /// Create an executor sending through `gateway`.
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            in_flight: Arc::default(),
        }
    }

    /// Whether an action is running in `slot`.
    #[must_use]
    pub fn is_in_flight(&self, slot: &ActionSlot) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(slot)
    }

    fn claim(&self, slot: ActionSlot) -> Result<SlotGuard, ActionError> {
        let mut slots = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !slots.insert(slot.clone()) {
            return Err(ActionError::AlreadyInFlight(slot));
        }
        Ok(SlotGuard {
            slots: Arc::clone(&self.in_flight),
            slot,
        })
    }

    /// Send `action` without refreshing any list.
    ///
    /// Actions in different slots may run concurrently; each fails or
    /// succeeds on its own.
    ///
    /// # Errors
    ///
    /// - `ValidationRejected` if local checks fail (no request is sent) or
    ///   the server declines
    /// - `AlreadyInFlight` if the same slot is busy
    /// - `Unauthenticated` / `RequestFailed` from the gateway
    #[instrument(skip(self, action), fields(kind = %action.kind(), target = ?action.target()))]
    pub async fn perform<A: ResourceAction>(&self, action: &A) -> Result<ActionReceipt, ActionError> {
        action.validate()?;
        let body = action.body()?;
        let slot = ActionSlot::of(action);
        let _guard = self.claim(slot.clone())?;

        let response = self
            .gateway
            .call(action.method(), &action.path(), body.as_ref())
            .await
            .map_err(|e| {
                warn!(error = %e, "Action failed");
                ActionError::from(e)
            })?;

        let message = response
            .get("message")
            .and_then(Value::as_str)
            .map(String::from);
        info!(message = ?message, "Action completed");

        Ok(ActionReceipt {
            slot,
            message,
            refreshed: false,
        })
    }

    /// Send `action`, then refresh `controller` once.
    ///
    /// A failed refresh does not undo the action; it is reported through
    /// the controller's state and [`ActionReceipt::refreshed`].
    ///
    /// # Errors
    ///
    /// Same as [`ActionExecutor::perform`]. On error the controller is not
    /// touched.
    pub async fn execute<R, S>(
        &self,
        controller: &mut ListController<R, S>,
        action: &R::Action,
    ) -> Result<ActionReceipt, ActionError>
    where
        R: Resource,
        S: ListSource<R>,
    {
        let mut receipt = self.perform(action).await?;
        match controller.refresh().await {
            Ok(()) => receipt.refreshed = true,
            Err(e) => warn!(resource = R::NAME, error = %e, "Refresh after action failed"),
        }
        Ok(receipt)
    }
}
