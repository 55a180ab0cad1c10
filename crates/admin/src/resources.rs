//! Per-screen list configuration.
//!
//! Each record the console lists implements [`Resource`]: where to fetch it,
//! which status it is filtered by, which fields the search box looks at, and
//! which admin actions apply to it.

use std::convert::Infallible;
use std::fmt;

use serde::de::DeserializeOwned;

use utpfund_core::{
    ColorRoom, Customer, DepositRequest, NumberRoom, RequestStatus, RoomStatus, Transaction,
    TransactionType, Withdrawal,
};

use crate::actions::{
    ColorRoomAction, DepositAction, NoActions, NumberRoomAction, ResourceAction, WithdrawalAction,
};
use crate::gateway::Gateway;
use crate::list::ListController;

/// A record type with its own list screen.
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    /// Value the status filter compares against.
    type Status: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Admin actions available on this record type.
    type Action: ResourceAction;

    /// Plural, lowercase name used in messages and logs.
    const NAME: &'static str;

    /// API path of the list endpoint.
    const LIST_PATH: &'static str;

    /// Key of the array inside the list response.
    const COLLECTION_KEY: &'static str;

    /// Values offered by the status filter, in display order.
    const STATUS_VALUES: &'static [Self::Status];

    /// This record's status, if it has one.
    fn status(&self) -> Option<Self::Status>;

    /// Fields the search query is matched against.
    fn search_fields(&self) -> Vec<&str>;
}

impl Resource for Customer {
    type Status = Infallible;
    type Action = NoActions;

    const NAME: &'static str = "customers";
    const LIST_PATH: &'static str = "admin/users";
    const COLLECTION_KEY: &'static str = "users";
    const STATUS_VALUES: &'static [Infallible] = &[];

    fn status(&self) -> Option<Infallible> {
        None
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }
}

impl Resource for DepositRequest {
    type Status = RequestStatus;
    type Action = DepositAction;

    const NAME: &'static str = "deposit requests";
    const LIST_PATH: &'static str = "admin/deposit-requests";
    const COLLECTION_KEY: &'static str = "depositRequests";
    const STATUS_VALUES: &'static [RequestStatus] = RequestStatus::ALL;

    fn status(&self) -> Option<RequestStatus> {
        Some(self.status)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.user.name.as_str(), self.user.email.as_str()]
    }
}

impl Resource for Withdrawal {
    type Status = RequestStatus;
    type Action = WithdrawalAction;

    const NAME: &'static str = "withdrawal requests";
    const LIST_PATH: &'static str = "admin/withdrawals";
    const COLLECTION_KEY: &'static str = "withdrawals";
    const STATUS_VALUES: &'static [RequestStatus] = RequestStatus::ALL;

    fn status(&self) -> Option<RequestStatus> {
        Some(self.status)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.user_name.as_str(), self.user_email.as_str()]
    }
}

impl Resource for Transaction {
    type Status = TransactionType;
    type Action = NoActions;

    const NAME: &'static str = "transactions";
    const LIST_PATH: &'static str = "admin/transactions";
    const COLLECTION_KEY: &'static str = "transactions";
    const STATUS_VALUES: &'static [TransactionType] = TransactionType::ALL;

    fn status(&self) -> Option<TransactionType> {
        Some(self.kind)
    }

    fn search_fields(&self) -> Vec<&str> {
        self.user
            .as_ref()
            .map(|user| vec![user.name.as_str(), user.email.as_str()])
            .unwrap_or_default()
    }
}

impl Resource for ColorRoom {
    type Status = RoomStatus;
    type Action = ColorRoomAction;

    const NAME: &'static str = "color game rooms";
    const LIST_PATH: &'static str = "admin/game/rooms";
    const COLLECTION_KEY: &'static str = "gameRooms";
    const STATUS_VALUES: &'static [RoomStatus] = RoomStatus::ALL;

    fn status(&self) -> Option<RoomStatus> {
        Some(self.status)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.room_id.as_str()]
    }
}

impl Resource for NumberRoom {
    type Status = RoomStatus;
    type Action = NumberRoomAction;

    const NAME: &'static str = "number game rooms";
    const LIST_PATH: &'static str = "admin/number-game/rooms";
    const COLLECTION_KEY: &'static str = "gameRooms";
    const STATUS_VALUES: &'static [RoomStatus] = RoomStatus::ALL;

    fn status(&self) -> Option<RoomStatus> {
        Some(self.status)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.room_id.as_str()]
    }
}

/// Customers screen.
pub type CustomerList = ListController<Customer, Gateway>;
/// Deposit approvals screen.
pub type DepositList = ListController<DepositRequest, Gateway>;
/// Withdrawal approvals screen.
pub type WithdrawalList = ListController<Withdrawal, Gateway>;
/// Revenue screen.
pub type TransactionList = ListController<Transaction, Gateway>;
/// Color game rooms screen.
pub type ColorRoomList = ListController<ColorRoom, Gateway>;
/// Number game rooms screen.
pub type NumberRoomList = ListController<NumberRoom, Gateway>;
