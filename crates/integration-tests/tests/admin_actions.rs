//! Approve/reject flows over HTTP: one mutating request, then one refetch.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use serde_json::json;
use utpfund_admin::actions::{DepositAction, WithdrawalAction};
use utpfund_admin::{ActionError, ActionExecutor, ListController, LoadState};
use utpfund_core::{DepositRequest, DepositRequestId, RequestStatus, Withdrawal, WithdrawalId};
use utpfund_integration_tests::{
    MockApi, MockState, RecordedAction, deposit, session_with, withdrawal,
};

const TOKEN: &str = "tok-live";

async fn mock(state: MockState) -> MockApi {
    MockApi::start(MockState {
        valid_token: Some(TOKEN.to_string()),
        ..state
    })
    .await
    .unwrap()
}

// =============================================================================
// Deposits
// =============================================================================

#[tokio::test]
async fn test_approving_deposit_refetches_once_and_shows_approved() {
    let api = mock(MockState {
        deposits: vec![
            deposit("d1", "Asha Rao", 500),
            deposit("d2", "Ravi Kumar", 1200),
        ],
        ..MockState::default()
    })
    .await;
    let gateway = api.gateway(session_with(TOKEN).unwrap()).unwrap();
    let executor = ActionExecutor::new(gateway.clone());
    let mut list: ListController<DepositRequest, _> = ListController::new(gateway);

    list.initialize().await.unwrap();
    assert_eq!(api.fetch_count("admin/deposit-requests"), 1);

    let receipt = executor
        .execute(
            &mut list,
            &DepositAction::Approve {
                id: DepositRequestId::new("d1"),
                remarks: None,
            },
        )
        .await
        .unwrap();

    assert!(receipt.refreshed);
    assert_eq!(
        receipt.message.as_deref(),
        Some("Deposit approved and wallet credited")
    );
    assert_eq!(api.fetch_count("admin/deposit-requests"), 2);

    let approved = list
        .items()
        .iter()
        .find(|d| d.id.as_str() == "d1")
        .unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);
    let untouched = list
        .items()
        .iter()
        .find(|d| d.id.as_str() == "d2")
        .unwrap();
    assert_eq!(untouched.status, RequestStatus::Pending);
}

#[tokio::test]
async fn test_deposit_remarks_are_sent() {
    let api = mock(MockState {
        deposits: vec![deposit("d1", "Asha Rao", 500)],
        ..MockState::default()
    })
    .await;
    let executor = ActionExecutor::new(api.gateway(session_with(TOKEN).unwrap()).unwrap());

    executor
        .perform(&DepositAction::Approve {
            id: DepositRequestId::new("d1"),
            remarks: Some("UTR 99120".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(
        api.state().actions,
        vec![RecordedAction {
            method: "POST".to_string(),
            path: "admin/deposit-request/d1/approve".to_string(),
            body: Some(json!({ "remarks": "UTR 99120" })),
        }]
    );
    // perform() never refreshes
    assert_eq!(api.fetch_count("admin/deposit-requests"), 0);
}

// =============================================================================
// Withdrawals
// =============================================================================

#[tokio::test]
async fn test_withdrawal_rejection_sends_reason() {
    let api = mock(MockState {
        withdrawals: vec![withdrawal("w1", "Asha Rao", 300)],
        ..MockState::default()
    })
    .await;
    let gateway = api.gateway(session_with(TOKEN).unwrap()).unwrap();
    let executor = ActionExecutor::new(gateway.clone());
    let mut list: ListController<Withdrawal, _> = ListController::new(gateway);

    executor
        .execute(
            &mut list,
            &WithdrawalAction::Reject {
                id: WithdrawalId::new("w1"),
                reason: "UPI ID does not match the account holder".to_string(),
            },
        )
        .await
        .unwrap();

    let state = api.state();
    assert_eq!(state.actions.len(), 1);
    assert_eq!(state.actions[0].path, "admin/withdrawal/w1/reject");
    assert_eq!(
        state.actions[0].body,
        Some(json!({ "reason": "UPI ID does not match the account holder" }))
    );
    drop(state);

    assert_eq!(list.items()[0].status, RequestStatus::Rejected);
}

#[tokio::test]
async fn test_withdrawal_rejection_without_reason_never_reaches_server() {
    let api = mock(MockState {
        withdrawals: vec![withdrawal("w1", "Asha Rao", 300)],
        ..MockState::default()
    })
    .await;
    let gateway = api.gateway(session_with(TOKEN).unwrap()).unwrap();
    let executor = ActionExecutor::new(gateway.clone());
    let mut list: ListController<Withdrawal, _> = ListController::new(gateway);
    list.initialize().await.unwrap();

    let err = executor
        .execute(
            &mut list,
            &WithdrawalAction::Reject {
                id: WithdrawalId::new("w1"),
                reason: "   ".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::ValidationRejected(_)));
    assert!(api.state().actions.is_empty());
    assert_eq!(api.fetch_count("admin/withdrawals"), 1);
}

#[tokio::test]
async fn test_declined_action_leaves_list_alone() {
    let mut processed = withdrawal("w1", "Asha Rao", 300);
    processed["status"] = json!("approved");
    let api = mock(MockState {
        withdrawals: vec![processed],
        ..MockState::default()
    })
    .await;
    let gateway = api.gateway(session_with(TOKEN).unwrap()).unwrap();
    let executor = ActionExecutor::new(gateway.clone());
    let mut list: ListController<Withdrawal, _> = ListController::new(gateway);
    list.initialize().await.unwrap();

    let err = executor
        .execute(
            &mut list,
            &WithdrawalAction::Approve {
                id: WithdrawalId::new("w1"),
                remarks: None,
            },
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ActionError::ValidationRejected("Request already processed".to_string())
    );
    assert_eq!(api.fetch_count("admin/withdrawals"), 1);
    assert_eq!(*list.state(), LoadState::Loaded);
}

#[tokio::test]
async fn test_concurrent_actions_on_different_requests() {
    let api = mock(MockState {
        withdrawals: vec![
            withdrawal("w1", "Asha Rao", 300),
            withdrawal("w2", "Ravi Kumar", 450),
        ],
        ..MockState::default()
    })
    .await;
    let executor = ActionExecutor::new(api.gateway(session_with(TOKEN).unwrap()).unwrap());

    let first = WithdrawalAction::Approve {
        id: WithdrawalId::new("w1"),
        remarks: None,
    };
    let second = WithdrawalAction::Approve {
        id: WithdrawalId::new("w2"),
        remarks: None,
    };
    let (a, b) = tokio::join!(executor.perform(&first), executor.perform(&second));

    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(api.state().actions.len(), 2);
}
