//! List screens and read-only services against the mock API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use serde_json::json;
use utpfund_admin::services::{DashboardService, RevenueSummary};
use utpfund_admin::{GatewayError, ListController, LoadState, StatusFilter};
use utpfund_core::{Amount, DepositRequest, RequestStatus, Transaction, TransactionType, Withdrawal};
use utpfund_integration_tests::{
    MockApi, MockState, deposit, orphan_transaction, session_with, transaction, withdrawal,
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

#[tokio::test]
async fn test_pending_deposits_fit_one_page() {
    let deposits = (1..=23)
        .map(|n| {
            let mut d = deposit(&format!("d{n}"), &format!("Player {n}"), 100 * n);
            if n % 3 != 0 {
                d["status"] = json!("approved");
            }
            d
        })
        .collect();
    let api = mock(MockState {
        deposits,
        ..MockState::default()
    })
    .await;
    let mut list: ListController<DepositRequest, _> =
        ListController::new(api.gateway(session_with(TOKEN).unwrap()).unwrap());

    list.initialize().await.unwrap();
    list.set_status_filter(StatusFilter::Only(RequestStatus::Pending));

    let view = list.view();
    assert_eq!(view.filtered_count, 7);
    assert_eq!(view.total_count, 23);
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.rows.len(), 7);
    assert!(view.rows.iter().all(|d| d.status == RequestStatus::Pending));
}

#[tokio::test]
async fn test_withdrawal_pages_clamp_to_last() {
    let withdrawals = (1..=25)
        .map(|n| withdrawal(&format!("w{n}"), &format!("Player {n}"), 10 * n))
        .collect();
    let api = mock(MockState {
        withdrawals,
        ..MockState::default()
    })
    .await;
    let mut list: ListController<Withdrawal, _> =
        ListController::new(api.gateway(session_with(TOKEN).unwrap()).unwrap());
    list.initialize().await.unwrap();

    assert_eq!(list.total_pages(), 3);
    assert_eq!(list.set_page(4), 3);

    let view = list.view();
    assert_eq!(view.rows.len(), 5);
    assert_eq!(view.first_row, 21);
    assert_eq!(view.last_row, 25);
    assert_eq!(view.rows[0].id.as_str(), "w21");
    assert!(!view.has_next());
}

#[tokio::test]
async fn test_search_matches_user_name_and_email() {
    let api = mock(MockState {
        withdrawals: vec![
            withdrawal("w1", "John Smith", 100),
            withdrawal("w2", "Johnny Appleseed", 200),
            withdrawal("w3", "Jane Doe", 300),
        ],
        ..MockState::default()
    })
    .await;
    let mut list: ListController<Withdrawal, _> =
        ListController::new(api.gateway(session_with(TOKEN).unwrap()).unwrap());
    list.initialize().await.unwrap();

    list.set_search_query("JOHN");
    let names: Vec<&str> = list
        .filtered_items()
        .iter()
        .map(|w| w.user_name.as_str())
        .collect();
    assert_eq!(names, ["John Smith", "Johnny Appleseed"]);

    list.set_search_query("jane.doe@");
    assert_eq!(list.filtered_items().len(), 1);

    list.set_search_query("(unclosed");
    assert!(list.filtered_items().is_empty());
    assert_eq!(*list.state(), LoadState::Loaded);
}

#[tokio::test]
async fn test_server_error_is_reported_on_screen() {
    // No handler for customers: the mock answers 404
    let api = mock(MockState::default()).await;
    let mut list: ListController<utpfund_core::Customer, _> =
        ListController::new(api.gateway(session_with(TOKEN).unwrap()).unwrap());

    let err = list.initialize().await.unwrap_err();

    assert!(matches!(err, GatewayError::RequestFailed(_)));
    assert!(list.error().unwrap().starts_with("Failed to fetch customers: "));
    assert!(list.items().is_empty());
}

#[tokio::test]
async fn test_revenue_summary_over_filtered_ledger() {
    let api = mock(MockState {
        transactions: vec![
            transaction("t1", "recharge", 1000),
            transaction("t2", "recharge", 500),
            transaction("t3", "withdrawal", -300),
            transaction("t4", "bonus", 50),
        ],
        ..MockState::default()
    })
    .await;
    let mut list: ListController<Transaction, _> =
        ListController::new(api.gateway(session_with(TOKEN).unwrap()).unwrap());
    list.initialize().await.unwrap();

    let all = RevenueSummary::from_transactions(list.filtered_items());
    assert_eq!(all.revenue, Amount::from_rupees(1500));
    assert_eq!(all.withdrawals, Amount::from_rupees(300));
    assert_eq!(all.net, Amount::from_rupees(1200));

    list.set_status_filter(StatusFilter::Only(TransactionType::Withdrawal));
    let withdrawals_only = RevenueSummary::from_transactions(list.filtered_items());
    assert_eq!(withdrawals_only.revenue, Amount::ZERO);
    assert_eq!(withdrawals_only.net, Amount::from_rupees(-300));
}

#[tokio::test]
async fn test_ledger_loads_when_a_user_is_gone() {
    let api = mock(MockState {
        transactions: vec![
            transaction("t1", "recharge", 1000),
            orphan_transaction("t2", "recharge", 50),
            orphan_transaction("t3", "withdrawal", -20),
        ],
        ..MockState::default()
    })
    .await;
    let mut list: ListController<Transaction, _> =
        ListController::new(api.gateway(session_with(TOKEN).unwrap()).unwrap());

    list.initialize().await.unwrap();

    assert_eq!(*list.state(), LoadState::Loaded);
    assert_eq!(list.items().len(), 3);
    assert!(list.items()[1].user.is_none());

    let totals = RevenueSummary::from_transactions(list.filtered_items());
    assert_eq!(totals.revenue, Amount::from_rupees(1050));
    assert_eq!(totals.net, Amount::from_rupees(1030));

    // Entries without a user never match a name search
    list.set_search_query("asha");
    let ids: Vec<&str> = list.filtered_items().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["t1"]);
}

#[tokio::test]
async fn test_dashboard_loads_both_halves() {
    let api = mock(MockState::default()).await;
    let service = DashboardService::new(api.gateway(session_with(TOKEN).unwrap()).unwrap());

    let dashboard = service.load().await.unwrap();

    assert_eq!(dashboard.stats.users.total, 120);
    assert_eq!(dashboard.stats.users.recent_users.len(), 1);
    assert_eq!(dashboard.stats.games.most_played, "Color Prediction");
    assert_eq!(dashboard.stats.finance.revenue, Amount::from_rupees(30000));
    assert_eq!(dashboard.financial.period.label, "January 2025");
    assert_eq!(dashboard.financial.overview.deposit_count, 80);
}
