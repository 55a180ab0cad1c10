//! Deposit and withdrawal requests.

use std::io::Write;

use utpfund_admin::ActionReceipt;
use utpfund_admin::actions::{DepositAction, WithdrawalAction};
use utpfund_core::{DepositRequest, DepositRequestId, RequestStatus, Withdrawal, WithdrawalId};

use super::{Console, ListQuery};
use crate::error::CliError;
use crate::output::write_view;

/// List deposit requests.
///
/// # Errors
///
/// Returns an error if the fetch fails.
pub async fn list_deposits(
    console: &Console,
    out: &mut impl Write,
    status: Option<RequestStatus>,
    query: &ListQuery,
) -> Result<(), CliError> {
    let list = console.load::<DepositRequest>(status, query).await?;
    write_view(
        out,
        &list.view(),
        &["ID", "User", "Email", "Amount", "Status", "Requested"],
        |d| {
            vec![
                d.id.to_string(),
                d.user.name.clone(),
                d.user.email.clone(),
                d.amount.to_string(),
                d.status.to_string(),
                d.request_date.format("%Y-%m-%d %H:%M").to_string(),
            ]
        },
    )?;
    Ok(())
}

/// List withdrawal requests.
///
/// # Errors
///
/// Returns an error if the fetch fails.
pub async fn list_withdrawals(
    console: &Console,
    out: &mut impl Write,
    status: Option<RequestStatus>,
    query: &ListQuery,
) -> Result<(), CliError> {
    let list = console.load::<Withdrawal>(status, query).await?;
    write_view(
        out,
        &list.view(),
        &["ID", "User", "Email", "Amount", "UPI", "Status", "Requested"],
        |w| {
            vec![
                w.id.to_string(),
                w.user_name.clone(),
                w.user_email.clone(),
                w.amount.to_string(),
                w.upi_id.clone(),
                w.status.to_string(),
                w.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        },
    )?;
    Ok(())
}

/// Approve a deposit.
///
/// # Errors
///
/// Returns the action failure; nothing is refreshed in that case.
pub async fn approve_deposit(
    console: &Console,
    out: &mut impl Write,
    id: &str,
    remarks: Option<String>,
) -> Result<(), CliError> {
    let id = DepositRequestId::new(id);
    let action = DepositAction::Approve {
        id: id.clone(),
        remarks,
    };
    decide_deposit(console, out, &id, &action).await
}

/// Reject a deposit.
///
/// # Errors
///
/// Returns the action failure; nothing is refreshed in that case.
pub async fn reject_deposit(
    console: &Console,
    out: &mut impl Write,
    id: &str,
    reason: Option<String>,
) -> Result<(), CliError> {
    let id = DepositRequestId::new(id);
    let action = DepositAction::Reject {
        id: id.clone(),
        reason,
    };
    decide_deposit(console, out, &id, &action).await
}

async fn decide_deposit(
    console: &Console,
    out: &mut impl Write,
    id: &DepositRequestId,
    action: &DepositAction,
) -> Result<(), CliError> {
    let mut list = console.list::<DepositRequest>();
    let receipt = console.executor().execute(&mut list, action).await?;
    let status = list
        .items()
        .iter()
        .find(|d| &d.id == id)
        .map(|d| d.status);
    write_receipt(out, &receipt, status)
}

/// Approve a withdrawal.
///
/// # Errors
///
/// Returns the action failure; nothing is refreshed in that case.
pub async fn approve_withdrawal(
    console: &Console,
    out: &mut impl Write,
    id: &str,
    remarks: Option<String>,
) -> Result<(), CliError> {
    let id = WithdrawalId::new(id);
    let action = WithdrawalAction::Approve {
        id: id.clone(),
        remarks,
    };
    decide_withdrawal(console, out, &id, &action).await
}

/// Reject a withdrawal. An empty reason is refused before any request.
///
/// # Errors
///
/// Returns the action failure; nothing is refreshed in that case.
pub async fn reject_withdrawal(
    console: &Console,
    out: &mut impl Write,
    id: &str,
    reason: Option<String>,
) -> Result<(), CliError> {
    let id = WithdrawalId::new(id);
    let action = WithdrawalAction::Reject {
        id: id.clone(),
        reason: reason.unwrap_or_default(),
    };
    decide_withdrawal(console, out, &id, &action).await
}

async fn decide_withdrawal(
    console: &Console,
    out: &mut impl Write,
    id: &WithdrawalId,
    action: &WithdrawalAction,
) -> Result<(), CliError> {
    let mut list = console.list::<Withdrawal>();
    let receipt = console.executor().execute(&mut list, action).await?;
    let status = list
        .items()
        .iter()
        .find(|w| &w.id == id)
        .map(|w| w.status);
    write_receipt(out, &receipt, status)
}

/// Confirmation line plus the request's state after the refresh.
fn write_receipt(
    out: &mut impl Write,
    receipt: &ActionReceipt,
    status: Option<RequestStatus>,
) -> Result<(), CliError> {
    match &receipt.message {
        Some(message) => writeln!(out, "{}: {message}", receipt.slot)?,
        None => writeln!(out, "{}: done", receipt.slot)?,
    }
    match (receipt.refreshed, status) {
        (true, Some(status)) => writeln!(out, "Now {status}")?,
        (true, None) => {}
        (false, _) => writeln!(out, "! The list could not be refreshed")?,
    }
    Ok(())
}
