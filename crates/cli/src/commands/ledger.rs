//! Dashboard, customers and the transaction ledger.

use std::io::Write;

use utpfund_admin::services::{DashboardService, RevenueSummary};
use utpfund_core::{Customer, Transaction, TransactionType};

use super::{Console, ListQuery};
use crate::error::CliError;
use crate::output::{Table, write_view};

/// Print platform statistics and the financial overview.
///
/// # Errors
///
/// Returns an error if either dashboard call fails.
pub async fn dashboard(console: &Console, out: &mut impl Write) -> Result<(), CliError> {
    let dashboard = DashboardService::new(console.gateway().clone()).load().await?;
    let stats = &dashboard.stats;
    let overview = &dashboard.financial.overview;

    writeln!(
        out,
        "Users: {} total, {} playing, {} not playing",
        stats.users.total, stats.users.playing, stats.users.not_playing
    )?;
    writeln!(
        out,
        "Games: color {} ({}%), number {} ({}%), most played: {}",
        stats.games.color_prediction.count,
        stats.games.color_prediction.percentage,
        stats.games.number_prediction.count,
        stats.games.number_prediction.percentage,
        stats.games.most_played
    )?;
    writeln!(
        out,
        "Totals: deposits {}, withdrawals {}, revenue {}",
        stats.finance.total_deposits, stats.finance.total_withdrawals, stats.finance.revenue
    )?;

    writeln!(out)?;
    writeln!(out, "{}", dashboard.financial.period.label)?;
    writeln!(
        out,
        "  deposits    {} ({})",
        overview.total_deposits, overview.deposit_count
    )?;
    writeln!(
        out,
        "  withdrawals {} ({})",
        overview.total_withdrawals, overview.withdrawal_count
    )?;
    writeln!(
        out,
        "  net         {} (margin {}%)",
        overview.net_revenue, overview.profit_margin
    )?;

    if !stats.users.recent_users.is_empty() {
        writeln!(out)?;
        let mut table = Table::new(&["Recent user", "Email", "Joined"]);
        for user in &stats.users.recent_users {
            table.push(vec![
                user.name.clone(),
                user.email.clone(),
                user.created_at.format("%Y-%m-%d").to_string(),
            ]);
        }
        table.write_to(out)?;
    }
    Ok(())
}

/// List customers.
///
/// # Errors
///
/// Returns an error if the fetch fails.
pub async fn customers(
    console: &Console,
    out: &mut impl Write,
    query: &ListQuery,
) -> Result<(), CliError> {
    let list = console.load::<Customer>(None, query).await?;
    write_view(
        out,
        &list.view(),
        &["ID", "Name", "Email", "Normal", "Benefit", "Game", "Joined"],
        |c| {
            vec![
                c.id.to_string(),
                c.name.clone(),
                c.email.clone(),
                c.wallet.normal.to_string(),
                c.wallet.benefit.to_string(),
                c.wallet.game.to_string(),
                c.created_at.format("%Y-%m-%d").to_string(),
            ]
        },
    )?;
    Ok(())
}

/// List ledger entries.
///
/// # Errors
///
/// Returns an error if the fetch fails.
pub async fn transactions(
    console: &Console,
    out: &mut impl Write,
    kind: Option<TransactionType>,
    query: &ListQuery,
) -> Result<(), CliError> {
    let list = console.load::<Transaction>(kind, query).await?;
    write_view(
        out,
        &list.view(),
        &["ID", "User", "Type", "Amount", "Wallet", "Status", "Date"],
        |t| {
            vec![
                t.id.to_string(),
                t.user.as_ref().map(|u| u.name.clone()).unwrap_or_default(),
                t.kind.to_string(),
                t.amount.to_string(),
                t.wallet_type.clone(),
                t.status.to_string(),
                t.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        },
    )?;
    Ok(())
}

/// Revenue totals over every entry that passes the filter and search.
///
/// # Errors
///
/// Returns an error if the fetch fails.
pub async fn summary(
    console: &Console,
    out: &mut impl Write,
    kind: Option<TransactionType>,
    search: Option<String>,
) -> Result<(), CliError> {
    let query = ListQuery {
        search: search.unwrap_or_default(),
        page: 1,
    };
    let list = console.load::<Transaction>(kind, &query).await?;
    let matching = list.filtered_items();
    let totals = RevenueSummary::from_transactions(matching.iter().copied());

    writeln!(out, "Entries:     {}", matching.len())?;
    writeln!(out, "Revenue:     {}", totals.revenue)?;
    writeln!(out, "Withdrawals: {}", totals.withdrawals)?;
    writeln!(out, "Net:         {}", totals.net)?;
    Ok(())
}
