//! Revenue totals over a set of ledger entries.

use utpfund_core::{Amount, Transaction, TransactionType};

/// Recharge income against withdrawal payouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevenueSummary {
    /// Sum of recharge amounts.
    pub revenue: Amount,
    /// Sum of withdrawal amounts, as a positive figure.
    pub withdrawals: Amount,
    /// `revenue - withdrawals`.
    pub net: Amount,
}

impl RevenueSummary {
    /// Totals over `transactions`; other entry types are ignored.
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let (revenue, withdrawals) =
            transactions
                .into_iter()
                .fold((Amount::ZERO, Amount::ZERO), |(revenue, withdrawals), tx| {
                    match tx.kind {
                        TransactionType::Recharge => (revenue + tx.amount, withdrawals),
                        TransactionType::Withdrawal => (revenue, withdrawals + tx.amount.abs()),
                        _ => (revenue, withdrawals),
                    }
                });

        Self {
            revenue,
            withdrawals,
            net: revenue - withdrawals,
        }
    }
}
