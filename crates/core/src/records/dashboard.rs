//! Figures for the dashboard screen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Amount, UserId};

/// Response body of `admin/dashboard/stats` (under `dashboardStats`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub users: UserStats,
    pub games: GameStats,
    pub finance: FinanceTotals,
    #[serde(default)]
    pub user_growth: Vec<MonthlyGrowth>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: u64,
    #[serde(default)]
    pub playing: u64,
    #[serde(default)]
    pub not_playing: u64,
    #[serde(default)]
    pub recent_users: Vec<RecentUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub color_prediction: GameShare,
    pub number_prediction: GameShare,
    #[serde(default)]
    pub most_played: String,
}

/// Play count of one game and its share of all plays (pre-formatted, e.g. `"62.5"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameShare {
    pub count: u64,
    pub percentage: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceTotals {
    pub total_deposits: Amount,
    pub total_withdrawals: Amount,
    pub revenue: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyGrowth {
    pub count: u64,
    pub year: i32,
    pub month: u32,
    pub month_name: String,
}

/// Response body of `admin/dashboard/financial-overview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialOverview {
    pub period: ReportingPeriod,
    pub overview: OverviewFigures,
    #[serde(default)]
    pub daily_transactions: Vec<DailyTransactions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub from: String,
    pub to: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewFigures {
    pub total_deposits: Amount,
    pub deposit_count: u64,
    pub total_withdrawals: Amount,
    pub withdrawal_count: u64,
    pub net_revenue: Amount,
    pub profit_margin: String,
}

/// Per-day ledger totals; `day` is the aggregation key (`YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTransactions {
    #[serde(rename = "_id")]
    pub day: String,
    pub transactions: Vec<DailyTotal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    #[serde(rename = "type")]
    pub kind: String,
    pub total: Amount,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_financial_overview_deserializes() {
        let json = r#"{
            "period": { "from": "2025-03-01", "to": "2025-03-31", "label": "March 2025" },
            "overview": {
                "totalDeposits": 50000,
                "depositCount": 120,
                "totalWithdrawals": 20000,
                "withdrawalCount": 45,
                "netRevenue": 30000,
                "profitMargin": "60.00"
            },
            "dailyTransactions": [
                { "_id": "2025-03-01", "transactions": [ { "type": "recharge", "total": 1500 } ] }
            ]
        }"#;

        let overview: FinancialOverview = serde_json::from_str(json).unwrap();
        assert_eq!(overview.overview.deposit_count, 120);
        assert_eq!(overview.daily_transactions[0].transactions[0].kind, "recharge");
    }
}
