//! Landing-page figures.

use serde::Deserialize;
use tracing::instrument;

use utpfund_core::{DashboardStats, FinancialOverview};

use crate::gateway::{Gateway, GatewayError};

const STATS_PATH: &str = "admin/dashboard/stats";
const FINANCIAL_OVERVIEW_PATH: &str = "admin/dashboard/financial-overview";

/// Everything the dashboard shows.
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// User, game and finance totals.
    pub stats: DashboardStats,
    /// Current period's deposits, withdrawals and margin.
    pub financial: FinancialOverview,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsEnvelope {
    dashboard_stats: DashboardStats,
}

/// Loads the dashboard through the gateway.
#[derive(Debug, Clone)]
pub struct DashboardService {
    gateway: Gateway,
}

impl DashboardService {
    /// Create a service over `gateway`.
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Fetch user, game and finance statistics.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the call fails or the payload is malformed.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats, GatewayError> {
        let envelope: StatsEnvelope = self.gateway.get(STATS_PATH).await?;
        Ok(envelope.dashboard_stats)
    }

    /// Fetch the reporting-period financial overview.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the call fails or the payload is malformed.
    #[instrument(skip(self))]
    pub async fn financial_overview(&self) -> Result<FinancialOverview, GatewayError> {
        self.gateway.get(FINANCIAL_OVERVIEW_PATH).await
    }

    /// Fetch both halves of the dashboard, stats first.
    ///
    /// # Errors
    ///
    /// Returns the first failure; a 401 on either call signs the admin out.
    pub async fn load(&self) -> Result<Dashboard, GatewayError> {
        let stats = self.stats().await?;
        let financial = self.financial_overview().await?;
        Ok(Dashboard { stats, financial })
    }
}
