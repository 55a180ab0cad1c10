//! Command implementations.
//!
//! Every command opens the persisted session, talks to the platform through
//! one [`Gateway`], and writes its result to the given output.

pub mod ledger;
pub mod requests;
pub mod rooms;
pub mod session;

use utpfund_admin::session::FileSessionStorage;
use utpfund_admin::{
    ActionExecutor, ConsoleConfig, ConsoleError, Gateway, ListController, Resource, SessionStore,
    StatusFilter,
};

use crate::error::CliError;

/// Search text and page requested on the command line.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub search: String,
    pub page: usize,
}

/// Shared handles for one command run.
#[derive(Debug, Clone)]
pub struct Console {
    config: ConsoleConfig,
    gateway: Gateway,
    executor: ActionExecutor,
}

impl Console {
    /// Open the session file and build the gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be read or the HTTP client
    /// cannot be built.
    pub fn open(config: ConsoleConfig) -> Result<Self, CliError> {
        let session = SessionStore::open(FileSessionStorage::new(config.session_file.clone()))?;
        let gateway = Gateway::new(&config.api, session).map_err(ConsoleError::from)?;
        let executor = ActionExecutor::new(gateway.clone());
        Ok(Self {
            config,
            gateway,
            executor,
        })
    }

    pub const fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub const fn executor(&self) -> &ActionExecutor {
        &self.executor
    }

    /// An empty list screen for `R` using the configured page size.
    pub fn list<R: Resource>(&self) -> ListController<R, Gateway> {
        ListController::new(self.gateway.clone()).with_page_size(self.config.page_size)
    }

    /// Fetch `R` and apply the status filter, search and page.
    ///
    /// # Errors
    ///
    /// Returns the gateway error if the fetch fails.
    pub async fn load<R: Resource>(
        &self,
        status: Option<R::Status>,
        query: &ListQuery,
    ) -> Result<ListController<R, Gateway>, CliError> {
        let mut list = self.list::<R>();
        list.initialize().await?;
        list.set_status_filter(status.map_or(StatusFilter::All, StatusFilter::Only));
        list.set_search_query(query.search.as_str());
        list.set_page(query.page);
        Ok(list)
    }
}
