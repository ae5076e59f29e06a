//! Application state for Axum handlers
//!
//! Holds one repository handle per entity behind trait objects, so the
//! same router serves real `PostgreSQL` repositories in production and
//! the in-memory mocks in tests. Initialized once at startup and cloned
//! into every handler.

use std::sync::Arc;

use ledgerbook_data::{
    AccountRepository, ClientRepository, CostCenterRepository, DataClient, LedgerEntryRepository,
    SaleRepository,
};

/// Application state containing all shared services
#[derive(Clone)]
pub struct AppState {
    pub clients: Arc<dyn ClientRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub cost_centers: Arc<dyn CostCenterRepository>,
    pub ledger_entries: Arc<dyn LedgerEntryRepository>,
    pub sales: Arc<dyn SaleRepository>,
    /// Base URL advertised in HATEOAS links
    pub base_url: String,
}

impl AppState {
    /// Wire the state up from explicit repositories (used by tests)
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        accounts: Arc<dyn AccountRepository>,
        cost_centers: Arc<dyn CostCenterRepository>,
        ledger_entries: Arc<dyn LedgerEntryRepository>,
        sales: Arc<dyn SaleRepository>,
        base_url: String,
    ) -> Self {
        Self {
            clients,
            accounts,
            cost_centers,
            ledger_entries,
            sales,
            base_url,
        }
    }

    /// Wire the state up from the database client
    pub fn from_data_client(data: &DataClient, base_url: String) -> Self {
        Self {
            clients: Arc::new(data.clients()),
            accounts: Arc::new(data.accounts()),
            cost_centers: Arc::new(data.cost_centers()),
            ledger_entries: Arc::new(data.ledger_entries()),
            sales: Arc::new(data.sales()),
            base_url,
        }
    }
}
