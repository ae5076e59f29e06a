//! Ledgerbook data layer for `PostgreSQL` state management

// Module declarations
pub mod client;
pub mod error;
pub mod filters;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod repository;
pub mod sort;
pub mod traits;

pub mod mock;

// Public exports
pub use client::DataClient;
pub use error::{DatabaseError, DatabaseErrorExt, DatabaseOperation, DatabaseResult};
pub use filters::{
    AccountFilter, ClientFilter, CostCenterFilter, FilterError, LedgerEntryFilter, SaleFilter,
};
pub use migrations::run_migrations;
pub use mock::{
    MockAccountRepository, MockClientRepository, MockCostCenterRepository,
    MockLedgerEntryRepository, MockSaleRepository,
};
pub use models::{
    Account, AccountKind, AccountUpdate, Client, ClientUpdate, CostCenter, LedgerEntry,
    LedgerEntryUpdate, NewAccount, NewClient, NewLedgerEntry, NewSale, Sale,
};
pub use pool::{create_pool, initialize_database};
pub use repository::{
    PgAccountRepository, PgClientRepository, PgCostCenterRepository, PgLedgerEntryRepository,
    PgSaleRepository,
};
pub use sort::{AccountSort, ClientSort, CostCenterSort, LedgerEntrySort, SaleSort};
pub use traits::{
    AccountRepository, ClientRepository, CostCenterRepository, LedgerEntryRepository,
    SaleRepository,
};
