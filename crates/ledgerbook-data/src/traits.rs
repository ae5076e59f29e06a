//! Repository traits for dependency injection and testing

use async_trait::async_trait;

use crate::error::DatabaseResult;
use crate::filters::{
    AccountFilter, ClientFilter, CostCenterFilter, LedgerEntryFilter, SaleFilter,
};
use crate::models::{
    Account, AccountUpdate, Client, ClientUpdate, CostCenter, LedgerEntry, LedgerEntryUpdate,
    NewAccount, NewClient, NewLedgerEntry, NewSale, Sale,
};

/// Client persistence operations
#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn list(&self) -> DatabaseResult<Vec<Client>>;

    async fn get(&self, id: i32) -> DatabaseResult<Option<Client>>;

    /// Exact lookup by tax identifier (used for uniqueness checks)
    async fn get_by_tax_id(&self, tax_id: &str) -> DatabaseResult<Option<Client>>;

    /// Exact lookup by email (used for uniqueness checks)
    async fn get_by_email(&self, email: &str) -> DatabaseResult<Option<Client>>;

    async fn create(&self, new: NewClient) -> DatabaseResult<Client>;

    /// Apply an update; `None` when the client does not exist
    async fn update(&self, id: i32, update: ClientUpdate) -> DatabaseResult<Option<Client>>;

    /// Delete by id; `false` when nothing was deleted
    async fn delete(&self, id: i32) -> DatabaseResult<bool>;

    /// One page of matches plus the total match count (pre-pagination)
    async fn search_paged(&self, filter: &ClientFilter) -> DatabaseResult<(Vec<Client>, i64)>;
}

/// Account persistence operations
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn list(&self) -> DatabaseResult<Vec<Account>>;

    async fn get(&self, id: i32) -> DatabaseResult<Option<Account>>;

    /// Whether an account with this name exists, optionally ignoring one id
    async fn exists_by_name(&self, name: &str, exclude_id: Option<i32>) -> DatabaseResult<bool>;

    async fn create(&self, new: NewAccount) -> DatabaseResult<Account>;

    async fn update(&self, id: i32, update: AccountUpdate) -> DatabaseResult<Option<Account>>;

    async fn delete(&self, id: i32) -> DatabaseResult<bool>;

    async fn search_paged(&self, filter: &AccountFilter) -> DatabaseResult<(Vec<Account>, i64)>;
}

/// Cost center persistence operations
#[async_trait]
pub trait CostCenterRepository: Send + Sync {
    async fn list(&self) -> DatabaseResult<Vec<CostCenter>>;

    async fn get(&self, id: i32) -> DatabaseResult<Option<CostCenter>>;

    async fn create(&self, name: String) -> DatabaseResult<CostCenter>;

    async fn update(&self, id: i32, name: String) -> DatabaseResult<Option<CostCenter>>;

    async fn delete(&self, id: i32) -> DatabaseResult<bool>;

    async fn search_paged(
        &self,
        filter: &CostCenterFilter,
    ) -> DatabaseResult<(Vec<CostCenter>, i64)>;
}

/// Ledger entry persistence operations
#[async_trait]
pub trait LedgerEntryRepository: Send + Sync {
    async fn list(&self) -> DatabaseResult<Vec<LedgerEntry>>;

    async fn get(&self, id: i32) -> DatabaseResult<Option<LedgerEntry>>;

    async fn create(&self, new: NewLedgerEntry) -> DatabaseResult<LedgerEntry>;

    /// Apply an update and stamp `updated_at`; `None` when missing
    async fn update(
        &self,
        id: i32,
        update: LedgerEntryUpdate,
    ) -> DatabaseResult<Option<LedgerEntry>>;

    async fn delete(&self, id: i32) -> DatabaseResult<bool>;

    async fn search_paged(
        &self,
        filter: &LedgerEntryFilter,
    ) -> DatabaseResult<(Vec<LedgerEntry>, i64)>;
}

/// Sale persistence operations
#[async_trait]
pub trait SaleRepository: Send + Sync {
    async fn list(&self) -> DatabaseResult<Vec<Sale>>;

    async fn get(&self, id: i32) -> DatabaseResult<Option<Sale>>;

    async fn create(&self, new: NewSale) -> DatabaseResult<Sale>;

    async fn update(&self, id: i32, update: NewSale) -> DatabaseResult<Option<Sale>>;

    async fn delete(&self, id: i32) -> DatabaseResult<bool>;

    async fn search_paged(&self, filter: &SaleFilter) -> DatabaseResult<(Vec<Sale>, i64)>;
}
