//! Mock repositories for testing
//!
//! In-memory implementations of every repository trait. The search
//! paths replicate the SQL semantics exactly (case-sensitive substring
//! matches, inclusive ranges, enum-resolved sorting, offset/limit
//! pagination) so router tests can exercise the full search contract
//! without a database.

// Allow test-specific patterns in mock implementations
#![allow(clippy::unwrap_used)] // Mocks can panic on lock poisoning
#![allow(clippy::expect_used)] // Test code can use expect
#![allow(clippy::arithmetic_side_effects)] // Test counters can overflow
#![allow(clippy::cast_possible_truncation)] // Test-sized collections
#![allow(clippy::cast_sign_loss)] // Offsets are normalized non-negative

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use ledgerbook_search::{SearchRequest, SortOrder};

use crate::error::{DatabaseError, DatabaseOperation, DatabaseResult};
use crate::filters::{
    AccountFilter, ClientFilter, CostCenterFilter, LedgerEntryFilter, SaleFilter,
};
use crate::models::{
    Account, AccountUpdate, Client, ClientUpdate, CostCenter, LedgerEntry, LedgerEntryUpdate,
    NewAccount, NewClient, NewLedgerEntry, NewSale, Sale,
};
use crate::sort::{AccountSort, ClientSort, CostCenterSort, LedgerEntrySort, SaleSort};
use crate::traits::{
    AccountRepository, ClientRepository, CostCenterRepository, LedgerEntryRepository,
    SaleRepository,
};

/// Shared in-memory row store with failure injection
#[derive(Clone)]
struct MockStore<T> {
    rows: Arc<Mutex<Vec<T>>>,
    next_id: Arc<Mutex<i32>>,
    should_fail_next: Arc<Mutex<bool>>,
    error_message: Arc<Mutex<String>>,
}

impl<T: Clone> MockStore<T> {
    fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(Mutex::new(1)),
            should_fail_next: Arc::new(Mutex::new(false)),
            error_message: Arc::new(Mutex::new("Mock error".to_string())),
        }
    }

    fn seeded(rows: Vec<T>, next_id: i32) -> Self {
        let store = Self::new();
        *store.rows.lock().unwrap() = rows;
        *store.next_id.lock().unwrap() = next_id;
        store
    }

    fn fail_next(&self, message: &str) {
        *self.should_fail_next.lock().unwrap() = true;
        *self.error_message.lock().unwrap() = message.to_string();
    }

    fn check_fail(&self, entity: &'static str) -> DatabaseResult<()> {
        let mut should_fail = self.should_fail_next.lock().unwrap();
        if *should_fail {
            *should_fail = false;
            let message = self.error_message.lock().unwrap().clone();
            return Err(DatabaseError::UnexpectedState {
                operation: Box::new(DatabaseOperation::Query {
                    description: format!("mock {entity} operation"),
                }),
                message,
                correlation_id: None,
            });
        }
        Ok(())
    }

    fn alloc_id(&self) -> i32 {
        let mut next = self.next_id.lock().unwrap();
        let id = *next;
        *next += 1;
        id
    }

    fn snapshot(&self) -> Vec<T> {
        self.rows.lock().unwrap().clone()
    }

    fn with_rows<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        f(&mut self.rows.lock().unwrap())
    }
}

fn unique_violation(entity: &'static str, constraint: &str) -> DatabaseError {
    DatabaseError::UniqueViolation {
        constraint: constraint.to_string(),
        operation: Box::new(DatabaseOperation::Create { entity }),
        correlation_id: None,
    }
}

fn directed(ord: Ordering, order: SortOrder) -> Ordering {
    if order.is_descending() { ord.reverse() } else { ord }
}

/// Apply offset/limit over the already filtered + sorted matches
fn paginate<T>(matches: Vec<T>, search: &SearchRequest) -> (Vec<T>, i64) {
    let total = matches.len() as i64;
    let page = matches
        .into_iter()
        .skip(search.offset() as usize)
        .take(search.limit() as usize)
        .collect();
    (page, total)
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

/// In-memory client repository
#[derive(Clone)]
pub struct MockClientRepository {
    store: MockStore<Client>,
}

impl Default for MockClientRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClientRepository {
    pub fn new() -> Self {
        Self {
            store: MockStore::new(),
        }
    }

    /// Start with pre-existing rows; ids must already be assigned
    pub fn with_clients(clients: Vec<Client>) -> Self {
        let next_id = clients.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        Self {
            store: MockStore::seeded(clients, next_id),
        }
    }

    /// Configure the next operation to fail
    pub fn fail_next(&self, message: &str) {
        self.store.fail_next(message);
    }
}

fn matches_client(client: &Client, filter: &ClientFilter) -> bool {
    filter.name.as_ref().is_none_or(|n| client.name.contains(n.as_str()))
        && filter.tax_id.as_ref().is_none_or(|t| client.tax_id == *t)
        && filter.active.is_none_or(|a| client.active == a)
        && filter.email.as_ref().is_none_or(|e| client.email.contains(e.as_str()))
}

fn sort_clients(clients: &mut [Client], field: ClientSort, order: SortOrder) {
    clients.sort_by(|a, b| {
        let ord = match field {
            ClientSort::Name => a.name.cmp(&b.name),
            ClientSort::TaxId => a.tax_id.cmp(&b.tax_id),
            ClientSort::Email => a.email.cmp(&b.email),
            ClientSort::RegisteredAt => a.registered_at.cmp(&b.registered_at),
            ClientSort::Id => a.id.cmp(&b.id),
        };
        directed(ord, order)
    });
}

#[async_trait]
impl ClientRepository for MockClientRepository {
    async fn list(&self) -> DatabaseResult<Vec<Client>> {
        self.store.check_fail("client")?;
        let mut clients = self.store.snapshot();
        clients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(clients)
    }

    async fn get(&self, id: i32) -> DatabaseResult<Option<Client>> {
        self.store.check_fail("client")?;
        Ok(self.store.snapshot().into_iter().find(|c| c.id == id))
    }

    async fn get_by_tax_id(&self, tax_id: &str) -> DatabaseResult<Option<Client>> {
        self.store.check_fail("client")?;
        Ok(self.store.snapshot().into_iter().find(|c| c.tax_id == tax_id))
    }

    async fn get_by_email(&self, email: &str) -> DatabaseResult<Option<Client>> {
        self.store.check_fail("client")?;
        Ok(self.store.snapshot().into_iter().find(|c| c.email == email))
    }

    async fn create(&self, new: NewClient) -> DatabaseResult<Client> {
        self.store.check_fail("client")?;
        // Like a real sequence, the id is consumed even if the insert fails
        let id = self.store.alloc_id();
        self.store.with_rows(|rows| {
            if rows.iter().any(|c| c.tax_id == new.tax_id) {
                return Err(unique_violation("client", "clients_tax_id_key"));
            }
            if rows.iter().any(|c| c.email == new.email) {
                return Err(unique_violation("client", "clients_email_key"));
            }
            let client = Client {
                id,
                name: new.name,
                tax_id: new.tax_id,
                email: new.email,
                password: new.password,
                active: new.active,
                registered_at: Utc::now(),
            };
            rows.push(client.clone());
            Ok(client)
        })
    }

    async fn update(&self, id: i32, update: ClientUpdate) -> DatabaseResult<Option<Client>> {
        self.store.check_fail("client")?;
        self.store.with_rows(|rows| {
            if rows.iter().any(|c| c.email == update.email && c.id != id) {
                return Err(unique_violation("client", "clients_email_key"));
            }
            let Some(client) = rows.iter_mut().find(|c| c.id == id) else {
                return Ok(None);
            };
            client.name = update.name;
            client.email = update.email;
            client.active = update.active;
            Ok(Some(client.clone()))
        })
    }

    async fn delete(&self, id: i32) -> DatabaseResult<bool> {
        self.store.check_fail("client")?;
        Ok(self.store.with_rows(|rows| {
            let before = rows.len();
            rows.retain(|c| c.id != id);
            rows.len() < before
        }))
    }

    async fn search_paged(&self, filter: &ClientFilter) -> DatabaseResult<(Vec<Client>, i64)> {
        self.store.check_fail("client")?;
        let mut matches: Vec<Client> = self
            .store
            .snapshot()
            .into_iter()
            .filter(|c| matches_client(c, filter))
            .collect();

        let (field, order) =
            ClientSort::resolve(filter.search.sort_by.as_deref(), filter.search.sort_order());
        sort_clients(&mut matches, field, order);

        Ok(paginate(matches, &filter.search))
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// In-memory account repository
#[derive(Clone)]
pub struct MockAccountRepository {
    store: MockStore<Account>,
}

impl Default for MockAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAccountRepository {
    pub fn new() -> Self {
        Self {
            store: MockStore::new(),
        }
    }

    /// Start with pre-existing rows; ids must already be assigned
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        let next_id = accounts.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        Self {
            store: MockStore::seeded(accounts, next_id),
        }
    }

    /// Configure the next operation to fail
    pub fn fail_next(&self, message: &str) {
        self.store.fail_next(message);
    }
}

fn matches_account(account: &Account, filter: &AccountFilter) -> bool {
    filter.name.as_ref().is_none_or(|n| account.name.contains(n.as_str()))
        && filter.kind.is_none_or(|k| account.kind == k)
        && filter.client_id.is_none_or(|id| account.client_id == Some(id))
}

fn sort_accounts(accounts: &mut [Account], field: AccountSort, order: SortOrder) {
    accounts.sort_by(|a, b| {
        let ord = match field {
            AccountSort::Name => a.name.cmp(&b.name),
            AccountSort::Kind => a.kind.to_string().cmp(&b.kind.to_string()),
            AccountSort::Id => a.id.cmp(&b.id),
        };
        directed(ord, order)
    });
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn list(&self) -> DatabaseResult<Vec<Account>> {
        self.store.check_fail("account")?;
        let mut accounts = self.store.snapshot();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts)
    }

    async fn get(&self, id: i32) -> DatabaseResult<Option<Account>> {
        self.store.check_fail("account")?;
        Ok(self.store.snapshot().into_iter().find(|a| a.id == id))
    }

    async fn exists_by_name(&self, name: &str, exclude_id: Option<i32>) -> DatabaseResult<bool> {
        self.store.check_fail("account")?;
        Ok(self
            .store
            .snapshot()
            .iter()
            .any(|a| a.name == name && Some(a.id) != exclude_id))
    }

    async fn create(&self, new: NewAccount) -> DatabaseResult<Account> {
        self.store.check_fail("account")?;
        if self.store.snapshot().iter().any(|a| a.name == new.name) {
            return Err(unique_violation("account", "accounts_name_key"));
        }
        let account = Account {
            id: self.store.alloc_id(),
            name: new.name,
            kind: new.kind,
            client_id: new.client_id,
        };
        self.store.with_rows(|rows| rows.push(account.clone()));
        Ok(account)
    }

    async fn update(&self, id: i32, update: AccountUpdate) -> DatabaseResult<Option<Account>> {
        self.store.check_fail("account")?;
        self.store.with_rows(|rows| {
            if rows.iter().any(|a| a.name == update.name && a.id != id) {
                return Err(unique_violation("account", "accounts_name_key"));
            }
            let Some(account) = rows.iter_mut().find(|a| a.id == id) else {
                return Ok(None);
            };
            account.name = update.name;
            account.kind = update.kind;
            account.client_id = update.client_id;
            Ok(Some(account.clone()))
        })
    }

    async fn delete(&self, id: i32) -> DatabaseResult<bool> {
        self.store.check_fail("account")?;
        Ok(self.store.with_rows(|rows| {
            let before = rows.len();
            rows.retain(|a| a.id != id);
            rows.len() < before
        }))
    }

    async fn search_paged(&self, filter: &AccountFilter) -> DatabaseResult<(Vec<Account>, i64)> {
        self.store.check_fail("account")?;
        let mut matches: Vec<Account> = self
            .store
            .snapshot()
            .into_iter()
            .filter(|a| matches_account(a, filter))
            .collect();

        let (field, order) =
            AccountSort::resolve(filter.search.sort_by.as_deref(), filter.search.sort_order());
        sort_accounts(&mut matches, field, order);

        Ok(paginate(matches, &filter.search))
    }
}

// ---------------------------------------------------------------------------
// Cost centers
// ---------------------------------------------------------------------------

/// In-memory cost center repository
#[derive(Clone)]
pub struct MockCostCenterRepository {
    store: MockStore<CostCenter>,
}

impl Default for MockCostCenterRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCostCenterRepository {
    pub fn new() -> Self {
        Self {
            store: MockStore::new(),
        }
    }

    /// Start with pre-existing rows; ids must already be assigned
    pub fn with_cost_centers(cost_centers: Vec<CostCenter>) -> Self {
        let next_id = cost_centers.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        Self {
            store: MockStore::seeded(cost_centers, next_id),
        }
    }

    /// Configure the next operation to fail
    pub fn fail_next(&self, message: &str) {
        self.store.fail_next(message);
    }
}

#[async_trait]
impl CostCenterRepository for MockCostCenterRepository {
    async fn list(&self) -> DatabaseResult<Vec<CostCenter>> {
        self.store.check_fail("cost_center")?;
        let mut cost_centers = self.store.snapshot();
        cost_centers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cost_centers)
    }

    async fn get(&self, id: i32) -> DatabaseResult<Option<CostCenter>> {
        self.store.check_fail("cost_center")?;
        Ok(self.store.snapshot().into_iter().find(|c| c.id == id))
    }

    async fn create(&self, name: String) -> DatabaseResult<CostCenter> {
        self.store.check_fail("cost_center")?;
        let cost_center = CostCenter {
            id: self.store.alloc_id(),
            name,
        };
        self.store.with_rows(|rows| rows.push(cost_center.clone()));
        Ok(cost_center)
    }

    async fn update(&self, id: i32, name: String) -> DatabaseResult<Option<CostCenter>> {
        self.store.check_fail("cost_center")?;
        Ok(self.store.with_rows(|rows| {
            let cost_center = rows.iter_mut().find(|c| c.id == id)?;
            cost_center.name = name;
            Some(cost_center.clone())
        }))
    }

    async fn delete(&self, id: i32) -> DatabaseResult<bool> {
        self.store.check_fail("cost_center")?;
        Ok(self.store.with_rows(|rows| {
            let before = rows.len();
            rows.retain(|c| c.id != id);
            rows.len() < before
        }))
    }

    async fn search_paged(
        &self,
        filter: &CostCenterFilter,
    ) -> DatabaseResult<(Vec<CostCenter>, i64)> {
        self.store.check_fail("cost_center")?;
        let mut matches: Vec<CostCenter> = self
            .store
            .snapshot()
            .into_iter()
            .filter(|c| filter.name.as_ref().is_none_or(|n| c.name.contains(n.as_str())))
            .collect();

        let (field, order) = CostCenterSort::resolve(
            filter.search.sort_by.as_deref(),
            filter.search.sort_order(),
        );
        matches.sort_by(|a, b| {
            let ord = match field {
                CostCenterSort::Name => a.name.cmp(&b.name),
                CostCenterSort::Id => a.id.cmp(&b.id),
            };
            directed(ord, order)
        });

        Ok(paginate(matches, &filter.search))
    }
}

// ---------------------------------------------------------------------------
// Ledger entries
// ---------------------------------------------------------------------------

/// In-memory ledger entry repository
#[derive(Clone)]
pub struct MockLedgerEntryRepository {
    store: MockStore<LedgerEntry>,
}

impl Default for MockLedgerEntryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLedgerEntryRepository {
    pub fn new() -> Self {
        Self {
            store: MockStore::new(),
        }
    }

    /// Start with pre-existing rows; ids must already be assigned
    pub fn with_entries(entries: Vec<LedgerEntry>) -> Self {
        let next_id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        Self {
            store: MockStore::seeded(entries, next_id),
        }
    }

    /// Configure the next operation to fail
    pub fn fail_next(&self, message: &str) {
        self.store.fail_next(message);
    }
}

fn matches_entry(entry: &LedgerEntry, filter: &LedgerEntryFilter) -> bool {
    filter.amount_min.is_none_or(|min| entry.amount >= min)
        && filter.amount_max.is_none_or(|max| entry.amount <= max)
        && filter.account_id.is_none_or(|id| entry.account_id == id)
        && filter.cost_center_id.is_none_or(|id| entry.cost_center_id == id)
        && filter.created_from.is_none_or(|from| entry.created_at >= from)
        && filter.created_to.is_none_or(|to| entry.created_at <= to)
}

fn sort_entries(entries: &mut [LedgerEntry], field: LedgerEntrySort, order: SortOrder) {
    entries.sort_by(|a, b| {
        let ord = match field {
            LedgerEntrySort::Amount => a.amount.cmp(&b.amount),
            LedgerEntrySort::CreatedAt => a.created_at.cmp(&b.created_at),
            LedgerEntrySort::AccountId => a.account_id.cmp(&b.account_id),
            LedgerEntrySort::CostCenterId => a.cost_center_id.cmp(&b.cost_center_id),
            LedgerEntrySort::Id => a.id.cmp(&b.id),
        };
        directed(ord, order)
    });
}

#[async_trait]
impl LedgerEntryRepository for MockLedgerEntryRepository {
    async fn list(&self) -> DatabaseResult<Vec<LedgerEntry>> {
        self.store.check_fail("ledger_entry")?;
        let mut entries = self.store.snapshot();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn get(&self, id: i32) -> DatabaseResult<Option<LedgerEntry>> {
        self.store.check_fail("ledger_entry")?;
        Ok(self.store.snapshot().into_iter().find(|e| e.id == id))
    }

    async fn create(&self, new: NewLedgerEntry) -> DatabaseResult<LedgerEntry> {
        self.store.check_fail("ledger_entry")?;
        let entry = LedgerEntry {
            id: self.store.alloc_id(),
            amount: new.amount,
            account_id: new.account_id,
            cost_center_id: new.cost_center_id,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.store.with_rows(|rows| rows.push(entry.clone()));
        Ok(entry)
    }

    async fn update(
        &self,
        id: i32,
        update: LedgerEntryUpdate,
    ) -> DatabaseResult<Option<LedgerEntry>> {
        self.store.check_fail("ledger_entry")?;
        Ok(self.store.with_rows(|rows| {
            let entry = rows.iter_mut().find(|e| e.id == id)?;
            entry.amount = update.amount;
            entry.account_id = update.account_id;
            entry.cost_center_id = update.cost_center_id;
            entry.updated_at = Some(Utc::now());
            Some(entry.clone())
        }))
    }

    async fn delete(&self, id: i32) -> DatabaseResult<bool> {
        self.store.check_fail("ledger_entry")?;
        Ok(self.store.with_rows(|rows| {
            let before = rows.len();
            rows.retain(|e| e.id != id);
            rows.len() < before
        }))
    }

    async fn search_paged(
        &self,
        filter: &LedgerEntryFilter,
    ) -> DatabaseResult<(Vec<LedgerEntry>, i64)> {
        self.store.check_fail("ledger_entry")?;
        let mut matches: Vec<LedgerEntry> = self
            .store
            .snapshot()
            .into_iter()
            .filter(|e| matches_entry(e, filter))
            .collect();

        let (field, order) = LedgerEntrySort::resolve(
            filter.search.sort_by.as_deref(),
            filter.search.sort_order(),
        );
        sort_entries(&mut matches, field, order);

        Ok(paginate(matches, &filter.search))
    }
}

// ---------------------------------------------------------------------------
// Sales
// ---------------------------------------------------------------------------

/// In-memory sale repository
#[derive(Clone)]
pub struct MockSaleRepository {
    store: MockStore<Sale>,
}

impl Default for MockSaleRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSaleRepository {
    pub fn new() -> Self {
        Self {
            store: MockStore::new(),
        }
    }

    /// Start with pre-existing rows; ids must already be assigned
    pub fn with_sales(sales: Vec<Sale>) -> Self {
        let next_id = sales.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        Self {
            store: MockStore::seeded(sales, next_id),
        }
    }

    /// Configure the next operation to fail
    pub fn fail_next(&self, message: &str) {
        self.store.fail_next(message);
    }
}

fn matches_sale(sale: &Sale, filter: &SaleFilter) -> bool {
    filter.client_id.is_none_or(|id| sale.client_id == id)
        && filter.ledger_entry_id.is_none_or(|id| sale.ledger_entry_id == id)
        && filter.sale_event_id.is_none_or(|id| sale.sale_event_id == Some(id))
}

fn sort_sales(sales: &mut [Sale], field: SaleSort, order: SortOrder) {
    sales.sort_by(|a, b| {
        let ord = match field {
            SaleSort::Id => a.id.cmp(&b.id),
            SaleSort::ClientId => a.client_id.cmp(&b.client_id),
            SaleSort::LedgerEntryId => a.ledger_entry_id.cmp(&b.ledger_entry_id),
            SaleSort::SaleEventId => a.sale_event_id.cmp(&b.sale_event_id),
        };
        directed(ord, order)
    });
}

#[async_trait]
impl SaleRepository for MockSaleRepository {
    async fn list(&self) -> DatabaseResult<Vec<Sale>> {
        self.store.check_fail("sale")?;
        let mut sales = self.store.snapshot();
        sales.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(sales)
    }

    async fn get(&self, id: i32) -> DatabaseResult<Option<Sale>> {
        self.store.check_fail("sale")?;
        Ok(self.store.snapshot().into_iter().find(|s| s.id == id))
    }

    async fn create(&self, new: NewSale) -> DatabaseResult<Sale> {
        self.store.check_fail("sale")?;
        let sale = Sale {
            id: self.store.alloc_id(),
            client_id: new.client_id,
            ledger_entry_id: new.ledger_entry_id,
            sale_event_id: new.sale_event_id,
        };
        self.store.with_rows(|rows| rows.push(sale.clone()));
        Ok(sale)
    }

    async fn update(&self, id: i32, update: NewSale) -> DatabaseResult<Option<Sale>> {
        self.store.check_fail("sale")?;
        Ok(self.store.with_rows(|rows| {
            let sale = rows.iter_mut().find(|s| s.id == id)?;
            sale.client_id = update.client_id;
            sale.ledger_entry_id = update.ledger_entry_id;
            sale.sale_event_id = update.sale_event_id;
            Some(sale.clone())
        }))
    }

    async fn delete(&self, id: i32) -> DatabaseResult<bool> {
        self.store.check_fail("sale")?;
        Ok(self.store.with_rows(|rows| {
            let before = rows.len();
            rows.retain(|s| s.id != id);
            rows.len() < before
        }))
    }

    async fn search_paged(&self, filter: &SaleFilter) -> DatabaseResult<(Vec<Sale>, i64)> {
        self.store.check_fail("sale")?;
        let mut matches: Vec<Sale> = self
            .store
            .snapshot()
            .into_iter()
            .filter(|s| matches_sale(s, filter))
            .collect();

        let (field, order) =
            SaleSort::resolve(filter.search.sort_by.as_deref(), filter.search.sort_order());
        sort_sales(&mut matches, field, order);

        Ok(paginate(matches, &filter.search))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn client(id: i32, name: &str, tax_id: &str, email: &str, active: bool) -> Client {
        Client {
            id,
            name: name.to_string(),
            tax_id: tax_id.to_string(),
            email: email.to_string(),
            password: "pw".to_string(),
            active,
            registered_at: Utc::now(),
        }
    }

    fn forty_two_clients() -> Vec<Client> {
        (1..=42)
            .map(|i| {
                let name = if i <= 3 { format!("Alpha {i:02}") } else { format!("Client {i:02}") };
                client(i, &name, &format!("{i:011}"), &format!("c{i:02}@example.com"), true)
            })
            .collect()
    }

    #[tokio::test]
    async fn pages_partition_the_full_match_set() {
        let repo = MockClientRepository::with_clients(forty_two_clients());
        let mut seen = 0;
        let mut page = 1;
        loop {
            let filter = ClientFilter {
                search: SearchRequest::new(Some(page), Some(10), None, None),
                ..ClientFilter::default()
            };
            let (items, total) = repo.search_paged(&filter).await.expect("search");
            assert_eq!(total, 42);
            if items.is_empty() {
                break;
            }
            seen += items.len();
            page += 1;
        }
        assert_eq!(seen, 42);
        assert_eq!(page, 6); // pages 1-5 held items, page 6 was empty
    }

    #[tokio::test]
    async fn name_filter_is_independent_of_pagination() {
        let repo = MockClientRepository::with_clients(forty_two_clients());
        for (page, page_size) in [(1, 10), (2, 1), (9, 50)] {
            let filter = ClientFilter {
                search: SearchRequest::new(Some(page), Some(page_size), None, None),
                name: Some("Alpha".to_string()),
                ..ClientFilter::default()
            };
            let (_, total) = repo.search_paged(&filter).await.expect("search");
            assert_eq!(total, 3);
        }
    }

    #[tokio::test]
    async fn substring_match_is_case_sensitive() {
        let repo = MockClientRepository::with_clients(forty_two_clients());
        let filter = ClientFilter {
            name: Some("alpha".to_string()),
            ..ClientFilter::default()
        };
        let (_, total) = repo.search_paged(&filter).await.expect("search");
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn unknown_sort_field_falls_back_without_error() {
        let repo = MockClientRepository::with_clients(forty_two_clients());
        let filter = ClientFilter {
            search: SearchRequest::new(
                Some(1),
                Some(5),
                Some("nonexistent_field".to_string()),
                Some("desc".to_string()),
            ),
            ..ClientFilter::default()
        };
        let (items, _) = repo.search_paged(&filter).await.expect("search");
        // Fallback is name ascending, so Alpha 01 leads despite sortOrder=desc
        assert_eq!(items.first().map(|c| c.name.as_str()), Some("Alpha 01"));
    }

    #[tokio::test]
    async fn duplicate_tax_id_is_a_unique_violation() {
        let repo = MockClientRepository::with_clients(vec![client(
            1,
            "Alpha",
            "11111111111",
            "alpha@example.com",
            true,
        )]);
        let result = repo
            .create(NewClient {
                name: "Beta".to_string(),
                tax_id: "11111111111".to_string(),
                email: "beta@example.com".to_string(),
                password: "pw".to_string(),
                active: true,
            })
            .await;
        assert!(matches!(result, Err(DatabaseError::UniqueViolation { .. })));
    }

    #[tokio::test]
    async fn ledger_amount_range_is_inclusive() {
        let base = Utc::now();
        let entries = (1..=5)
            .map(|i| LedgerEntry {
                id: i,
                amount: Decimal::new(i64::from(i) * 100, 2), // 1.00 .. 5.00
                account_id: 1,
                cost_center_id: 1,
                created_at: base,
                updated_at: None,
            })
            .collect();
        let repo = MockLedgerEntryRepository::with_entries(entries);

        let filter = LedgerEntryFilter {
            amount_min: Some(Decimal::new(200, 2)),
            amount_max: Some(Decimal::new(400, 2)),
            ..LedgerEntryFilter::default()
        };
        let (items, total) = repo.search_paged(&filter).await.expect("search");
        assert_eq!(total, 3);
        assert!(items.iter().all(|e| {
            e.amount >= Decimal::new(200, 2) && e.amount <= Decimal::new(400, 2)
        }));
    }

    #[tokio::test]
    async fn ledger_default_sort_is_newest_first() {
        let base = Utc::now();
        let entries = (1..=3)
            .map(|i| LedgerEntry {
                id: i,
                amount: Decimal::ONE,
                account_id: 1,
                cost_center_id: 1,
                created_at: base + chrono::Duration::seconds(i64::from(i)),
                updated_at: None,
            })
            .collect();
        let repo = MockLedgerEntryRepository::with_entries(entries);

        let (items, _) = repo
            .search_paged(&LedgerEntryFilter::default())
            .await
            .expect("search");
        assert_eq!(items.first().map(|e| e.id), Some(3));
    }

    #[tokio::test]
    async fn failure_injection_surfaces_as_database_error() {
        let repo = MockSaleRepository::new();
        repo.fail_next("connection reset");
        let result = repo.list().await;
        assert!(matches!(result, Err(DatabaseError::UnexpectedState { .. })));
        // The failure is one-shot
        assert!(repo.list().await.is_ok());
    }
}
