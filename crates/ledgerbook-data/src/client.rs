//! Database client combining the connection pool and repositories

use anyhow::Result;
use sqlx::PgPool;

use crate::pool::initialize_database;
use crate::repository::{
    PgAccountRepository, PgClientRepository, PgCostCenterRepository, PgLedgerEntryRepository,
    PgSaleRepository,
};
use ledgerbook_config::DatabaseConfig;

/// Entry point to the persistence layer
///
/// Owns the connection pool and hands out per-entity repositories that
/// share it. Repositories are cheap to construct (a pool clone), so
/// callers can grab them on demand.
pub struct DataClient {
    pool: PgPool,
}

impl DataClient {
    /// Wrap an existing pool
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and (when configured) run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database connection fails
    /// - Pool creation fails due to invalid configuration
    /// - Migrations fail to apply
    pub async fn initialize(config: &DatabaseConfig) -> Result<Self> {
        let pool = initialize_database(config).await?;
        Ok(Self::new(pool))
    }

    /// The underlying connection pool
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn clients(&self) -> PgClientRepository {
        PgClientRepository::new(self.pool.clone())
    }

    pub fn accounts(&self) -> PgAccountRepository {
        PgAccountRepository::new(self.pool.clone())
    }

    pub fn cost_centers(&self) -> PgCostCenterRepository {
        PgCostCenterRepository::new(self.pool.clone())
    }

    pub fn ledger_entries(&self) -> PgLedgerEntryRepository {
        PgLedgerEntryRepository::new(self.pool.clone())
    }

    pub fn sales(&self) -> PgSaleRepository {
        PgSaleRepository::new(self.pool.clone())
    }
}
