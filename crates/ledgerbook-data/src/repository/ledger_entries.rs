//! Ledger entry repository backed by `PostgreSQL`

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::error::{DatabaseErrorExt, DatabaseOperation, DatabaseResult};
use crate::filters::LedgerEntryFilter;
use crate::models::{LedgerEntry, LedgerEntryUpdate, NewLedgerEntry};
use crate::sort::LedgerEntrySort;
use crate::traits::LedgerEntryRepository;

use super::sql_direction;

const ENTITY: &str = "ledger_entry";

/// `PostgreSQL`-backed ledger entry repository
pub struct PgLedgerEntryRepository {
    pool: PgPool,
}

impl PgLedgerEntryRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_entry(row: &PgRow) -> LedgerEntry {
    LedgerEntry {
        id: row.get("id"),
        amount: row.get("amount"),
        account_id: row.get("account_id"),
        cost_center_id: row.get("cost_center_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn push_predicates(builder: &mut QueryBuilder<'_, Postgres>, filter: &LedgerEntryFilter) {
    if let Some(min) = filter.amount_min {
        builder.push(" AND amount >= ");
        builder.push_bind(min);
    }
    if let Some(max) = filter.amount_max {
        builder.push(" AND amount <= ");
        builder.push_bind(max);
    }
    if let Some(account_id) = filter.account_id {
        builder.push(" AND account_id = ");
        builder.push_bind(account_id);
    }
    if let Some(cost_center_id) = filter.cost_center_id {
        builder.push(" AND cost_center_id = ");
        builder.push_bind(cost_center_id);
    }
    if let Some(from) = filter.created_from {
        builder.push(" AND created_at >= ");
        builder.push_bind(from);
    }
    if let Some(to) = filter.created_to {
        builder.push(" AND created_at <= ");
        builder.push_bind(to);
    }
}

#[async_trait]
impl LedgerEntryRepository for PgLedgerEntryRepository {
    async fn list(&self) -> DatabaseResult<Vec<LedgerEntry>> {
        let rows = sqlx::query(
            r"
            SELECT id, amount, account_id, cost_center_id, created_at, updated_at
            FROM ledger_entries
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_db_err(DatabaseOperation::List { entity: ENTITY }, None)?;

        Ok(rows.iter().map(row_to_entry).collect())
    }

    async fn get(&self, id: i32) -> DatabaseResult<Option<LedgerEntry>> {
        let row = sqlx::query(
            r"
            SELECT id, amount, account_id, cost_center_id, created_at, updated_at
            FROM ledger_entries
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_db_err(DatabaseOperation::Get { entity: ENTITY, id }, None)?;

        Ok(row.as_ref().map(row_to_entry))
    }

    async fn create(&self, new: NewLedgerEntry) -> DatabaseResult<LedgerEntry> {
        let row = sqlx::query(
            r"
            INSERT INTO ledger_entries (amount, account_id, cost_center_id)
            VALUES ($1, $2, $3)
            RETURNING id, amount, account_id, cost_center_id, created_at, updated_at
            ",
        )
        .bind(new.amount)
        .bind(new.account_id)
        .bind(new.cost_center_id)
        .fetch_one(&self.pool)
        .await
        .map_db_err(DatabaseOperation::Create { entity: ENTITY }, None)?;

        Ok(row_to_entry(&row))
    }

    async fn update(
        &self,
        id: i32,
        update: LedgerEntryUpdate,
    ) -> DatabaseResult<Option<LedgerEntry>> {
        let row = sqlx::query(
            r"
            UPDATE ledger_entries
            SET amount = $1, account_id = $2, cost_center_id = $3, updated_at = now()
            WHERE id = $4
            RETURNING id, amount, account_id, cost_center_id, created_at, updated_at
            ",
        )
        .bind(update.amount)
        .bind(update.account_id)
        .bind(update.cost_center_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_db_err(DatabaseOperation::Update { entity: ENTITY, id }, None)?;

        Ok(row.as_ref().map(row_to_entry))
    }

    async fn delete(&self, id: i32) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM ledger_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_db_err(DatabaseOperation::Delete { entity: ENTITY, id }, None)?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_paged(
        &self,
        filter: &LedgerEntryFilter,
    ) -> DatabaseResult<(Vec<LedgerEntry>, i64)> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM ledger_entries WHERE TRUE");
        push_predicates(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_db_err(DatabaseOperation::Count { entity: ENTITY }, None)?;

        let (sort, order) = LedgerEntrySort::resolve(
            filter.search.sort_by.as_deref(),
            filter.search.sort_order(),
        );

        let mut page_query = QueryBuilder::new(
            "SELECT id, amount, account_id, cost_center_id, created_at, updated_at \
             FROM ledger_entries WHERE TRUE",
        );
        push_predicates(&mut page_query, filter);
        page_query.push(format!(" ORDER BY {} {}", sort.column(), sql_direction(order)));
        page_query.push(" LIMIT ");
        page_query.push_bind(filter.search.limit());
        page_query.push(" OFFSET ");
        page_query.push_bind(filter.search.offset());

        let rows = page_query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_db_err(DatabaseOperation::Search { entity: ENTITY }, None)?;

        Ok((rows.iter().map(row_to_entry).collect(), total))
    }
}
