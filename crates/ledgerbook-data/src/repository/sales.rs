//! Sale repository backed by `PostgreSQL`

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::error::{DatabaseErrorExt, DatabaseOperation, DatabaseResult};
use crate::filters::SaleFilter;
use crate::models::{NewSale, Sale};
use crate::sort::SaleSort;
use crate::traits::SaleRepository;

use super::sql_direction;

const ENTITY: &str = "sale";

/// `PostgreSQL`-backed sale repository
pub struct PgSaleRepository {
    pool: PgPool,
}

impl PgSaleRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_sale(row: &PgRow) -> Sale {
    Sale {
        id: row.get("id"),
        client_id: row.get("client_id"),
        ledger_entry_id: row.get("ledger_entry_id"),
        sale_event_id: row.get("sale_event_id"),
    }
}

fn push_predicates(builder: &mut QueryBuilder<'_, Postgres>, filter: &SaleFilter) {
    if let Some(client_id) = filter.client_id {
        builder.push(" AND client_id = ");
        builder.push_bind(client_id);
    }
    if let Some(ledger_entry_id) = filter.ledger_entry_id {
        builder.push(" AND ledger_entry_id = ");
        builder.push_bind(ledger_entry_id);
    }
    if let Some(sale_event_id) = filter.sale_event_id {
        builder.push(" AND sale_event_id = ");
        builder.push_bind(sale_event_id);
    }
}

#[async_trait]
impl SaleRepository for PgSaleRepository {
    async fn list(&self) -> DatabaseResult<Vec<Sale>> {
        let rows = sqlx::query(
            r"
            SELECT id, client_id, ledger_entry_id, sale_event_id
            FROM sales
            ORDER BY id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_db_err(DatabaseOperation::List { entity: ENTITY }, None)?;

        Ok(rows.iter().map(row_to_sale).collect())
    }

    async fn get(&self, id: i32) -> DatabaseResult<Option<Sale>> {
        let row = sqlx::query(
            r"
            SELECT id, client_id, ledger_entry_id, sale_event_id
            FROM sales
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_db_err(DatabaseOperation::Get { entity: ENTITY, id }, None)?;

        Ok(row.as_ref().map(row_to_sale))
    }

    async fn create(&self, new: NewSale) -> DatabaseResult<Sale> {
        let row = sqlx::query(
            r"
            INSERT INTO sales (client_id, ledger_entry_id, sale_event_id)
            VALUES ($1, $2, $3)
            RETURNING id, client_id, ledger_entry_id, sale_event_id
            ",
        )
        .bind(new.client_id)
        .bind(new.ledger_entry_id)
        .bind(new.sale_event_id)
        .fetch_one(&self.pool)
        .await
        .map_db_err(DatabaseOperation::Create { entity: ENTITY }, None)?;

        Ok(row_to_sale(&row))
    }

    async fn update(&self, id: i32, update: NewSale) -> DatabaseResult<Option<Sale>> {
        let row = sqlx::query(
            r"
            UPDATE sales
            SET client_id = $1, ledger_entry_id = $2, sale_event_id = $3
            WHERE id = $4
            RETURNING id, client_id, ledger_entry_id, sale_event_id
            ",
        )
        .bind(update.client_id)
        .bind(update.ledger_entry_id)
        .bind(update.sale_event_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_db_err(DatabaseOperation::Update { entity: ENTITY, id }, None)?;

        Ok(row.as_ref().map(row_to_sale))
    }

    async fn delete(&self, id: i32) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_db_err(DatabaseOperation::Delete { entity: ENTITY, id }, None)?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_paged(&self, filter: &SaleFilter) -> DatabaseResult<(Vec<Sale>, i64)> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM sales WHERE TRUE");
        push_predicates(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_db_err(DatabaseOperation::Count { entity: ENTITY }, None)?;

        let (sort, order) =
            SaleSort::resolve(filter.search.sort_by.as_deref(), filter.search.sort_order());

        let mut page_query = QueryBuilder::new(
            "SELECT id, client_id, ledger_entry_id, sale_event_id FROM sales WHERE TRUE",
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

        Ok((rows.iter().map(row_to_sale).collect(), total))
    }
}
