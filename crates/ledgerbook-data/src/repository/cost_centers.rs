//! Cost center repository backed by `PostgreSQL`

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::error::{DatabaseErrorExt, DatabaseOperation, DatabaseResult};
use crate::filters::CostCenterFilter;
use crate::models::CostCenter;
use crate::sort::CostCenterSort;
use crate::traits::CostCenterRepository;

use super::{contains_pattern, sql_direction};

const ENTITY: &str = "cost_center";

/// `PostgreSQL`-backed cost center repository
pub struct PgCostCenterRepository {
    pool: PgPool,
}

impl PgCostCenterRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_cost_center(row: &PgRow) -> CostCenter {
    CostCenter {
        id: row.get("id"),
        name: row.get("name"),
    }
}

fn push_predicates(builder: &mut QueryBuilder<'_, Postgres>, filter: &CostCenterFilter) {
    if let Some(name) = &filter.name {
        builder.push(" AND name LIKE ");
        builder.push_bind(contains_pattern(name));
    }
}

#[async_trait]
impl CostCenterRepository for PgCostCenterRepository {
    async fn list(&self) -> DatabaseResult<Vec<CostCenter>> {
        let rows = sqlx::query("SELECT id, name FROM cost_centers ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_db_err(DatabaseOperation::List { entity: ENTITY }, None)?;

        Ok(rows.iter().map(row_to_cost_center).collect())
    }

    async fn get(&self, id: i32) -> DatabaseResult<Option<CostCenter>> {
        let row = sqlx::query("SELECT id, name FROM cost_centers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_db_err(DatabaseOperation::Get { entity: ENTITY, id }, None)?;

        Ok(row.as_ref().map(row_to_cost_center))
    }

    async fn create(&self, name: String) -> DatabaseResult<CostCenter> {
        let row = sqlx::query("INSERT INTO cost_centers (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_db_err(DatabaseOperation::Create { entity: ENTITY }, None)?;

        Ok(row_to_cost_center(&row))
    }

    async fn update(&self, id: i32, name: String) -> DatabaseResult<Option<CostCenter>> {
        let row =
            sqlx::query("UPDATE cost_centers SET name = $1 WHERE id = $2 RETURNING id, name")
                .bind(name)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_db_err(DatabaseOperation::Update { entity: ENTITY, id }, None)?;

        Ok(row.as_ref().map(row_to_cost_center))
    }

    async fn delete(&self, id: i32) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM cost_centers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_db_err(DatabaseOperation::Delete { entity: ENTITY, id }, None)?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_paged(
        &self,
        filter: &CostCenterFilter,
    ) -> DatabaseResult<(Vec<CostCenter>, i64)> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM cost_centers WHERE TRUE");
        push_predicates(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_db_err(DatabaseOperation::Count { entity: ENTITY }, None)?;

        let (sort, order) = CostCenterSort::resolve(
            filter.search.sort_by.as_deref(),
            filter.search.sort_order(),
        );

        let mut page_query = QueryBuilder::new("SELECT id, name FROM cost_centers WHERE TRUE");
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

        Ok((rows.iter().map(row_to_cost_center).collect(), total))
    }
}
