//! Client repository backed by `PostgreSQL`

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::error::{DatabaseErrorExt, DatabaseOperation, DatabaseResult};
use crate::filters::ClientFilter;
use crate::models::{Client, ClientUpdate, NewClient};
use crate::sort::ClientSort;
use crate::traits::ClientRepository;

use super::{contains_pattern, sql_direction};

const ENTITY: &str = "client";

/// `PostgreSQL`-backed client repository
pub struct PgClientRepository {
    pool: PgPool,
}

impl PgClientRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_client(row: &PgRow) -> Client {
    Client {
        id: row.get("id"),
        name: row.get("name"),
        tax_id: row.get("tax_id"),
        email: row.get("email"),
        password: row.get("password"),
        active: row.get("active"),
        registered_at: row.get("registered_at"),
    }
}

/// Append the filter's predicates; shared by the count and page queries
fn push_predicates(builder: &mut QueryBuilder<'_, Postgres>, filter: &ClientFilter) {
    if let Some(name) = &filter.name {
        builder.push(" AND name LIKE ");
        builder.push_bind(contains_pattern(name));
    }
    if let Some(tax_id) = &filter.tax_id {
        builder.push(" AND tax_id = ");
        builder.push_bind(tax_id.clone());
    }
    if let Some(active) = filter.active {
        builder.push(" AND active = ");
        builder.push_bind(active);
    }
    if let Some(email) = &filter.email {
        builder.push(" AND email LIKE ");
        builder.push_bind(contains_pattern(email));
    }
}

#[async_trait]
impl ClientRepository for PgClientRepository {
    async fn list(&self) -> DatabaseResult<Vec<Client>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, tax_id, email, password, active, registered_at
            FROM clients
            ORDER BY name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_db_err(DatabaseOperation::List { entity: ENTITY }, None)?;

        Ok(rows.iter().map(row_to_client).collect())
    }

    async fn get(&self, id: i32) -> DatabaseResult<Option<Client>> {
        let row = sqlx::query(
            r"
            SELECT id, name, tax_id, email, password, active, registered_at
            FROM clients
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_db_err(DatabaseOperation::Get { entity: ENTITY, id }, None)?;

        Ok(row.as_ref().map(row_to_client))
    }

    async fn get_by_tax_id(&self, tax_id: &str) -> DatabaseResult<Option<Client>> {
        let row = sqlx::query(
            r"
            SELECT id, name, tax_id, email, password, active, registered_at
            FROM clients
            WHERE tax_id = $1
            ",
        )
        .bind(tax_id)
        .fetch_optional(&self.pool)
        .await
        .map_db_err(
            DatabaseOperation::Query {
                description: "get client by tax id".to_string(),
            },
            None,
        )?;

        Ok(row.as_ref().map(row_to_client))
    }

    async fn get_by_email(&self, email: &str) -> DatabaseResult<Option<Client>> {
        let row = sqlx::query(
            r"
            SELECT id, name, tax_id, email, password, active, registered_at
            FROM clients
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_db_err(
            DatabaseOperation::Query {
                description: "get client by email".to_string(),
            },
            None,
        )?;

        Ok(row.as_ref().map(row_to_client))
    }

    async fn create(&self, new: NewClient) -> DatabaseResult<Client> {
        let row = sqlx::query(
            r"
            INSERT INTO clients (name, tax_id, email, password, active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, tax_id, email, password, active, registered_at
            ",
        )
        .bind(new.name)
        .bind(new.tax_id)
        .bind(new.email)
        .bind(new.password)
        .bind(new.active)
        .fetch_one(&self.pool)
        .await
        .map_db_err(DatabaseOperation::Create { entity: ENTITY }, None)?;

        Ok(row_to_client(&row))
    }

    async fn update(&self, id: i32, update: ClientUpdate) -> DatabaseResult<Option<Client>> {
        let row = sqlx::query(
            r"
            UPDATE clients
            SET name = $1, email = $2, active = $3
            WHERE id = $4
            RETURNING id, name, tax_id, email, password, active, registered_at
            ",
        )
        .bind(update.name)
        .bind(update.email)
        .bind(update.active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_db_err(DatabaseOperation::Update { entity: ENTITY, id }, None)?;

        Ok(row.as_ref().map(row_to_client))
    }

    async fn delete(&self, id: i32) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_db_err(DatabaseOperation::Delete { entity: ENTITY, id }, None)?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_paged(&self, filter: &ClientFilter) -> DatabaseResult<(Vec<Client>, i64)> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM clients WHERE TRUE");
        push_predicates(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_db_err(DatabaseOperation::Count { entity: ENTITY }, None)?;

        let (sort, order) =
            ClientSort::resolve(filter.search.sort_by.as_deref(), filter.search.sort_order());

        let mut page_query = QueryBuilder::new(
            "SELECT id, name, tax_id, email, password, active, registered_at \
             FROM clients WHERE TRUE",
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

        Ok((rows.iter().map(row_to_client).collect(), total))
    }
}
