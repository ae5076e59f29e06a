//! Account repository backed by `PostgreSQL`

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::error::{DatabaseErrorExt, DatabaseOperation, DatabaseResult};
use crate::filters::AccountFilter;
use crate::models::{Account, AccountKind, AccountUpdate, NewAccount};
use crate::sort::AccountSort;
use crate::traits::AccountRepository;

use super::{contains_pattern, sql_direction};

const ENTITY: &str = "account";

/// `PostgreSQL`-backed account repository
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_account(row: &PgRow) -> Account {
    Account {
        id: row.get("id"),
        name: row.get("name"),
        kind: AccountKind::from(row.get::<String, _>("kind")),
        client_id: row.get("client_id"),
    }
}

fn push_predicates(builder: &mut QueryBuilder<'_, Postgres>, filter: &AccountFilter) {
    if let Some(name) = &filter.name {
        builder.push(" AND name LIKE ");
        builder.push_bind(contains_pattern(name));
    }
    if let Some(kind) = filter.kind {
        builder.push(" AND kind = ");
        builder.push_bind(kind.to_string());
    }
    if let Some(client_id) = filter.client_id {
        builder.push(" AND client_id = ");
        builder.push_bind(client_id);
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn list(&self) -> DatabaseResult<Vec<Account>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, kind, client_id
            FROM accounts
            ORDER BY name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_db_err(DatabaseOperation::List { entity: ENTITY }, None)?;

        Ok(rows.iter().map(row_to_account).collect())
    }

    async fn get(&self, id: i32) -> DatabaseResult<Option<Account>> {
        let row = sqlx::query(
            r"
            SELECT id, name, kind, client_id
            FROM accounts
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_db_err(DatabaseOperation::Get { entity: ENTITY, id }, None)?;

        Ok(row.as_ref().map(row_to_account))
    }

    async fn exists_by_name(&self, name: &str, exclude_id: Option<i32>) -> DatabaseResult<bool> {
        let row = match exclude_id {
            Some(exclude) => {
                sqlx::query("SELECT EXISTS (SELECT 1 FROM accounts WHERE name = $1 AND id <> $2)")
                    .bind(name)
                    .bind(exclude)
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT EXISTS (SELECT 1 FROM accounts WHERE name = $1)")
                    .bind(name)
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_db_err(
            DatabaseOperation::Query {
                description: "account name exists".to_string(),
            },
            None,
        )?;

        Ok(row.get::<bool, _>(0))
    }

    async fn create(&self, new: NewAccount) -> DatabaseResult<Account> {
        let row = sqlx::query(
            r"
            INSERT INTO accounts (name, kind, client_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, kind, client_id
            ",
        )
        .bind(new.name)
        .bind(new.kind.to_string())
        .bind(new.client_id)
        .fetch_one(&self.pool)
        .await
        .map_db_err(DatabaseOperation::Create { entity: ENTITY }, None)?;

        Ok(row_to_account(&row))
    }

    async fn update(&self, id: i32, update: AccountUpdate) -> DatabaseResult<Option<Account>> {
        let row = sqlx::query(
            r"
            UPDATE accounts
            SET name = $1, kind = $2, client_id = $3
            WHERE id = $4
            RETURNING id, name, kind, client_id
            ",
        )
        .bind(update.name)
        .bind(update.kind.to_string())
        .bind(update.client_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_db_err(DatabaseOperation::Update { entity: ENTITY, id }, None)?;

        Ok(row.as_ref().map(row_to_account))
    }

    async fn delete(&self, id: i32) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_db_err(DatabaseOperation::Delete { entity: ENTITY, id }, None)?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_paged(&self, filter: &AccountFilter) -> DatabaseResult<(Vec<Account>, i64)> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM accounts WHERE TRUE");
        push_predicates(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_db_err(DatabaseOperation::Count { entity: ENTITY }, None)?;

        let (sort, order) =
            AccountSort::resolve(filter.search.sort_by.as_deref(), filter.search.sort_order());

        let mut page_query =
            QueryBuilder::new("SELECT id, name, kind, client_id FROM accounts WHERE TRUE");
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

        Ok((rows.iter().map(row_to_account).collect(), total))
    }
}
