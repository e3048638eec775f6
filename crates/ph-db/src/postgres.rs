//! PostgreSQL document store
//!
//! All collections share one table:
//!
//! ```sql
//! documents(collection TEXT, id UUID, seq BIGSERIAL, doc JSONB, PRIMARY KEY (collection, id))
//! ```
//!
//! Filters compile to JSONB expressions with bound parameters. Optional
//! fields are omitted from stored documents, so a missing attribute reads as
//! SQL `NULL`.

use async_trait::async_trait;
use ph_core::traits::Id;
use ph_queries::{Filter, FilterOperator, Query, SortCriterion, SortDirection};
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::types::Json;
use sqlx::QueryBuilder;
use tracing::instrument;

use crate::error::{StoreError, StoreResult};
use crate::pool::{self, PoolConfig, PoolStats};
use crate::store::DocumentStore;

const UNIQUE_VIOLATION: &str = "23505";

/// Store backed by a PostgreSQL JSONB table
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and make sure the documents table exists
    pub async fn connect(config: &PoolConfig) -> StoreResult<Self> {
        let store = Self::new(pool::connect(config).await?);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the documents table and its indexes if missing
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id UUID NOT NULL,
                seq BIGSERIAL NOT NULL,
                doc JSONB NOT NULL,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS documents_collection_seq_idx ON documents (collection, seq)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS documents_doc_idx ON documents USING GIN (doc)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the connection pool
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
        }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    #[instrument(skip(self, doc), fields(store = "postgres"))]
    async fn insert(&self, collection: &str, id: Id, doc: JsonValue) -> StoreResult<()> {
        let result = sqlx::query("INSERT INTO documents (collection, id, doc) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(id)
            .bind(Json(doc))
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db))
                if db.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Err(StoreError::Duplicate {
                    collection: collection.to_string(),
                    id,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, collection: &str, id: Id) -> StoreResult<Option<JsonValue>> {
        let doc = sqlx::query_scalar::<_, Json<JsonValue>>(
            "SELECT doc FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(doc.map(|Json(doc)| doc))
    }

    #[instrument(skip(self, doc), fields(store = "postgres"))]
    async fn replace(&self, collection: &str, id: Id, doc: JsonValue) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE documents SET doc = $3 WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .bind(Json(doc))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(store = "postgres"))]
    async fn delete(&self, collection: &str, id: Id) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, query), fields(store = "postgres"))]
    async fn find(&self, collection: &str, query: &Query) -> StoreResult<Vec<JsonValue>> {
        let mut builder = select_builder(collection, query);
        let docs = builder
            .build_query_scalar::<Json<JsonValue>>()
            .fetch_all(&self.pool)
            .await?;

        Ok(docs.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn count(&self, collection: &str, query: &Query) -> StoreResult<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM documents WHERE ");
        push_where(&mut builder, collection, query);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Build the full `SELECT doc ...` statement for a query
fn select_builder<'a>(collection: &str, query: &Query) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new("SELECT doc FROM documents WHERE ");
    push_where(&mut builder, collection, query);
    push_order(&mut builder, query);

    if let Some(limit) = query.limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit as i64);
    }

    builder
}

fn push_where(builder: &mut QueryBuilder<'_, Postgres>, collection: &str, query: &Query) {
    builder.push("collection = ");
    builder.push_bind(collection.to_string());

    for filter in query.filters.filters() {
        builder.push(" AND ");
        push_filter(builder, filter);
    }

    let alternatives = query.filters.alternatives();
    if !alternatives.is_empty() {
        builder.push(" AND (");
        for (i, filter) in alternatives.iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            push_filter(builder, filter);
        }
        builder.push(")");
    }
}

fn push_field(builder: &mut QueryBuilder<'_, Postgres>, attribute: &str) {
    builder.push("(doc -> ");
    builder.push_bind(attribute.to_string());
    builder.push(")");
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    let attribute = filter.attribute.as_str();

    match filter.operator {
        FilterOperator::Equals => {
            push_field(builder, attribute);
            builder.push(" = ");
            builder.push_bind(Json(filter.value.to_json()));
        }
        FilterOperator::In => {
            let values = filter.value.to_json_list();
            if values.is_empty() {
                builder.push("FALSE");
                return;
            }
            builder.push("(");
            for (i, value) in values.into_iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                push_field(builder, attribute);
                builder.push(" = ");
                builder.push_bind(Json(value));
            }
            builder.push(")");
        }
        FilterOperator::Contains => {
            push_field(builder, attribute);
            builder.push(" @> ");
            builder.push_bind(Json(JsonValue::Array(filter.value.to_json_list())));
        }
    }
}

fn push_order(builder: &mut QueryBuilder<'_, Postgres>, query: &Query) {
    let criteria = query.sorts.criteria();
    if criteria.is_empty() {
        builder.push(" ORDER BY seq ASC");
        return;
    }

    builder.push(" ORDER BY ");
    for (i, criterion) in criteria.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        push_sort(builder, criterion);
    }
    builder.push(", seq ASC");
}

fn push_sort(builder: &mut QueryBuilder<'_, Postgres>, criterion: &SortCriterion) {
    let direction = match criterion.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };

    // createdAt is assigned just before insert, so seq follows it
    if criterion.attribute == "createdAt" {
        builder.push("seq ");
        builder.push(direction);
        return;
    }

    push_field(builder, &criterion.attribute);
    builder.push(" ");
    builder.push(direction);
    builder.push(" NULLS LAST");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_without_filters_orders_by_insertion() {
        let builder = select_builder("tasks", &Query::new());
        assert_eq!(
            builder.sql(),
            "SELECT doc FROM documents WHERE collection = $1 ORDER BY seq ASC"
        );
    }

    #[test]
    fn test_select_with_filters_sorts_and_limit() {
        let query = Query::new()
            .filter(Filter::equals("recipient", ph_core::traits::new_id()))
            .sort_desc("createdAt")
            .limit(20);
        let builder = select_builder("notifications", &query);
        assert_eq!(
            builder.sql(),
            "SELECT doc FROM documents WHERE collection = $1 AND (doc -> $2) = $3 \
             ORDER BY seq DESC, seq ASC LIMIT $4"
        );
    }

    #[test]
    fn test_any_group_and_contains() {
        let me = ph_core::traits::new_id();
        let query = Query::new()
            .filter(Filter::equals("status", "active"))
            .any_of(vec![Filter::equals("manager", me), Filter::contains("members", me)])
            .sort_asc("dueDate");
        let builder = select_builder("projects", &query);
        assert_eq!(
            builder.sql(),
            "SELECT doc FROM documents WHERE collection = $1 AND (doc -> $2) = $3 \
             AND ((doc -> $4) = $5 OR (doc -> $6) @> $7) \
             ORDER BY (doc -> $8) ASC NULLS LAST, seq ASC"
        );
    }

    #[test]
    fn test_in_filters() {
        let a = ph_core::traits::new_id();
        let b = ph_core::traits::new_id();
        let query = Query::new()
            .filter(Filter::in_ids("id", vec![]))
            .filter(Filter::in_ids("project", vec![a, b]));
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM documents WHERE ");
        push_where(&mut builder, "tasks", &query);
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM documents WHERE collection = $1 AND FALSE \
             AND ((doc -> $2) = $3 OR (doc -> $4) = $5)"
        );
    }
}
