// ABOUTME: PostgreSQL driver: column introspection, row rendering and transactional writes.
// ABOUTME: Values are read back as text and written through casts to each column's declared type.

use super::connection_error;
use crate::error::{Error, Result};
use crate::schema::ColumnDescriptor;
use crate::statement::{quote_identifier, Statement, Value};
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::Query;
use sqlx::{Column, Executor, Postgres, Row};

pub async fn connect(url: &str, schema: &str) -> Result<sqlx::PgPool> {
    let search_path = format!("SET search_path TO {}", quote_identifier(schema));
    PgPoolOptions::new()
        .after_connect(move |conn, _meta| {
            let search_path = search_path.clone();
            Box::pin(async move {
                conn.execute(search_path.as_str()).await?;
                Ok(())
            })
        })
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(url)
        .await
        .map_err(|e| connection_error("PostgreSQL", e))
}

pub async fn list_columns(
    pool: &sqlx::PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<ColumnDescriptor>> {
    // format_type without a modifier gives a castable name: numeric(20,2) -> numeric.
    let rows = sqlx::query(
        r#"
        SELECT
            a.attname::TEXT AS column_name,
            format_type(a.atttypid, NULL)::TEXT AS data_type,
            NOT a.attnotnull AS is_nullable
        FROM pg_catalog.pg_attribute a
        JOIN pg_catalog.pg_class c ON c.oid = a.attrelid
        JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
        WHERE n.nspname = $1 AND c.relname = $2 AND c.relkind IN ('r', 'p', 'v')
          AND a.attnum > 0 AND NOT a.attisdropped
        ORDER BY a.attnum
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(|e| Error::Query(format!("Failed to list columns of '{}': {}", table, e)))?;

    Ok(rows
        .iter()
        .map(|r| {
            ColumnDescriptor::new(
                r.get::<String, _>("column_name"),
                r.get::<String, _>("data_type"),
                r.get::<bool, _>("is_nullable"),
            )
        })
        .collect())
}

fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &'q Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Text(v) => query.bind(v.as_deref()),
        Value::Integer(v) => query.bind(*v),
        Value::Real(v) => query.bind(*v),
        Value::Decimal(v) => query.bind(*v),
        Value::Date(v) => query.bind(*v),
    }
}

fn prepare(stmt: &Statement) -> Query<'_, Postgres, PgArguments> {
    stmt.params
        .iter()
        .fold(sqlx::query(&stmt.sql), |query, value| bind_value(query, value))
}

/// Rows of a statement whose select list is cast to text.
pub async fn fetch_rows(pool: &sqlx::PgPool, stmt: &Statement) -> Result<Vec<Vec<String>>> {
    let rows = prepare(stmt).fetch_all(pool).await.map_err(Error::query)?;

    rows.iter()
        .map(|row| {
            row.columns()
                .iter()
                .map(|col| {
                    row.try_get::<Option<String>, _>(col.ordinal())
                        .map(Option::unwrap_or_default)
                        .map_err(|e| {
                            Error::Query(format!("Failed to read column '{}': {}", col.name(), e))
                        })
                })
                .collect::<Result<Vec<String>>>()
        })
        .collect()
}

pub async fn execute<F>(pool: &sqlx::PgPool, stmt: &Statement, check: F) -> Result<u64>
where
    F: FnOnce(u64) -> Result<()>,
{
    let mut tx = pool.begin().await.map_err(Error::persistence)?;

    match prepare(stmt).execute(&mut *tx).await {
        Ok(result) => {
            let affected = result.rows_affected();
            if let Err(e) = check(affected) {
                rollback(tx, &e).await;
                return Err(e);
            }
            tx.commit().await.map_err(Error::persistence)?;
            Ok(affected)
        }
        Err(e) => {
            let err = Error::persistence(e);
            rollback(tx, &err).await;
            Err(err)
        }
    }
}

async fn rollback(tx: sqlx::Transaction<'_, Postgres>, cause: &Error) {
    tracing::warn!(error = %cause, "rolling back");
    if let Err(e) = tx.rollback().await {
        tracing::error!(error = %e, "rollback failed");
    }
}
