// ABOUTME: SQLite driver: PRAGMA-based column introspection, row rendering and writes.
// ABOUTME: Values are rendered to text by the storage class of each stored value.

use super::connection_error;
use crate::error::{Error, Result};
use crate::schema::ColumnDescriptor;
use crate::statement::{quote_identifier, Statement, Value};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, TypeInfo, ValueRef};

pub async fn connect(url: &str) -> Result<sqlx::SqlitePool> {
    // A single long-lived connection also keeps `:memory:` databases alive.
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(url)
        .await
        .map_err(|e| connection_error("SQLite", e))
}

pub async fn list_columns(pool: &sqlx::SqlitePool, table: &str) -> Result<Vec<ColumnDescriptor>> {
    let query = format!("PRAGMA table_info({})", quote_identifier(table));
    let rows = sqlx::query(&query)
        .fetch_all(pool)
        .await
        .map_err(|e| Error::Query(format!("Failed to list columns of '{}': {}", table, e)))?;

    Ok(rows
        .iter()
        .map(|r| {
            ColumnDescriptor::new(
                r.get::<String, _>("name"),
                r.get::<String, _>("type"),
                r.get::<i32, _>("notnull") == 0,
            )
        })
        .collect())
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &'q Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Text(v) => query.bind(v.as_deref()),
        Value::Integer(v) => query.bind(*v),
        Value::Real(v) => query.bind(*v),
        // Bound as text; NUMERIC affinity converts it on storage.
        Value::Decimal(v) => query.bind(v.map(|d| d.to_string())),
        Value::Date(v) => query.bind(*v),
    }
}

fn prepare(stmt: &Statement) -> Query<'_, Sqlite, SqliteArguments<'_>> {
    stmt.params
        .iter()
        .fold(sqlx::query(&stmt.sql), |query, value| bind_value(query, value))
}

pub async fn fetch_rows(pool: &sqlx::SqlitePool, stmt: &Statement) -> Result<Vec<Vec<String>>> {
    let rows = prepare(stmt).fetch_all(pool).await.map_err(Error::query)?;

    Ok(rows
        .iter()
        .map(|row| {
            (0..row.len())
                .map(|i| sqlite_value_to_string(row, i))
                .collect()
        })
        .collect())
}

pub async fn execute<F>(pool: &sqlx::SqlitePool, stmt: &Statement, check: F) -> Result<u64>
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

async fn rollback(tx: sqlx::Transaction<'_, Sqlite>, cause: &Error) {
    tracing::warn!(error = %cause, "rolling back");
    if let Err(e) = tx.rollback().await {
        tracing::error!(error = %e, "rollback failed");
    }
}

fn sqlite_value_to_string(row: &SqliteRow, index: usize) -> String {
    // Declared types are advisory in SQLite, so dispatch on what is actually stored.
    let type_name = match row.try_get_raw(index) {
        Ok(value) if !value.is_null() => value.type_info().name().to_string(),
        _ => return String::new(),
    };

    match type_name.as_str() {
        "INTEGER" => row
            .try_get::<i64, _>(index)
            .map(|v| v.to_string())
            .unwrap_or_default(),
        "REAL" => row
            .try_get::<f64, _>(index)
            .map(|v| v.to_string())
            .unwrap_or_default(),
        _ => row.try_get::<String, _>(index).unwrap_or_default(),
    }
}
