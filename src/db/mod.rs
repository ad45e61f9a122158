// ABOUTME: Database connection context and statement execution.
// ABOUTME: Supports PostgreSQL and SQLite with runtime driver selection.

pub mod postgres;
pub mod sqlite;

use crate::config::{ConnectionConfig, DatabaseType};
use crate::error::{Error, Result};
use crate::schema::ColumnDescriptor;
use crate::statement::{Dialect, Statement};

pub enum ConnectionPool {
    Postgres(sqlx::PgPool),
    Sqlite(sqlx::SqlitePool),
}

/// One open connection to the airline database, passed explicitly to every
/// introspection and CRUD call. The pool is capped at a single connection.
pub struct Database {
    pool: ConnectionPool,
    schema: String,
}

impl Database {
    #[tracing::instrument(skip(config), fields(db_type = ?config.db_type, host = %config.host))]
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let url = config.connection_url();
        let pool = match config.db_type {
            DatabaseType::Postgres => {
                ConnectionPool::Postgres(postgres::connect(&url, &config.schema).await?)
            }
            DatabaseType::Sqlite => ConnectionPool::Sqlite(sqlite::connect(&url).await?),
        };
        tracing::info!("connected");
        Ok(Self {
            pool,
            schema: config.schema.clone(),
        })
    }

    pub fn dialect(&self) -> Dialect {
        match self.pool {
            ConnectionPool::Postgres(_) => Dialect::Postgres,
            ConnectionPool::Sqlite(_) => Dialect::Sqlite,
        }
    }

    pub async fn close(&self) {
        match &self.pool {
            ConnectionPool::Postgres(p) => p.close().await,
            ConnectionPool::Sqlite(p) => p.close().await,
        }
        tracing::info!("connection closed");
    }

    /// Declared columns of `table` in ordinal order.
    pub async fn list_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        match &self.pool {
            ConnectionPool::Postgres(p) => postgres::list_columns(p, &self.schema, table).await,
            ConnectionPool::Sqlite(p) => sqlite::list_columns(p, table).await,
        }
    }

    /// Runs a read statement and renders every value to text.
    pub async fn fetch_rows(&self, stmt: &Statement) -> Result<Vec<Vec<String>>> {
        tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "fetch");
        match &self.pool {
            ConnectionPool::Postgres(p) => postgres::fetch_rows(p, stmt).await,
            ConnectionPool::Sqlite(p) => sqlite::fetch_rows(p, stmt).await,
        }
    }

    /// Runs a write statement in its own transaction. `check` sees the number
    /// of affected rows; an error from it rolls the transaction back.
    pub async fn execute<F>(&self, stmt: &Statement, check: F) -> Result<u64>
    where
        F: FnOnce(u64) -> Result<()>,
    {
        tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "execute");
        match &self.pool {
            ConnectionPool::Postgres(p) => postgres::execute(p, stmt, check).await,
            ConnectionPool::Sqlite(p) => sqlite::execute(p, stmt, check).await,
        }
    }
}

pub(crate) fn connection_error(backend: &str, err: sqlx::Error) -> Error {
    Error::Connection(format!("Failed to connect to {}: {}", backend, err))
}
