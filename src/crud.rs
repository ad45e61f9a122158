// ABOUTME: CRUD executor: turns a field binding into INSERT/UPDATE/DELETE against one table.
// ABOUTME: Each call is its own transaction, committed on success and rolled back on failure.

use crate::db::Database;
use crate::error::{Error, Result};
use crate::form::FieldBinding;
use crate::schema::{Catalog, TableSchema};
use crate::statement::StatementBuilder;

pub struct CrudExecutor<'a> {
    db: &'a Database,
    table: &'a TableSchema,
}

fn require_row(id: i64) -> impl FnOnce(u64) -> Result<()> {
    move |affected| {
        if affected == 0 {
            Err(Error::RowNotFound(id))
        } else {
            Ok(())
        }
    }
}

impl<'a> CrudExecutor<'a> {
    pub fn new(db: &'a Database, catalog: &'a Catalog, table: &str) -> Result<Self> {
        Ok(Self {
            db,
            table: catalog.table(table)?,
        })
    }

    fn builder(&self) -> StatementBuilder<'a> {
        StatementBuilder::new(self.table, self.db.dialect())
    }

    #[tracing::instrument(skip(self, binding), fields(table = %self.table.name()))]
    pub async fn update(&self, id: i64, binding: &FieldBinding) -> Result<u64> {
        let stmt = self.builder().update(id, binding.parse()?)?;
        let affected = self.db.execute(&stmt, require_row(id)).await?;
        tracing::info!(affected, "row updated");
        Ok(affected)
    }

    #[tracing::instrument(skip(self, binding), fields(table = %self.table.name()))]
    pub async fn insert(&self, binding: &FieldBinding) -> Result<u64> {
        let stmt = self.builder().insert(binding.parse()?)?;
        let affected = self.db.execute(&stmt, |_| Ok(())).await?;
        tracing::info!(affected, "row inserted");
        Ok(affected)
    }

    #[tracing::instrument(skip(self), fields(table = %self.table.name()))]
    pub async fn delete(&self, id: i64) -> Result<u64> {
        let stmt = self.builder().delete(id);
        let affected = self.db.execute(&stmt, require_row(id)).await?;
        tracing::info!(affected, "row deleted");
        Ok(affected)
    }
}
