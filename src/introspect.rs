// ABOUTME: Schema introspection: builds the session catalog and loads a table's columns and rows.
// ABOUTME: Columns are re-read on every load so the database stays the single source of truth.

use crate::db::Database;
use crate::error::{Error, Result};
use crate::schema::{Catalog, TableSchema, KNOWN_TABLES};
use crate::statement::StatementBuilder;
use serde::Serialize;

/// String-rendered values of one row, one per column.
pub type RowSnapshot = Vec<String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub descriptor: TableDescriptor,
    pub rows: Vec<RowSnapshot>,
}

impl TableView {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.descriptor.columns.iter().position(|c| c == column)
    }
}

/// Introspects every known table. Fails if one is missing or lacks an identity column.
#[tracing::instrument(skip(db))]
pub async fn build_catalog(db: &Database) -> Result<Catalog> {
    let mut tables = Vec::with_capacity(KNOWN_TABLES.len());
    for name in KNOWN_TABLES {
        let columns = db.list_columns(name).await?;
        if columns.is_empty() {
            return Err(Error::Schema(format!("Table '{}' not found", name)));
        }
        tables.push(TableSchema::new(name, columns)?);
    }
    tracing::info!(tables = tables.len(), "catalog ready");
    Ok(Catalog::new(tables))
}

/// Columns and rows of `name`, ordered by identity.
#[tracing::instrument(skip(db, catalog))]
pub async fn load_table(db: &Database, catalog: &Catalog, name: &str) -> Result<TableView> {
    let table = catalog.table(name)?;

    let fresh: Vec<String> = db
        .list_columns(name)
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();
    let known = table.column_names();
    if fresh != known {
        return Err(Error::Query(format!(
            "Columns of '{}' changed since the session started (expected {:?}, found {:?})",
            name, known, fresh
        )));
    }

    let stmt = StatementBuilder::new(table, db.dialect()).select_all();
    let rows = db.fetch_rows(&stmt).await?;
    tracing::debug!(rows = rows.len(), "table loaded");

    Ok(TableView {
        descriptor: TableDescriptor {
            name: table.name().to_string(),
            columns: known,
        },
        rows,
    })
}
