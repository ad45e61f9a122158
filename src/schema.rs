// ABOUTME: Catalog of the known airline tables and their typed column descriptors.
// ABOUTME: Built once per session and used to whitelist every identifier placed in SQL.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// The tables the application works with, in menu order.
pub const KNOWN_TABLES: [&str; 6] = ["pilot", "airline", "plane", "country", "airport", "flight"];

pub const IDENTITY_COLUMN: &str = "id";

/// Type tag driving how a column's text is rendered and parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer,
    Real,
    Decimal,
    Date,
}

impl FieldKind {
    /// Classifies a declared SQL type as reported by information_schema or PRAGMA table_info.
    pub fn from_sql_type(data_type: &str) -> Self {
        let ty = data_type.trim().to_uppercase();
        if ty == "DATE" {
            return FieldKind::Date;
        }
        if ty.starts_with("INTERVAL") || ty.contains("POINT") || ty.ends_with("[]") {
            return FieldKind::Text;
        }
        if ty.contains("INT") || ty == "SERIAL" || ty == "BIGSERIAL" || ty == "SMALLSERIAL" {
            return FieldKind::Integer;
        }
        if ty.starts_with("NUMERIC") || ty.starts_with("DECIMAL") {
            return FieldKind::Decimal;
        }
        if ty.contains("REAL") || ty.contains("FLOA") || ty.contains("DOUB") {
            return FieldKind::Real;
        }
        FieldKind::Text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub data_type: String,
    pub kind: FieldKind,
    pub is_nullable: bool,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, is_nullable: bool) -> Self {
        let data_type = data_type.into();
        Self {
            name: name.into(),
            kind: FieldKind::from_sql_type(&data_type),
            data_type,
            is_nullable,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.name.eq_ignore_ascii_case(IDENTITY_COLUMN)
    }
}

/// Columns of one table. Always holds exactly one identity column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    name: String,
    columns: Vec<ColumnDescriptor>,
    #[serde(skip)]
    identity: usize,
}

impl TableSchema {
    /// Validates that the table has an identity column.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Result<Self> {
        let name = name.into();
        if columns.is_empty() {
            return Err(Error::Schema(format!("Table '{}' has no columns", name)));
        }
        let identity = columns
            .iter()
            .position(ColumnDescriptor::is_identity)
            .ok_or_else(|| {
                Error::Schema(format!("Table '{}' has no '{}' column", name, IDENTITY_COLUMN))
            })?;
        Ok(Self {
            name,
            columns,
            identity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All columns in declared order, identity included.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Result<&ColumnDescriptor> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::UnknownColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    pub fn identity(&self) -> &ColumnDescriptor {
        &self.columns[self.identity]
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Columns the user may edit, in declared order.
    pub fn editable_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| !c.is_identity())
    }
}

/// Schema snapshot of the known tables taken when a session opens.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: Vec<TableSchema>,
}

impl Catalog {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }

    pub fn table(&self, name: &str) -> Result<&TableSchema> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }
}
