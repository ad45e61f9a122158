// ABOUTME: Record form binding: editable text fields staged from a selected row.
// ABOUTME: Fields are parsed into typed statement values before any CRUD call.

use crate::error::{Error, Result};
use crate::labels::display_label;
use crate::schema::{FieldKind, TableSchema};
use crate::statement::Value;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundField {
    pub column: String,
    pub label: String,
    pub kind: FieldKind,
    pub nullable: bool,
    pub value: String,
}

impl BoundField {
    pub fn parse(&self) -> Result<Value> {
        let raw = self.value.trim();
        if raw.is_empty() {
            return match (self.kind, self.nullable) {
                (FieldKind::Text, false) => Ok(Value::Text(Some(self.value.clone()))),
                (kind, true) => Ok(null_of(kind)),
                (_, false) => Err(self.invalid("a value is required")),
            };
        }

        match self.kind {
            FieldKind::Text => Ok(Value::Text(Some(self.value.clone()))),
            FieldKind::Integer => raw
                .parse::<i64>()
                .map(|v| Value::Integer(Some(v)))
                .map_err(|_| self.invalid("expected a whole number")),
            FieldKind::Real => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| Value::Real(Some(v)))
                .ok_or_else(|| self.invalid("expected a number")),
            FieldKind::Decimal => Decimal::from_str(raw)
                .or_else(|_| Decimal::from_scientific(raw))
                .map(|v| Value::Decimal(Some(v)))
                .map_err(|_| self.invalid("expected a decimal number")),
            FieldKind::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map(|v| Value::Date(Some(v)))
                .map_err(|_| self.invalid("expected a date as YYYY-MM-DD")),
        }
    }

    fn invalid(&self, reason: &str) -> Error {
        Error::InvalidValue {
            column: self.column.clone(),
            value: self.value.clone(),
            reason: reason.to_string(),
        }
    }
}

fn null_of(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Text => Value::Text(None),
        FieldKind::Integer => Value::Integer(None),
        FieldKind::Real => Value::Real(None),
        FieldKind::Decimal => Value::Decimal(None),
        FieldKind::Date => Value::Date(None),
    }
}

/// Editable values for one row, keyed by column and kept in declared column order.
/// The identity column is never part of a binding.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FieldBinding {
    fields: Vec<BoundField>,
}

impl FieldBinding {
    /// Pre-fills one field per non-identity column from the row's rendered values.
    pub fn bind(row: &[String], table: &TableSchema) -> Result<Self> {
        if row.len() != table.columns().len() {
            return Err(Error::Schema(format!(
                "Row has {} values but table '{}' has {} columns",
                row.len(),
                table.name(),
                table.columns().len()
            )));
        }

        let fields = table
            .columns()
            .iter()
            .zip(row)
            .filter(|(column, _)| !column.is_identity())
            .map(|(column, value)| BoundField {
                column: column.name.clone(),
                label: display_label(&column.name).to_string(),
                kind: column.kind,
                nullable: column.is_nullable,
                value: value.clone(),
            })
            .collect();
        Ok(Self { fields })
    }

    /// Empty fields for every editable column.
    pub fn blank(table: &TableSchema) -> Self {
        let fields = table
            .editable_columns()
            .map(|column| BoundField {
                column: column.name.clone(),
                label: display_label(&column.name).to_string(),
                kind: column.kind,
                nullable: column.is_nullable,
                value: String::new(),
            })
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[BoundField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.column == column)
            .map(|f| f.value.as_str())
    }

    pub fn set(&mut self, column: &str, value: impl Into<String>) -> Result<()> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.column == column)
            .ok_or_else(|| Error::InvalidValue {
                column: column.to_string(),
                value: String::new(),
                reason: "not an editable field".to_string(),
            })?;
        field.value = value.into();
        Ok(())
    }

    /// Typed values in field order; fails on the first field that does not parse.
    pub fn parse(&self) -> Result<Vec<(String, Value)>> {
        self.fields
            .iter()
            .map(|f| Ok((f.column.clone(), f.parse()?)))
            .collect()
    }
}
