// ABOUTME: Builds parameterized SELECT/INSERT/UPDATE/DELETE statements for catalog tables.
// ABOUTME: Identifiers are checked against the catalog and quoted; values always travel as parameters.

use crate::error::{Error, Result};
use crate::schema::TableSchema;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A typed statement parameter. `None` binds a NULL of the column's type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(Option<String>),
    Integer(Option<i64>),
    Real(Option<f64>),
    Decimal(Option<Decimal>),
    Date(Option<NaiveDate>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Placeholder for the 1-based parameter `n`.
    pub fn placeholder(self, n: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", n),
            Dialect::Sqlite => "?".to_string(),
        }
    }

    /// Placeholder for a value assigned to a column of `data_type`.
    ///
    /// Postgres gets an explicit cast so text-bound values reach boolean,
    /// timestamp, interval and other non-text columns; SQLite coerces by affinity.
    pub fn typed_placeholder(self, n: usize, data_type: &str) -> String {
        match self {
            Dialect::Postgres => format!("CAST(${} AS {})", n, data_type),
            Dialect::Sqlite => "?".to_string(),
        }
    }

    /// Wraps a select expression so that it is read back as text.
    pub fn as_text(self, expr: &str) -> String {
        match self {
            Dialect::Postgres => format!("{}::TEXT", expr),
            Dialect::Sqlite => expr.to_string(),
        }
    }
}

pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn bind(mut self, value: Value) -> Self {
        self.params.push(value);
        self
    }
}

pub struct StatementBuilder<'a> {
    table: &'a TableSchema,
    dialect: Dialect,
}

impl<'a> StatementBuilder<'a> {
    pub fn new(table: &'a TableSchema, dialect: Dialect) -> Self {
        Self { table, dialect }
    }

    fn table_ident(&self) -> String {
        quote_identifier(self.table.name())
    }

    fn identity_ident(&self) -> String {
        quote_identifier(&self.table.identity().name)
    }

    /// Resolves each column against the catalog and refuses the identity column.
    /// Yields the quoted identifier with the column's declared type.
    fn checked_columns(&self, values: &[(String, Value)]) -> Result<Vec<(String, &'a str)>> {
        values
            .iter()
            .map(|(column, value)| {
                let descriptor = self.table.column(column)?;
                if descriptor.is_identity() {
                    return Err(Error::InvalidValue {
                        column: column.clone(),
                        value: format!("{:?}", value),
                        reason: "the identity column is not editable".to_string(),
                    });
                }
                Ok((quote_identifier(&descriptor.name), descriptor.data_type.as_str()))
            })
            .collect()
    }

    /// `SELECT <all catalog columns> FROM <table> ORDER BY <table>.<identity>`
    ///
    /// Postgres columns are read as text under their own names; the ordering is
    /// table-qualified so it still sorts on the typed identity.
    pub fn select_all(&self) -> Statement {
        let columns = self
            .table
            .columns()
            .iter()
            .map(|c| {
                let column = quote_identifier(&c.name);
                match self.dialect {
                    Dialect::Postgres => format!("{} AS {}", self.dialect.as_text(&column), column),
                    Dialect::Sqlite => column,
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        Statement::new(format!(
            "SELECT {} FROM {} ORDER BY {}.{}",
            columns,
            self.table_ident(),
            self.table_ident(),
            self.identity_ident()
        ))
    }

    pub fn update(&self, id: i64, values: Vec<(String, Value)>) -> Result<Statement> {
        if values.is_empty() {
            return Err(Error::Persistence(format!(
                "Table '{}' has no editable columns",
                self.table.name()
            )));
        }
        let columns = self.checked_columns(&values)?;
        let set_clause = columns
            .iter()
            .enumerate()
            .map(|(i, (column, data_type))| {
                format!("{} = {}", column, self.dialect.typed_placeholder(i + 1, data_type))
            })
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = {}",
            self.table_ident(),
            set_clause,
            self.identity_ident(),
            self.dialect.placeholder(values.len() + 1)
        );

        let mut params: Vec<Value> = values.into_iter().map(|(_, v)| v).collect();
        params.push(Value::Integer(Some(id)));
        Ok(Statement { sql, params })
    }

    pub fn insert(&self, values: Vec<(String, Value)>) -> Result<Statement> {
        if values.is_empty() {
            return Ok(Statement::new(format!(
                "INSERT INTO {} DEFAULT VALUES",
                self.table_ident()
            )));
        }
        let columns = self.checked_columns(&values)?;
        let names = columns
            .iter()
            .map(|(column, _)| column.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = columns
            .iter()
            .enumerate()
            .map(|(i, (_, data_type))| self.dialect.typed_placeholder(i + 1, data_type))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table_ident(),
            names,
            placeholders
        );
        Ok(Statement {
            sql,
            params: values.into_iter().map(|(_, v)| v).collect(),
        })
    }

    pub fn delete(&self, id: i64) -> Statement {
        Statement::new(format!(
            "DELETE FROM {} WHERE {} = {}",
            self.table_ident(),
            self.identity_ident(),
            self.dialect.placeholder(1)
        ))
        .bind(Value::Integer(Some(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnDescriptor;
    use pretty_assertions::assert_eq;

    fn pilot() -> TableSchema {
        TableSchema::new(
            "pilot",
            vec![
                ColumnDescriptor::new("id", "integer", false),
                ColumnDescriptor::new("surname", "text", false),
                ColumnDescriptor::new("experience", "integer", true),
                ColumnDescriptor::new("salary", "numeric", true),
            ],
        )
        .unwrap()
    }

    fn edits() -> Vec<(String, Value)> {
        vec![
            ("surname".to_string(), Value::Text(Some("Ivanov".to_string()))),
            ("experience".to_string(), Value::Integer(Some(7))),
        ]
    }

    #[test]
    fn select_lists_columns_in_declared_order() {
        let table = pilot();
        let stmt = StatementBuilder::new(&table, Dialect::Sqlite).select_all();
        assert_eq!(
            stmt.sql,
            r#"SELECT "id", "surname", "experience", "salary" FROM "pilot" ORDER BY "pilot"."id""#
        );
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn postgres_select_reads_text_and_orders_by_typed_identity() {
        let table = pilot();
        let stmt = StatementBuilder::new(&table, Dialect::Postgres).select_all();
        assert_eq!(
            stmt.sql,
            concat!(
                r#"SELECT "id"::TEXT AS "id", "surname"::TEXT AS "surname", "#,
                r#""experience"::TEXT AS "experience", "salary"::TEXT AS "salary" "#,
                r#"FROM "pilot" ORDER BY "pilot"."id""#
            )
        );
    }

    #[test]
    fn update_postgres() {
        let table = pilot();
        let stmt = StatementBuilder::new(&table, Dialect::Postgres)
            .update(1, edits())
            .unwrap();
        assert_eq!(
            stmt.sql,
            concat!(
                r#"UPDATE "pilot" SET "surname" = CAST($1 AS text), "#,
                r#""experience" = CAST($2 AS integer) WHERE "id" = $3"#
            )
        );
        assert_eq!(stmt.params.len(), 3);
        assert_eq!(stmt.params[2], Value::Integer(Some(1)));
    }

    #[test]
    fn insert_sqlite() {
        let table = pilot();
        let stmt = StatementBuilder::new(&table, Dialect::Sqlite)
            .insert(edits())
            .unwrap();
        assert_eq!(
            stmt.sql,
            r#"INSERT INTO "pilot" ("surname", "experience") VALUES (?, ?)"#
        );
        assert_eq!(stmt.params.len(), 2);
    }

    #[test]
    fn insert_postgres_casts_to_declared_types() {
        let table = pilot();
        let stmt = StatementBuilder::new(&table, Dialect::Postgres)
            .insert(vec![
                ("surname".to_string(), Value::Text(Some("Ivanov".to_string()))),
                ("salary".to_string(), Value::Decimal(Some(Decimal::new(123456789, 2)))),
            ])
            .unwrap();
        assert_eq!(
            stmt.sql,
            concat!(
                r#"INSERT INTO "pilot" ("surname", "salary") "#,
                r#"VALUES (CAST($1 AS text), CAST($2 AS numeric))"#
            )
        );
    }

    #[test]
    fn insert_without_fields_uses_defaults() {
        let table = pilot();
        let stmt = StatementBuilder::new(&table, Dialect::Sqlite).insert(vec![]).unwrap();
        assert_eq!(stmt.sql, r#"INSERT INTO "pilot" DEFAULT VALUES"#);
    }

    #[test]
    fn delete_binds_identity() {
        let table = pilot();
        let stmt = StatementBuilder::new(&table, Dialect::Postgres).delete(42);
        assert_eq!(stmt.sql, r#"DELETE FROM "pilot" WHERE "id" = $1"#);
        assert_eq!(stmt.params, vec![Value::Integer(Some(42))]);
    }

    #[test]
    fn unknown_column_is_refused() {
        let table = pilot();
        let result = StatementBuilder::new(&table, Dialect::Postgres).update(
            1,
            vec![("surname = 'x' --".to_string(), Value::Text(None))],
        );
        assert!(matches!(result, Err(Error::UnknownColumn { .. })));
    }

    #[test]
    fn identity_column_is_refused() {
        let table = pilot();
        let result = StatementBuilder::new(&table, Dialect::Sqlite)
            .insert(vec![("id".to_string(), Value::Integer(Some(9)))]);
        assert!(matches!(result, Err(Error::InvalidValue { .. })));
    }

    #[test]
    fn update_without_fields_fails() {
        let table = pilot();
        let result = StatementBuilder::new(&table, Dialect::Postgres).update(1, vec![]);
        assert!(matches!(result, Err(Error::Persistence(_))));
    }

    #[test]
    fn quotes_embedded_quotes() {
        assert_eq!(quote_identifier(r#"we"ird"#), r#""we""ird""#);
    }
}
