// ABOUTME: A role-scoped session: one database connection, its catalog and a table browser.
// ABOUTME: Opened on role selection and closed explicitly when navigating back or shutting down.

use crate::browser::{BrowserState, Role, TableBrowser};
use crate::config::ConnectionConfig;
use crate::db::Database;
use crate::error::Result;
use crate::form::{BoundField, FieldBinding};
use crate::introspect::{self, TableView};
use crate::reports::{self, Report, ReportKind};
use crate::schema::Catalog;
use chrono::NaiveDate;
use serde::Serialize;

pub struct Session {
    db: Database,
    catalog: Catalog,
    browser: TableBrowser,
}

/// Everything the display layer needs to redraw after an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowserSnapshot {
    pub role: Role,
    pub state: BrowserState,
    pub table: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub selected: Option<usize>,
    pub fields: Vec<BoundField>,
}

impl Session {
    /// Connects and snapshots the schema of the known tables.
    #[tracing::instrument(skip(config))]
    pub async fn open(config: &ConnectionConfig, role: Role) -> Result<Self> {
        let db = Database::connect(config).await?;
        let catalog = match introspect::build_catalog(&db).await {
            Ok(catalog) => catalog,
            Err(e) => {
                db.close().await;
                return Err(e);
            }
        };
        Ok(Self {
            db,
            catalog,
            browser: TableBrowser::new(role),
        })
    }

    pub fn role(&self) -> Role {
        self.browser.role()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn browser(&self) -> &TableBrowser {
        &self.browser
    }

    pub fn table_names(&self) -> Vec<String> {
        self.catalog.table_names()
    }

    pub async fn select_table(&mut self, name: &str) -> Result<&TableView> {
        self.browser.select_table(&self.db, &self.catalog, name).await
    }

    pub fn select_row(&mut self, index: usize) -> Result<&FieldBinding> {
        self.browser.select_row(&self.catalog, index)
    }

    pub fn clear_selection(&mut self) -> Result<()> {
        self.browser.clear_selection(&self.catalog)
    }

    pub fn edit_field(&mut self, column: &str, value: impl Into<String>) -> Result<()> {
        self.browser.edit_field(column, value)
    }

    pub async fn save(&mut self) -> Result<()> {
        self.browser.save(&self.db, &self.catalog).await
    }

    pub async fn add(&mut self) -> Result<()> {
        self.browser.add(&self.db, &self.catalog).await
    }

    pub async fn delete(&mut self) -> Result<()> {
        self.browser.delete(&self.db, &self.catalog).await
    }

    pub async fn run_report(&self, kind: ReportKind) -> Result<Report> {
        self.run_report_on(kind, chrono::Local::now().date_naive()).await
    }

    pub async fn run_report_on(&self, kind: ReportKind, today: NaiveDate) -> Result<Report> {
        reports::run_report(&self.db, kind, today).await
    }

    pub fn snapshot(&self) -> BrowserSnapshot {
        let view = self.browser.view();
        BrowserSnapshot {
            role: self.role(),
            state: self.browser.state(),
            table: view.map(|v| v.descriptor.name.clone()),
            headers: self.browser.headers(),
            rows: view.map(|v| v.rows.clone()).unwrap_or_default(),
            selected: self.browser.selected_row(),
            fields: self
                .browser
                .binding()
                .map(|b| b.fields().to_vec())
                .unwrap_or_default(),
        }
    }

    pub async fn close(self) {
        self.db.close().await;
    }
}
