// ABOUTME: Table browser state machine driving introspection, row selection and CRUD round-trips.
// ABOUTME: Every successful mutation is followed by a full reload of the current table.

use crate::crud::CrudExecutor;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::form::FieldBinding;
use crate::introspect::{self, TableView};
use crate::labels::display_labels;
use crate::schema::{Catalog, TableSchema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Browses tables and runs reports.
    Viewer,
    /// Browses and edits tables.
    Administrator,
}

impl Role {
    pub fn can_edit(self) -> bool {
        matches!(self, Role::Administrator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BrowserState {
    NoTable,
    TableLoaded,
    RowSelected,
}

/// Owns the current table view, the selected row and the form staged from it.
///
/// With a table loaded and no row selected the form is blank, ready for `add`.
/// Selecting another row discards any unsaved edits in the form.
#[derive(Debug)]
pub struct TableBrowser {
    role: Role,
    view: Option<TableView>,
    selected: Option<usize>,
    binding: Option<FieldBinding>,
}

impl TableBrowser {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            view: None,
            selected: None,
            binding: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> BrowserState {
        match (&self.view, self.selected) {
            (None, _) => BrowserState::NoTable,
            (Some(_), None) => BrowserState::TableLoaded,
            (Some(_), Some(_)) => BrowserState::RowSelected,
        }
    }

    pub fn view(&self) -> Option<&TableView> {
        self.view.as_ref()
    }

    pub fn current_table(&self) -> Option<&str> {
        self.view.as_ref().map(|v| v.descriptor.name.as_str())
    }

    /// Display labels for the current table's columns.
    pub fn headers(&self) -> Vec<String> {
        self.view
            .as_ref()
            .map(|v| display_labels(&v.descriptor.columns))
            .unwrap_or_default()
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.selected
    }

    pub fn binding(&self) -> Option<&FieldBinding> {
        self.binding.as_ref()
    }

    fn loaded(&self) -> Result<&TableView> {
        self.view.as_ref().ok_or(Error::NoTableLoaded)
    }

    fn schema<'c>(&self, catalog: &'c Catalog) -> Result<&'c TableSchema> {
        catalog.table(&self.loaded()?.descriptor.name)
    }

    fn require_edit(&self) -> Result<()> {
        if self.role.can_edit() {
            Ok(())
        } else {
            Err(Error::ReadOnly)
        }
    }

    /// Loads `name` and replaces all browser state. On failure the previous view is kept.
    pub async fn select_table(
        &mut self,
        db: &Database,
        catalog: &Catalog,
        name: &str,
    ) -> Result<&TableView> {
        let view = introspect::load_table(db, catalog, name).await?;
        let schema = catalog.table(name)?;
        self.binding = Some(FieldBinding::blank(schema));
        self.selected = None;
        Ok(&*self.view.insert(view))
    }

    pub fn select_row(&mut self, catalog: &Catalog, index: usize) -> Result<&FieldBinding> {
        let view = self.loaded()?;
        let row = view.rows.get(index).ok_or(Error::RowOutOfRange {
            index,
            len: view.rows.len(),
        })?;
        let binding = FieldBinding::bind(row, self.schema(catalog)?)?;
        self.selected = Some(index);
        Ok(&*self.binding.insert(binding))
    }

    pub fn clear_selection(&mut self, catalog: &Catalog) -> Result<()> {
        let schema = self.schema(catalog)?;
        self.binding = Some(FieldBinding::blank(schema));
        self.selected = None;
        Ok(())
    }

    pub fn edit_field(&mut self, column: &str, value: impl Into<String>) -> Result<()> {
        self.binding
            .as_mut()
            .ok_or(Error::NoTableLoaded)?
            .set(column, value)
    }

    fn selected_identity(&self, catalog: &Catalog) -> Result<i64> {
        let view = self.loaded()?;
        let index = self.selected.ok_or(Error::NoRowSelected)?;
        let schema = self.schema(catalog)?;
        let identity = &schema.identity().name;
        let raw = view
            .column_index(identity)
            .and_then(|col| view.rows.get(index).and_then(|row| row.get(col)))
            .ok_or(Error::RowOutOfRange {
                index,
                len: view.rows.len(),
            })?;
        raw.trim().parse::<i64>().map_err(|_| Error::InvalidValue {
            column: identity.clone(),
            value: raw.clone(),
            reason: "identity is not an integer".to_string(),
        })
    }

    fn current_binding(&self) -> Result<&FieldBinding> {
        self.binding.as_ref().ok_or(Error::NoTableLoaded)
    }

    async fn reload(&mut self, db: &Database, catalog: &Catalog) -> Result<()> {
        let name = self.loaded()?.descriptor.name.clone();
        self.select_table(db, catalog, &name).await?;
        Ok(())
    }

    /// Writes the form back to the selected row, reloads and re-selects the same row index.
    pub async fn save(&mut self, db: &Database, catalog: &Catalog) -> Result<()> {
        self.require_edit()?;
        let id = self.selected_identity(catalog)?;
        let index = self.selected.ok_or(Error::NoRowSelected)?;
        let table = self.loaded()?.descriptor.name.clone();

        CrudExecutor::new(db, catalog, &table)?
            .update(id, self.current_binding()?)
            .await?;

        self.reload(db, catalog).await?;
        if index < self.loaded()?.row_count() {
            self.select_row(catalog, index)?;
        }
        Ok(())
    }

    /// Inserts the form as a new row, reloads and selects the last row.
    pub async fn add(&mut self, db: &Database, catalog: &Catalog) -> Result<()> {
        self.require_edit()?;
        let table = self.loaded()?.descriptor.name.clone();

        CrudExecutor::new(db, catalog, &table)?
            .insert(self.current_binding()?)
            .await?;

        self.reload(db, catalog).await?;
        let count = self.loaded()?.row_count();
        if count > 0 {
            self.select_row(catalog, count - 1)?;
        }
        Ok(())
    }

    /// Deletes the selected row and reloads with nothing selected.
    pub async fn delete(&mut self, db: &Database, catalog: &Catalog) -> Result<()> {
        self.require_edit()?;
        let id = self.selected_identity(catalog)?;
        let table = self.loaded()?.descriptor.name.clone();

        CrudExecutor::new(db, catalog, &table)?.delete(id).await?;

        self.reload(db, catalog).await
    }
}
