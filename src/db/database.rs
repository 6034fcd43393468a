use tracing::{debug, info, warn};

use crate::{
    catalog::Catalog,
    common::error::{DatabaseError, DbResult},
    config::Config,
    core::types::Value,
    db::{
        engine::{self, TableSummary},
        filter::{Assignments, Filter},
        table::{Row, Schema},
    },
    storage::{JsonStorage, Storage},
};

/// The main database handle.
///
/// `Database` sits between callers and the table engine. For every call it:
/// 1. loads the rows it needs from storage,
/// 2. runs the pure engine operation,
/// 3. persists the result, but only if the operation succeeded.
///
/// The catalog is loaded once when the handle is opened and written back
/// after every change. Rows are never cached; each call reads them fresh.
#[derive(Debug)]
pub struct Database<S: Storage = JsonStorage> {
    catalog: Catalog,
    storage: S,
}

impl Database<JsonStorage> {
    /// Opens the JSON-backed database described by `config`.
    pub fn open(config: &Config) -> DbResult<Self> {
        Self::with_storage(JsonStorage::from_config(config))
    }
}

impl<S: Storage> Database<S> {
    /// Opens a database on top of any storage gateway.
    pub fn with_storage(storage: S) -> DbResult<Self> {
        let catalog = storage.load_catalog()?;
        debug!(tables = catalog.list_tables().len(), "catalog loaded");
        Ok(Self { catalog, storage })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Creates a table and returns its full schema, `ID` included.
    ///
    /// Rows left behind by an earlier table of the same name are discarded
    /// so the new table always starts empty.
    pub fn create_table<C: AsRef<str>>(&mut self, name: &str, column_specs: &[C]) -> DbResult<&Schema> {
        let catalog = engine::create_table(&self.catalog, name, column_specs)?;

        self.storage.remove_rows(name)?;
        self.storage.save_catalog(&catalog)?;
        self.catalog = catalog;

        info!(table = name, "table created");
        self.catalog.get_schema(name)
    }

    /// Drops a table and reclaims its row storage.
    ///
    /// The drop is complete once the catalog is saved. Failing to reclaim
    /// the rows afterwards is only logged; `create_table` clears them again
    /// before the name is reused.
    pub fn drop_table(&mut self, name: &str) -> DbResult<()> {
        let catalog = engine::drop_table(&self.catalog, name)?;

        self.storage.save_catalog(&catalog)?;
        self.catalog = catalog;

        if let Err(err) = self.storage.remove_rows(name) {
            warn!(table = name, error = %err, "could not reclaim rows of dropped table");
        }

        info!(table = name, "table dropped");
        Ok(())
    }

    pub fn list_tables(&self) -> Vec<&str> {
        engine::list_tables(&self.catalog)
    }

    pub fn get_schema(&self, name: &str) -> DbResult<&Schema> {
        self.catalog.get_schema(name)
    }

    /// Validates and appends a row, returning the ID it was given.
    pub fn insert(&mut self, table: &str, raw_values: Vec<Value>) -> DbResult<i64> {
        let values = engine::insert_row(&self.catalog, table, raw_values)?;
        let schema = self.catalog.get_schema(table)?;

        let mut rows = self.storage.load_rows(table)?;
        let id = engine::next_row_id(&rows);
        rows.push(Row::from_values(schema, id, values));
        self.storage.save_rows(table, &rows)?;

        info!(table, id, "row inserted");
        Ok(id)
    }

    /// Returns the rows of `table` matching `filter` (all rows for `None`).
    pub fn select(&self, table: &str, filter: Option<&Filter>) -> DbResult<Vec<Row>> {
        self.ensure_table(table)?;

        let rows = self.storage.load_rows(table)?;
        let selected = engine::select_rows(&rows, filter);

        debug!(table, matched = selected.len(), "rows selected");
        Ok(selected)
    }

    /// Updates matching rows and returns how many changed.
    ///
    /// Assigned values are coerced to their columns' types first, so an
    /// update can never store a value of the wrong type.
    pub fn update(&mut self, table: &str, set: &Assignments, filter: &Filter) -> DbResult<usize> {
        let set = engine::coerce_assignments(self.catalog.get_schema(table)?, set)?;

        let rows = self.storage.load_rows(table)?;
        let (rows, updated) = engine::update_rows(&rows, &set, filter)?;
        self.storage.save_rows(table, &rows)?;

        info!(table, updated, "rows updated");
        Ok(updated)
    }

    /// Deletes matching rows and returns how many went.
    pub fn delete(&mut self, table: &str, filter: &Filter) -> DbResult<usize> {
        self.ensure_table(table)?;

        let rows = self.storage.load_rows(table)?;
        let (rows, deleted) = engine::delete_rows(&rows, filter)?;
        self.storage.save_rows(table, &rows)?;

        info!(table, deleted, "rows deleted");
        Ok(deleted)
    }

    pub fn info(&self, table: &str) -> DbResult<TableSummary> {
        self.ensure_table(table)?;

        let rows = self.storage.load_rows(table)?;
        engine::describe_table(&self.catalog, table, &rows)
    }

    fn ensure_table(&self, table: &str) -> DbResult<()> {
        if self.catalog.contains(table) {
            Ok(())
        } else {
            Err(DatabaseError::UnknownTable(table.to_string()))
        }
    }
}
