use std::collections::HashMap;

use super::Storage;
use crate::{catalog::Catalog, common::error::DbResult, db::table::Row};

/// Keeps everything in process memory. Nothing survives a restart.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    catalog: Catalog,
    rows: HashMap<String, Vec<Row>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load_catalog(&self) -> DbResult<Catalog> {
        Ok(self.catalog.clone())
    }

    fn save_catalog(&mut self, catalog: &Catalog) -> DbResult<()> {
        self.catalog = catalog.clone();
        Ok(())
    }

    fn load_rows(&self, table: &str) -> DbResult<Vec<Row>> {
        Ok(self.rows.get(table).cloned().unwrap_or_default())
    }

    fn save_rows(&mut self, table: &str, rows: &[Row]) -> DbResult<()> {
        self.rows.insert(table.to_string(), rows.to_vec());
        Ok(())
    }

    fn remove_rows(&mut self, table: &str) -> DbResult<()> {
        self.rows.remove(table);
        Ok(())
    }
}
