//! Persistence gateway: where the catalog and table rows live between
//! commands.
//!
//! The engine never talks to storage directly. [`crate::Database`] loads the
//! state an operation needs, runs it, and saves what came back.

use crate::{catalog::Catalog, common::error::DbResult, db::table::Row};

pub mod json;
pub mod memory;

pub use json::JsonStorage;
pub use memory::MemoryStorage;

pub trait Storage {
    /// Loads the catalog, or an empty one if none was saved yet.
    fn load_catalog(&self) -> DbResult<Catalog>;

    /// Replaces the saved catalog.
    fn save_catalog(&mut self, catalog: &Catalog) -> DbResult<()>;

    /// Loads a table's rows, or nothing if none were saved yet.
    fn load_rows(&self, table: &str) -> DbResult<Vec<Row>>;

    /// Replaces a table's saved rows.
    fn save_rows(&mut self, table: &str, rows: &[Row]) -> DbResult<()>;

    /// Forgets a table's rows. Removing rows that were never saved is not
    /// an error.
    fn remove_rows(&mut self, table: &str) -> DbResult<()>;
}
