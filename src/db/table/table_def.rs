use serde::{Deserialize, Serialize};

use super::schema::Schema;

/// A catalog entry: a table name and its schema.
///
/// Row data lives separately in the storage gateway, keyed by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    /// The table name.
    pub name: String,

    /// The table's schema defining its columns.
    pub columns: Schema,
}

impl TableDef {
    /// Creates a new table definition with the given name and schema.
    pub fn new(name: String, columns: Schema) -> Self {
        Self { name, columns }
    }

    /// Returns the table's schema.
    pub fn schema(&self) -> &Schema {
        &self.columns
    }
}
