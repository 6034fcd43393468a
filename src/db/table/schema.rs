use serde::{Deserialize, Serialize};

use super::column_def::ColumnDef;
use crate::core::types::DataType;

/// Name of the engine-managed identifier column.
pub const ID_COLUMN: &str = "ID";

/// A table schema defining the structure of rows.
///
/// An ordered list of column definitions. Schemas built through the catalog
/// always start with the `ID:int` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    /// The ordered list of column definitions.
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    /// Creates a new schema from a vector of column definitions.
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    /// Creates a schema with the `ID:int` column prepended to `columns`.
    pub fn with_id(columns: Vec<ColumnDef>) -> Self {
        let mut all = Vec::with_capacity(columns.len() + 1);
        all.push(ColumnDef::new(ID_COLUMN, DataType::Integer));
        all.extend(columns);
        Self::new(all)
    }

    /// Finds the index of a column by name.
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    /// The columns a caller supplies values for, i.e. everything but `ID`.
    pub fn data_columns(&self) -> &[ColumnDef] {
        match self.columns.first() {
            Some(first) if first.name == ID_COLUMN => &self.columns[1..],
            _ => &self.columns,
        }
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|col| col.name.as_str())
    }

    /// `(name, type)` pairs in schema order.
    pub fn pairs(&self) -> Vec<(String, DataType)> {
        self.columns
            .iter()
            .map(|col| (col.name.clone(), col.data_type))
            .collect()
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{column}")?;
        }
        Ok(())
    }
}
