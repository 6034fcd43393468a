use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::schema::{ID_COLUMN, Schema};
use crate::core::types::Value;

/// A row of data keyed by column name.
///
/// Rows carry every column of their table's schema, `ID` included. Column
/// order for display comes from the schema, not from the row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    /// The values in this row.
    pub values: BTreeMap<String, Value>,
}

impl Row {
    /// Creates a new row from column/value pairs.
    pub fn new<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Builds a full row from an assigned ID and validated data values.
    ///
    /// `values` lines up positionally with [`Schema::data_columns`].
    pub fn from_values(schema: &Schema, id: i64, values: Vec<Value>) -> Self {
        let mut row = Self::default();
        row.values.insert(ID_COLUMN.to_string(), Value::Integer(id));
        for (column, value) in schema.data_columns().iter().zip(values) {
            row.values.insert(column.name.clone(), value);
        }
        row
    }

    /// Gets a reference to the value of the given column.
    pub fn get_value(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Replaces the value of an existing column.
    ///
    /// Returns `false` and leaves the row untouched if the column is absent.
    pub fn set_value(&mut self, column: &str, value: Value) -> bool {
        match self.values.get_mut(column) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// The row's `ID`, if it has an integer one.
    pub fn id(&self) -> Option<i64> {
        match self.values.get(ID_COLUMN) {
            Some(Value::Integer(id)) => Some(*id),
            _ => None,
        }
    }

    /// Values in schema column order; missing columns yield `None`.
    pub fn ordered<'a>(&'a self, schema: &'a Schema) -> impl Iterator<Item = Option<&'a Value>> {
        schema.column_names().map(|name| self.values.get(name))
    }
}
