use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    common::error::{DatabaseError, DbResult},
    core::types::DataType,
};

/// Definition of a single column in a table schema.
///
/// Stored in the catalog file in its textual `name:type` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnDef {
    /// The column name.
    pub name: String,

    /// The data type for values in this column.
    pub data_type: DataType,
}

impl ColumnDef {
    /// Creates a new column definition.
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_owned(),
            data_type,
        }
    }

    /// Parses a `name:type` column spec.
    ///
    /// Only the first `:` separates name from type, so `a:b:int` names a
    /// column `a` with the unsupported type `b:int`.
    pub fn parse(spec: &str) -> DbResult<Self> {
        let Some((name, type_name)) = spec.split_once(':') else {
            return Err(DatabaseError::MalformedColumnSpec {
                spec: spec.to_string(),
                reason: "missing `:` between name and type".to_string(),
            });
        };

        if name.is_empty() {
            return Err(DatabaseError::MalformedColumnSpec {
                spec: spec.to_string(),
                reason: "column name is empty".to_string(),
            });
        }

        Ok(Self::new(name, DataType::parse_name(type_name)?))
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.data_type)
    }
}

impl TryFrom<String> for ColumnDef {
    type Error = DatabaseError;

    fn try_from(spec: String) -> Result<Self, Self::Error> {
        Self::parse(&spec)
    }
}

impl From<ColumnDef> for String {
    fn from(column: ColumnDef) -> Self {
        column.to_string()
    }
}
