use std::collections::BTreeMap;

use crate::{core::types::Value, db::table::Row};

/// A conjunction of `column = value` equalities.
///
/// Column names are not checked against any schema. A column the row does
/// not have simply fails to match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Filter {
    conditions: BTreeMap<String, Vec<Value>>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality. Naming a column twice with different values gives
    /// a filter no row can satisfy.
    pub fn and(mut self, column: impl Into<String>, value: Value) -> Self {
        let values = self.conditions.entry(column.into()).or_default();
        if !values.contains(&value) {
            values.push(value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.conditions
            .iter()
            .flat_map(|(column, values)| values.iter().map(move |value| (column.as_str(), value)))
    }

    /// True when every condition holds for `row`. An empty filter matches
    /// every row.
    ///
    /// Equality is strict on type: `1`, `true` and `"1"` are all different.
    pub fn matches(&self, row: &Row) -> bool {
        self.iter()
            .all(|(column, expected)| row.get_value(column) == Some(expected))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Filter {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |filter, (column, value)| filter.and(column, value))
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (column, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " and ")?;
            }
            write!(f, "{column} = {}", value.literal())?;
        }
        Ok(())
    }
}

/// Column assignments for an update, `column = new value`.
///
/// Assignments naming a column the row lacks are skipped for that row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignments {
    values: BTreeMap<String, Value>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: impl Into<String>, value: Value) -> Self {
        self.values.insert(column.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns a copy of `row` with every applicable assignment applied.
    pub fn apply(&self, row: &Row) -> Row {
        let mut updated = row.clone();
        for (column, value) in &self.values {
            updated.set_value(column, value.clone());
        }
        updated
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Assignments {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |set, (column, value)| set.set(column, value))
    }
}
