//! The table engine.
//!
//! Every operation here is a pure function of the state it is handed: a
//! catalog and/or the current rows of one table. Nothing is cached between
//! calls and nothing touches storage. Mutations rebuild the row collection
//! and hand it back, so a failed call leaves the caller's state as it was.

use std::fmt;

use crate::{
    catalog::Catalog,
    common::error::{DatabaseError, DbResult},
    core::types::{DataType, Value, coerce},
    db::{
        filter::{Assignments, Filter},
        table::{ID_COLUMN, Row, Schema},
    },
};

pub fn create_table<S: AsRef<str>>(
    catalog: &Catalog,
    name: &str,
    column_specs: &[S],
) -> DbResult<Catalog> {
    catalog.create_table(name, column_specs)
}

pub fn drop_table(catalog: &Catalog, name: &str) -> DbResult<Catalog> {
    catalog.drop_table(name)
}

pub fn list_tables(catalog: &Catalog) -> Vec<&str> {
    catalog.list_tables()
}

/// Ordered `(column, type)` pairs of a table, `ID` first.
pub fn get_schema(catalog: &Catalog, name: &str) -> DbResult<Vec<(String, DataType)>> {
    catalog.get_schema(name).map(Schema::pairs)
}

/// Validates the values of a new row against the table's schema.
///
/// `raw_values` cover every column except `ID` and are coerced positionally.
/// The returned values are ready for [`Row::from_values`]; assigning the ID
/// and storing the row is left to the caller.
pub fn insert_row(catalog: &Catalog, table_name: &str, raw_values: Vec<Value>) -> DbResult<Vec<Value>> {
    let schema = catalog.get_schema(table_name)?;
    let columns = schema.data_columns();

    if raw_values.len() != columns.len() {
        return Err(DatabaseError::ArityMismatch {
            expected: columns.len(),
            actual: raw_values.len(),
        });
    }

    raw_values
        .into_iter()
        .zip(columns)
        .map(|(value, column)| coerce(value, column.data_type))
        .collect()
}

/// The ID for the next row: one past the largest existing ID, or 1.
pub fn next_row_id(rows: &[Row]) -> i64 {
    rows.iter().filter_map(Row::id).max().map_or(1, |max| max + 1)
}

/// Copies of every row matching `filter`, or of all rows without one.
pub fn select_rows(rows: &[Row], filter: Option<&Filter>) -> Vec<Row> {
    match filter {
        None => rows.to_vec(),
        Some(filter) => rows.iter().filter(|row| filter.matches(row)).cloned().collect(),
    }
}

/// Coerces assignment values to the types of the columns they target.
///
/// Assignments to columns the schema lacks are kept as they are; the update
/// itself ignores them. Assigning `ID` is rejected since IDs belong to the
/// engine.
pub fn coerce_assignments(schema: &Schema, set: &Assignments) -> DbResult<Assignments> {
    set.iter()
        .map(|(column, value)| {
            let Some(index) = schema.get_column_index(column) else {
                return Ok((column, value.clone()));
            };
            if column == ID_COLUMN {
                return Err(DatabaseError::InvalidValue {
                    value: value.literal(),
                    expected: "a column other than ID".to_string(),
                });
            }
            coerce(value.clone(), schema.columns[index].data_type).map(|value| (column, value))
        })
        .collect()
}

/// Applies `set` to every row matching `filter`.
///
/// Returns the whole collection in its original order and the number of
/// rows that matched. Fails with [`DatabaseError::NoRecordsAffected`] if
/// nothing matched.
pub fn update_rows(rows: &[Row], set: &Assignments, filter: &Filter) -> DbResult<(Vec<Row>, usize)> {
    let mut updated = 0;

    let new_rows = rows
        .iter()
        .map(|row| {
            if filter.matches(row) {
                updated += 1;
                set.apply(row)
            } else {
                row.clone()
            }
        })
        .collect();

    if updated == 0 {
        return Err(DatabaseError::NoRecordsAffected);
    }

    Ok((new_rows, updated))
}

/// Removes every row matching `filter`.
///
/// Survivors keep their order and IDs. Fails with
/// [`DatabaseError::NoRecordsAffected`] if nothing matched.
pub fn delete_rows(rows: &[Row], filter: &Filter) -> DbResult<(Vec<Row>, usize)> {
    let kept: Vec<Row> = rows.iter().filter(|row| !filter.matches(row)).cloned().collect();
    let deleted = rows.len() - kept.len();

    if deleted == 0 {
        return Err(DatabaseError::NoRecordsAffected);
    }

    Ok((kept, deleted))
}

/// Schema and size of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    pub name: String,
    pub schema: Schema,
    pub row_count: usize,
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table: {}", self.name)?;
        writeln!(f, "Columns: {}", self.schema)?;
        write!(f, "Records: {}", self.row_count)
    }
}

pub fn describe_table(catalog: &Catalog, table_name: &str, rows: &[Row]) -> DbResult<TableSummary> {
    let schema = catalog.get_schema(table_name)?;

    Ok(TableSummary {
        name: table_name.to_string(),
        schema: schema.clone(),
        row_count: rows.len(),
    })
}
