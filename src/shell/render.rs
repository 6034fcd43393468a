//! Turns command results into the text the shell prints.

use comfy_table::{Cell, ContentArrangement, Table};

use crate::db::table::{Row, Schema};

pub const NO_RECORDS: &str = "No records found.";
pub const NO_TABLES: &str = "No tables.";

pub const HELP: &str = "\
Commands:
  create_table <name> <column:type> ...      types: int, str, bool
  drop_table <name>
  list_tables
  insert into <name> values (<value>, ...)
  select from <name> [where <column> = <value> [and ...]]
  update <name> set <column> = <value>[, ...] where <column> = <value> [and ...]
  delete from <name> where <column> = <value> [and ...]
  info <name>
  help
  exit

Quote values to keep them as text: \"42\" is text, 42 is an integer.";

/// Renders rows as a table with one column per schema column, in schema
/// order.
pub fn rows_table(schema: &Schema, rows: &[Row]) -> String {
    if rows.is_empty() {
        return NO_RECORDS.to_string();
    }

    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_header(schema.column_names().map(Cell::new));

    for row in rows {
        table.add_row(
            row.ordered(schema)
                .map(|value| Cell::new(value.map(ToString::to_string).unwrap_or_default())),
        );
    }

    table.to_string()
}

pub fn table_list(tables: &[&str]) -> String {
    if tables.is_empty() {
        return NO_TABLES.to_string();
    }

    tables
        .iter()
        .map(|name| format!("- {name}"))
        .collect::<Vec<_>>()
        .join("\n")
}
