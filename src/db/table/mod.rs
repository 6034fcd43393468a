pub mod column_def;
pub mod row;
pub mod schema;
pub mod table_def;

pub use column_def::ColumnDef;
pub use row::Row;
pub use schema::{ID_COLUMN, Schema};
pub use table_def::TableDef;
