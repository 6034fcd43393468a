use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    common::error::{DatabaseError, DbResult},
    core::types::DataType,
    db::table::{ColumnDef, ID_COLUMN, Schema, TableDef},
};

/// The metadata catalog: every table's name and schema, in creation order.
///
/// Mutating operations return a new catalog and leave `self` alone, so the
/// caller decides whether the result is kept and persisted.
///
/// A deserialized catalog is held to the same rules as one built with
/// [`Catalog::create_table`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TableDef>", into = "Vec<TableDef>")]
pub struct Catalog {
    tables: Vec<TableDef>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if a table exists in the catalog.
    pub fn contains(&self, name: &str) -> bool {
        self.tables.iter().any(|table| table.name == name)
    }

    /// Gets a table definition by name.
    pub fn get_table(&self, name: &str) -> DbResult<&TableDef> {
        self.tables
            .iter()
            .find(|table| table.name == name)
            .ok_or_else(|| DatabaseError::UnknownTable(name.to_string()))
    }

    /// Gets the ordered schema of a table, `ID` first.
    pub fn get_schema(&self, name: &str) -> DbResult<&Schema> {
        self.get_table(name).map(TableDef::schema)
    }

    /// Table names in creation order.
    pub fn list_tables(&self) -> Vec<&str> {
        self.tables.iter().map(|table| table.name.as_str()).collect()
    }

    /// Returns a catalog with `name` added.
    ///
    /// Each spec is `columnName:typeName`. The `ID:int` column is prepended
    /// automatically and may not be declared by the caller.
    pub fn create_table<S: AsRef<str>>(&self, name: &str, column_specs: &[S]) -> DbResult<Self> {
        if self.contains(name) {
            return Err(DatabaseError::DuplicateTable(name.to_string()));
        }

        let mut seen = HashSet::from([ID_COLUMN.to_string()]);
        let mut columns = Vec::with_capacity(column_specs.len());

        for spec in column_specs {
            let spec = spec.as_ref();
            let column = ColumnDef::parse(spec)?;

            if !seen.insert(column.name.clone()) {
                let reason = if column.name == ID_COLUMN {
                    "ID is assigned automatically".to_string()
                } else {
                    format!("column \"{}\" is declared twice", column.name)
                };
                return Err(DatabaseError::MalformedColumnSpec {
                    spec: spec.to_string(),
                    reason,
                });
            }

            columns.push(column);
        }

        let mut catalog = self.clone();
        catalog
            .tables
            .push(TableDef::new(name.to_string(), Schema::with_id(columns)));
        Ok(catalog)
    }

    /// Returns a catalog without `name`.
    pub fn drop_table(&self, name: &str) -> DbResult<Self> {
        if !self.contains(name) {
            return Err(DatabaseError::UnknownTable(name.to_string()));
        }

        let mut catalog = self.clone();
        catalog.tables.retain(|table| table.name != name);
        Ok(catalog)
    }
}

impl TryFrom<Vec<TableDef>> for Catalog {
    type Error = DatabaseError;

    /// Rebuilds the catalog table by table, so stored schemas must start
    /// with `ID:int` and pass the same checks as new tables.
    fn try_from(tables: Vec<TableDef>) -> DbResult<Self> {
        let mut catalog = Catalog::new();

        for table in tables {
            let schema = table.schema();
            match schema.columns.first() {
                Some(first) if first.name == ID_COLUMN && first.data_type == DataType::Integer => {}
                _ => {
                    return Err(DatabaseError::MalformedColumnSpec {
                        spec: schema.to_string(),
                        reason: format!("table \"{}\" must start with ID:int", table.name),
                    });
                }
            }

            let specs: Vec<String> = schema.data_columns().iter().map(ToString::to_string).collect();
            catalog = catalog.create_table(&table.name, &specs)?;
        }

        Ok(catalog)
    }
}

impl From<Catalog> for Vec<TableDef> {
    fn from(catalog: Catalog) -> Self {
        catalog.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DataType;

    #[test]
    fn test_create_table_prepends_id() {
        let catalog = Catalog::new()
            .create_table("users", &["name:str", "age:int"])
            .unwrap();

        let schema = catalog.get_schema("users").unwrap();
        assert_eq!(
            schema.pairs(),
            vec![
                ("ID".to_string(), DataType::Integer),
                ("name".to_string(), DataType::Text),
                ("age".to_string(), DataType::Integer),
            ]
        );
    }

    #[test]
    fn test_create_table_leaves_receiver_unchanged() {
        let empty = Catalog::new();
        let catalog = empty.create_table("users", &["name:str"]).unwrap();

        assert!(empty.list_tables().is_empty());
        assert_eq!(catalog.list_tables(), ["users"]);
    }

    #[test]
    fn test_duplicate_table() {
        let catalog = Catalog::new().create_table("users", &["name:str"]).unwrap();
        let err = catalog.create_table("users", &["age:int"]).unwrap_err();
        assert!(matches!(err, DatabaseError::DuplicateTable(name) if name == "users"));
    }

    #[test]
    fn test_bad_column_specs() {
        let catalog = Catalog::new();

        assert!(matches!(
            catalog.create_table("t", &["name"]),
            Err(DatabaseError::MalformedColumnSpec { .. })
        ));
        assert!(matches!(
            catalog.create_table("t", &["price:float"]),
            Err(DatabaseError::UnsupportedType(_))
        ));
        assert!(matches!(
            catalog.create_table("t", &["ID:int"]),
            Err(DatabaseError::MalformedColumnSpec { .. })
        ));
        assert!(matches!(
            catalog.create_table("t", &["a:int", "a:str"]),
            Err(DatabaseError::MalformedColumnSpec { .. })
        ));
    }

    #[test]
    fn test_drop_table() {
        let catalog = Catalog::new()
            .create_table("users", &["name:str"])
            .unwrap()
            .create_table("orders", &["total:int"])
            .unwrap();

        let dropped = catalog.drop_table("users").unwrap();
        assert_eq!(dropped.list_tables(), ["orders"]);
        assert!(matches!(
            dropped.get_schema("users"),
            Err(DatabaseError::UnknownTable(_))
        ));

        let err = dropped.drop_table("users").unwrap_err();
        assert!(matches!(err, DatabaseError::UnknownTable(_)));
    }

    #[test]
    fn test_list_tables_in_creation_order() {
        let catalog = Catalog::new()
            .create_table("zebra", &["a:int"])
            .unwrap()
            .create_table("apple", &["b:int"])
            .unwrap();

        assert_eq!(catalog.list_tables(), ["zebra", "apple"]);
    }

    #[test]
    fn test_catalog_json_form() {
        let catalog = Catalog::new()
            .create_table("users", &["name:str", "active:bool"])
            .unwrap();

        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(
            json,
            r#"[{"name":"users","columns":["ID:int","name:str","active:bool"]}]"#
        );

        let decoded: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, catalog);
    }

    #[test]
    fn test_loaded_catalog_is_validated() {
        let load = |json: &str| serde_json::from_str::<Catalog>(json).unwrap_err().to_string();

        let missing_id = load(r#"[{"name":"t","columns":["name:str"]}]"#);
        assert!(missing_id.contains("must start with ID:int"));

        let id_as_text = load(r#"[{"name":"t","columns":["ID:str","name:str"]}]"#);
        assert!(id_as_text.contains("must start with ID:int"));

        let twice = load(r#"[{"name":"t","columns":["ID:int","a:int","a:str"]}]"#);
        assert!(twice.contains("column \"a\" is declared twice"));

        let second_id = load(r#"[{"name":"t","columns":["ID:int","ID:int"]}]"#);
        assert!(second_id.contains("ID is assigned automatically"));

        let same_table = load(
            r#"[{"name":"t","columns":["ID:int"]},{"name":"t","columns":["ID:int"]}]"#,
        );
        assert!(same_table.contains("Table \"t\" already exists"));
    }
}
