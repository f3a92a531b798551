//! Table catalog - what a connection can see
//!
//! The list-tables call returns a flat list of tables. The picker needs the
//! same data grouped as database → schema → table, in the order the server
//! listed them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One table reachable through a connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePreviewItem {
    pub database_name: String,
    pub schema_name: String,
    pub table_name: String,
    #[serde(default)]
    pub row_count: u64,
}

impl TablePreviewItem {
    pub fn new(database: &str, schema: &str, table: &str, row_count: u64) -> Self {
        Self {
            database_name: database.to_string(),
            schema_name: schema.to_string(),
            table_name: table.to_string(),
            row_count,
        }
    }

    fn matches(&self, database: &str, schema: &str, table: &str) -> bool {
        self.database_name == database && self.schema_name == schema && self.table_name == table
    }
}

/// Build the composite `database.schema.table` id
pub fn table_id(database: &str, schema: &str, table: &str) -> String {
    format!("{}.{}.{}", database, schema, table)
}

/// Build the `database.schema` key used for schema expansion and outer paths
pub fn schema_key(database: &str, schema: &str) -> String {
    format!("{}.{}", database, schema)
}

/// Last dot-separated segment of a composite id
pub fn last_segment(id: &str) -> &str {
    id.rsplit('.').next().unwrap_or(id)
}

/// Everything before the last dot-separated segment
pub fn outer_path(id: &str) -> &str {
    id.rsplit_once('.').map(|(outer, _)| outer).unwrap_or("")
}

/// Three-level grouping of table names, insertion ordered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedCatalog {
    databases: IndexMap<String, IndexMap<String, Vec<String>>>,
}

impl NestedCatalog {
    /// Group items by database and schema.
    ///
    /// Order follows first appearance. Table names are appended as they come,
    /// so a name listed twice under the same schema yields two leaves.
    pub fn from_items(items: &[TablePreviewItem]) -> Self {
        let mut databases: IndexMap<String, IndexMap<String, Vec<String>>> = IndexMap::new();

        for item in items {
            databases
                .entry(item.database_name.clone())
                .or_default()
                .entry(item.schema_name.clone())
                .or_default()
                .push(item.table_name.clone());
        }

        Self { databases }
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }

    /// Iterate databases with their schemas
    pub fn databases(&self) -> impl Iterator<Item = (&str, &IndexMap<String, Vec<String>>)> {
        self.databases.iter().map(|(name, schemas)| (name.as_str(), schemas))
    }

    /// First table of the first schema of the first database
    pub fn first_table(&self) -> Option<(&str, &str, &str)> {
        let (database, schemas) = self.databases.first()?;
        let (schema, tables) = schemas.first()?;
        let table = tables.first()?;
        Some((database.as_str(), schema.as_str(), table.as_str()))
    }

    /// Total number of table leaves
    pub fn leaf_count(&self) -> usize {
        self.databases
            .values()
            .flat_map(|schemas| schemas.values())
            .map(|tables| tables.len())
            .sum()
    }

    /// All `database.schema` keys
    pub fn schema_keys(&self) -> Vec<String> {
        self.databases
            .iter()
            .flat_map(|(database, schemas)| {
                schemas.keys().map(move |schema| schema_key(database, schema))
            })
            .collect()
    }

    fn has_database(&self, database: &str) -> bool {
        self.databases.contains_key(database)
    }
}

/// A fetched catalog: the backing list plus its nested view
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub items: Vec<TablePreviewItem>,
    pub nested: NestedCatalog,
    /// Databases reported by the listing call, including ones with no tables
    pub databases: Vec<String>,
}

impl Catalog {
    pub fn new(items: Vec<TablePreviewItem>, databases: Vec<String>) -> Self {
        let nested = NestedCatalog::from_items(&items);
        Self {
            items,
            nested,
            databases,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nested.is_empty()
    }

    /// Row count of the first item matching `(database, schema, table)` exactly
    pub fn row_count(&self, database: &str, schema: &str, table: &str) -> Option<u64> {
        self.items
            .iter()
            .find(|item| item.matches(database, schema, table))
            .map(|item| item.row_count)
    }

    pub fn table_count(&self) -> usize {
        self.nested.leaf_count()
    }

    /// Listed databases that hold no visible table
    pub fn empty_databases(&self) -> impl Iterator<Item = &str> {
        self.databases
            .iter()
            .map(String::as_str)
            .filter(|database| !self.nested.has_database(database))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<TablePreviewItem> {
        vec![
            TablePreviewItem::new("RAW", "PUBLIC", "orders", 1000),
            TablePreviewItem::new("ANALYTICS", "MARTS", "revenue", 12),
            TablePreviewItem::new("RAW", "STAGING", "events", 7),
            TablePreviewItem::new("RAW", "PUBLIC", "users", 50),
        ]
    }

    fn tables<'a>(nested: &'a NestedCatalog, database: &str, schema: &str) -> Option<Vec<&'a str>> {
        let (_, schemas) = nested.databases().find(|(name, _)| *name == database)?;
        schemas
            .get(schema)
            .map(|tables| tables.iter().map(String::as_str).collect())
    }

    #[test]
    fn test_groups_by_database_and_schema() {
        let nested = NestedCatalog::from_items(&items());

        assert_eq!(tables(&nested, "RAW", "PUBLIC"), Some(vec!["orders", "users"]));
        assert_eq!(tables(&nested, "RAW", "STAGING"), Some(vec!["events"]));
        assert_eq!(tables(&nested, "ANALYTICS", "MARTS"), Some(vec!["revenue"]));
        assert_eq!(tables(&nested, "ANALYTICS", "PUBLIC"), None);
        assert_eq!(nested.leaf_count(), 4);
    }

    #[test]
    fn test_keeps_arrival_order_not_alphabetical() {
        let nested = NestedCatalog::from_items(&items());
        let databases: Vec<&str> = nested.databases().map(|(name, _)| name).collect();
        assert_eq!(databases, vec!["RAW", "ANALYTICS"]);

        let (_, raw) = nested.databases().next().unwrap();
        let raw_schemas: Vec<&String> = raw.keys().collect();
        assert_eq!(raw_schemas, vec!["PUBLIC", "STAGING"]);
    }

    #[test]
    fn test_duplicate_table_names_are_kept() {
        let nested = NestedCatalog::from_items(&[
            TablePreviewItem::new("DB", "S", "t", 1),
            TablePreviewItem::new("DB", "S", "t", 2),
        ]);
        assert_eq!(nested.leaf_count(), 2);
        assert_eq!(tables(&nested, "DB", "S"), Some(vec!["t", "t"]));
    }

    #[test]
    fn test_first_table_and_empty_catalog() {
        let nested = NestedCatalog::from_items(&items());
        assert_eq!(nested.first_table(), Some(("RAW", "PUBLIC", "orders")));

        let empty = NestedCatalog::from_items(&[]);
        assert!(empty.is_empty());
        assert_eq!(empty.first_table(), None);
        assert_eq!(empty.leaf_count(), 0);
    }

    #[test]
    fn test_row_count_uses_exact_match() {
        let catalog = Catalog::new(items(), vec![]);
        assert_eq!(catalog.row_count("RAW", "PUBLIC", "users"), Some(50));
        assert_eq!(catalog.row_count("RAW", "STAGING", "users"), None);
        assert_eq!(catalog.row_count("raw", "PUBLIC", "users"), None);
    }

    #[test]
    fn test_empty_databases_are_the_listed_ones_without_tables() {
        let catalog = Catalog::new(
            items(),
            vec!["RAW".to_string(), "EMPTY_DB".to_string(), "ANALYTICS".to_string()],
        );
        assert_eq!(catalog.empty_databases().collect::<Vec<_>>(), vec!["EMPTY_DB"]);

        let nothing_listed = Catalog::new(items(), vec![]);
        assert_eq!(nothing_listed.empty_databases().count(), 0);
    }

    #[test]
    fn test_id_helpers() {
        assert_eq!(table_id("DB", "SCHEMA", "orders"), "DB.SCHEMA.orders");
        assert_eq!(last_segment("DB.SCHEMA.orders"), "orders");
        assert_eq!(last_segment("orders"), "orders");
        assert_eq!(outer_path("DB.SCHEMA.orders"), "DB.SCHEMA");
        assert_eq!(outer_path("orders"), "");
    }

    #[test]
    fn test_schema_keys_are_database_scoped() {
        let nested = NestedCatalog::from_items(&[
            TablePreviewItem::new("A", "PUBLIC", "x", 0),
            TablePreviewItem::new("B", "PUBLIC", "y", 0),
        ]);
        assert_eq!(nested.schema_keys(), vec!["A.PUBLIC", "B.PUBLIC"]);
    }

    #[test]
    fn test_item_decodes_camel_case() {
        let json = r#"{"databaseName":"RAW","schemaName":"PUBLIC","tableName":"orders","rowCount":1000}"#;
        let item: TablePreviewItem = serde_json::from_str(json).unwrap();
        assert_eq!(item, TablePreviewItem::new("RAW", "PUBLIC", "orders", 1000));
    }
}
