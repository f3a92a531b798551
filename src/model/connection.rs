//! Warehouse connection draft and existing data sources

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported warehouse kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarehouseKind {
    #[default]
    Snowflake,
    BigQuery,
    Postgres,
}

impl WarehouseKind {
    pub fn all() -> [WarehouseKind; 3] {
        [
            WarehouseKind::Snowflake,
            WarehouseKind::BigQuery,
            WarehouseKind::Postgres,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            WarehouseKind::Snowflake => "Snowflake",
            WarehouseKind::BigQuery => "BigQuery",
            WarehouseKind::Postgres => "Postgres",
        }
    }

    pub fn next(&self) -> WarehouseKind {
        match self {
            WarehouseKind::Snowflake => WarehouseKind::BigQuery,
            WarehouseKind::BigQuery => WarehouseKind::Postgres,
            WarehouseKind::Postgres => WarehouseKind::Snowflake,
        }
    }

    /// Label for the host field, which means something different per kind
    pub fn host_label(&self) -> &'static str {
        match self {
            WarehouseKind::Snowflake => "Account identifier",
            WarehouseKind::BigQuery => "Project ID",
            WarehouseKind::Postgres => "Host",
        }
    }

    pub fn default_port(&self) -> Option<u16> {
        match self {
            WarehouseKind::Postgres => Some(5432),
            _ => None,
        }
    }

    pub fn uses_warehouse(&self) -> bool {
        matches!(self, WarehouseKind::Snowflake)
    }
}

impl fmt::Display for WarehouseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Credentials for a new connection
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDraft {
    pub kind: WarehouseKind,
    pub name: String,
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
}

impl fmt::Debug for ConnectionDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDraft")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .field("warehouse", &self.warehouse)
            .finish()
    }
}

impl ConnectionDraft {
    /// Name shown for the connection when the user left it blank
    pub fn effective_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("{} ({})", self.kind, self.host)
        } else {
            self.name.clone()
        }
    }
}

/// A connection that already exists in the workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: WarehouseKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_password() {
        let draft = ConnectionDraft {
            password: "hunter2".to_string(),
            ..Default::default()
        };
        let debug = format!("{:?}", draft);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn test_kind_cycles_through_all() {
        let mut kind = WarehouseKind::default();
        for expected in WarehouseKind::all().iter().skip(1) {
            kind = kind.next();
            assert_eq!(kind, *expected);
        }
        assert_eq!(kind.next(), WarehouseKind::Snowflake);
    }

    #[test]
    fn test_effective_name() {
        let mut draft = ConnectionDraft {
            kind: WarehouseKind::Postgres,
            host: "db.internal".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.effective_name(), "Postgres (db.internal)");

        draft.name = "Prod replica".to_string();
        assert_eq!(draft.effective_name(), "Prod replica");
    }

    #[test]
    fn test_serializes_kind_lowercase_and_skips_empty_options() {
        let draft = ConnectionDraft {
            kind: WarehouseKind::BigQuery,
            host: "my-project".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["kind"], "bigquery");
        assert!(json.get("port").is_none());
        assert!(json.get("warehouse").is_none());
    }
}
