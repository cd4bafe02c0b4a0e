//! Catalog rows as delivered by the relational source.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of database object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Table,
    Column,
    Procedure,
    View,
    Function,
}

impl ObjectType {
    pub const ALL: [ObjectType; 5] = [
        Self::Table,
        Self::Column,
        Self::Procedure,
        Self::View,
        Self::Function,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Column => "column",
            Self::Procedure => "procedure",
            Self::View => "view",
            Self::Function => "function",
        }
    }

    /// Parse a type name, accepting plurals and common abbreviations.
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" | "tables" => Some(Self::Table),
            "column" | "columns" | "field" | "fields" => Some(Self::Column),
            "procedure" | "procedures" | "proc" | "procs" | "sproc" | "stored procedure" => {
                Some(Self::Procedure)
            }
            "view" | "views" => Some(Self::View),
            "function" | "functions" | "udf" => Some(Self::Function),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dependency/lineage edge type.
///
/// `References` and `Calls` point from the dependent object to its
/// dependency. `FlowsInto` points in data-flow direction, from source to
/// destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    References,
    Calls,
    FlowsInto,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 3] = [Self::References, Self::Calls, Self::FlowsInto];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::References => "REFERENCES",
            Self::Calls => "CALLS",
            Self::FlowsInto => "FLOWS_INTO",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "REFERENCES" => Some(Self::References),
            "CALLS" => Some(Self::Calls),
            "FLOWS_INTO" => Some(Self::FlowsInto),
            _ => None,
        }
    }

    /// True when the edge points from an upstream object to a downstream one
    /// (i.e. in the direction data flows).
    pub fn points_downstream(&self) -> bool {
        matches!(self, Self::FlowsInto)
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog object row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogObject {
    /// Fully qualified id, e.g. `shop.dbo.orders.customer_id`.
    pub id: String,
    pub object_type: ObjectType,
    pub name: String,
    pub database: String,
    #[serde(default)]
    pub schema: Option<String>,
    /// Owning object (a column's table).
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    /// PII classification such as `email` or `payment_card`.
    #[serde(default)]
    pub pii_category: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl CatalogObject {
    /// Structured signature used for the schema-signature embedding collection.
    pub fn signature(&self) -> String {
        let mut sig = format!("{} {}", self.object_type, self.id);
        if let Some(data_type) = &self.data_type {
            sig.push(' ');
            sig.push_str(data_type);
        }
        if let Some(parent) = &self.parent_id {
            sig.push_str(" in ");
            sig.push_str(parent);
        }
        sig
    }
}

/// One dependency row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDependency {
    pub source_id: String,
    pub target_id: String,
    pub kind: EdgeKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_kinds_serialize_screaming_case() {
        let json = serde_json::to_string(&EdgeKind::FlowsInto).unwrap();
        assert_eq!(json, "\"FLOWS_INTO\"");
        for kind in EdgeKind::ALL {
            assert_eq!(EdgeKind::from_str_name(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn object_type_accepts_plurals() {
        assert_eq!(ObjectType::from_str_name("Tables"), Some(ObjectType::Table));
        assert_eq!(ObjectType::from_str_name("procs"), Some(ObjectType::Procedure));
        assert_eq!(ObjectType::from_str_name("index"), None);
    }

    #[test]
    fn only_flows_into_points_downstream() {
        assert!(EdgeKind::FlowsInto.points_downstream());
        assert!(!EdgeKind::References.points_downstream());
        assert!(!EdgeKind::Calls.points_downstream());
    }
}
