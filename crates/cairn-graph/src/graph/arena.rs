//! petgraph arena holding catalog objects as nodes and typed dependency edges.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use cairn_core::errors::GraphError;
use cairn_core::models::{
    CatalogDependency, CatalogObject, EdgeKind, GraphStats, LineageDirection, PiiFlowPath,
};

/// The underlying directed graph type. Nodes are catalog rows; edge weights
/// are the dependency kind.
pub type CatalogDiGraph = DiGraph<CatalogObject, EdgeKind>;

/// One immutable generation of the catalog graph.
///
/// Readers hold it through an `Arc`; a rebuild produces a new value instead of
/// mutating this one.
pub struct CatalogGraph {
    graph: CatalogDiGraph,
    /// Map from node id to index for O(1) lookup.
    node_index: HashMap<String, NodeIndex>,
    edge_set: HashSet<(NodeIndex, NodeIndex, EdgeKind)>,
    generation: u64,
    built_at: Option<DateTime<Utc>>,
    build_duration_ms: u64,
    pii_flows: OnceLock<Vec<PiiFlowPath>>,
}

impl CatalogGraph {
    /// An empty graph for the given generation.
    pub fn new(generation: u64) -> Self {
        Self {
            graph: DiGraph::new(),
            node_index: HashMap::new(),
            edge_set: HashSet::new(),
            generation,
            built_at: None,
            build_duration_ms: 0,
            pii_flows: OnceLock::new(),
        }
    }

    /// Insert a catalog object. Returns `None` when the id already exists.
    pub fn add_node(&mut self, object: CatalogObject) -> Option<NodeIndex> {
        if self.node_index.contains_key(&object.id) {
            return None;
        }
        let id = object.id.clone();
        let idx = self.graph.add_node(object);
        self.node_index.insert(id, idx);
        Some(idx)
    }

    /// Insert a dependency edge. Returns `Ok(false)` for an exact duplicate.
    pub fn add_edge(&mut self, dependency: &CatalogDependency) -> Result<bool, GraphError> {
        let invalid = |reason: &str| GraphError::InvalidEdge {
            source_id: dependency.source_id.clone(),
            target_id: dependency.target_id.clone(),
            reason: reason.to_string(),
        };
        let source = self
            .index_of(&dependency.source_id)
            .ok_or_else(|| invalid("unknown source node"))?;
        let target = self
            .index_of(&dependency.target_id)
            .ok_or_else(|| invalid("unknown target node"))?;
        if !self.edge_set.insert((source, target, dependency.kind)) {
            return Ok(false);
        }
        self.graph.add_edge(source, target, dependency.kind);
        Ok(true)
    }

    pub(crate) fn mark_built(&mut self, built_at: DateTime<Utc>, duration_ms: u64) {
        self.built_at = Some(built_at);
        self.build_duration_ms = duration_ms;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogObject> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    pub fn node(&self, idx: NodeIndex) -> &CatalogObject {
        &self.graph[idx]
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Every catalog object in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &CatalogObject> {
        self.graph.node_weights()
    }

    /// Objects carrying a PII classification, sorted by id.
    pub fn pii_objects(&self) -> Vec<&CatalogObject> {
        let mut objects: Vec<_> = self
            .objects()
            .filter(|o| o.pii_category.is_some())
            .collect();
        objects.sort_by(|a, b| a.id.cmp(&b.id));
        objects
    }

    /// Objects whose `parent_id` is `parent`, sorted by id.
    pub fn children_of(&self, parent: &str) -> Vec<&CatalogObject> {
        let mut children: Vec<_> = self
            .objects()
            .filter(|o| o.parent_id.as_deref() == Some(parent))
            .collect();
        children.sort_by(|a, b| a.id.cmp(&b.id));
        children
    }

    /// Adjacent nodes one hop away in the given lineage direction, sorted by id.
    ///
    /// Downstream follows `FLOWS_INTO` forwards and `REFERENCES`/`CALLS`
    /// backwards (towards dependents). Upstream is the mirror image.
    pub fn neighbors(
        &self,
        idx: NodeIndex,
        direction: LineageDirection,
    ) -> Vec<(NodeIndex, EdgeKind)> {
        let downstream = direction == LineageDirection::Downstream;
        let mut out: Vec<(NodeIndex, EdgeKind)> = Vec::new();
        for edge in self.graph.edges_directed(idx, Direction::Outgoing) {
            let kind = *edge.weight();
            if kind.points_downstream() == downstream {
                out.push((edge.target(), kind));
            }
        }
        for edge in self.graph.edges_directed(idx, Direction::Incoming) {
            let kind = *edge.weight();
            if kind.points_downstream() != downstream {
                out.push((edge.source(), kind));
            }
        }
        out.sort_by(|a, b| {
            self.graph[a.0]
                .id
                .cmp(&self.graph[b.0].id)
                .then(a.1.cmp(&b.1))
        });
        out.dedup_by_key(|(n, _)| *n);
        out
    }

    /// Resolve a user-supplied identifier to a node.
    ///
    /// Tries the exact id, then a case-insensitive match on a dotted suffix of
    /// the id (`orders.customer_id` matches `shop.dbo.orders.customer_id`),
    /// then the bare object name. Ambiguous matches prefer the shortest id,
    /// then the lexicographically smallest.
    pub fn resolve(&self, identifier: &str) -> Option<&CatalogObject> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }
        if let Some(object) = self.get(identifier) {
            return Some(object);
        }
        let needle = identifier.to_lowercase();
        let dotted = format!(".{needle}");
        fn pick(candidates: Vec<&CatalogObject>) -> Option<&CatalogObject> {
            candidates
                .into_iter()
                .min_by(|a, b| a.id.len().cmp(&b.id.len()).then(a.id.cmp(&b.id)))
        }

        let by_suffix: Vec<_> = self
            .objects()
            .filter(|o| {
                let id = o.id.to_lowercase();
                id == needle || id.ends_with(&dotted)
            })
            .collect();
        if !by_suffix.is_empty() {
            return pick(by_suffix);
        }

        let by_name: Vec<_> = self
            .objects()
            .filter(|o| o.name.eq_ignore_ascii_case(identifier))
            .collect();
        pick(by_name)
    }

    /// Cached PII flows for this generation, computed on first use.
    pub fn pii_flows_cached<F>(&self, compute: F) -> &[PiiFlowPath]
    where
        F: FnOnce() -> Vec<PiiFlowPath>,
    {
        self.pii_flows.get_or_init(compute)
    }

    pub fn stats(&self) -> GraphStats {
        let mut nodes_by_type = BTreeMap::new();
        for object in self.objects() {
            *nodes_by_type
                .entry(object.object_type.as_str().to_string())
                .or_insert(0) += 1;
        }
        let mut edges_by_kind = BTreeMap::new();
        for kind in self.graph.edge_weights() {
            *edges_by_kind.entry(kind.as_str().to_string()).or_insert(0) += 1;
        }
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            nodes_by_type,
            edges_by_kind,
            pii_node_count: self.objects().filter(|o| o.pii_category.is_some()).count(),
            generation: self.generation,
            built_at: self.built_at,
            build_duration_ms: self.build_duration_ms,
        }
    }
}

impl Default for CatalogGraph {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::models::ObjectType;

    fn object(id: &str, object_type: ObjectType) -> CatalogObject {
        CatalogObject {
            id: id.to_string(),
            object_type,
            name: id.rsplit('.').next().unwrap_or(id).to_string(),
            database: id.split('.').next().unwrap_or(id).to_string(),
            schema: None,
            parent_id: None,
            description: String::new(),
            category: None,
            pii_category: None,
            data_type: None,
            properties: Default::default(),
        }
    }

    fn dep(source: &str, target: &str, kind: EdgeKind) -> CatalogDependency {
        CatalogDependency {
            source_id: source.into(),
            target_id: target.into(),
            kind,
        }
    }

    #[test]
    fn duplicate_nodes_and_edges_are_ignored() {
        let mut g = CatalogGraph::new(1);
        assert!(g.add_node(object("db.a", ObjectType::Table)).is_some());
        assert!(g.add_node(object("db.a", ObjectType::Table)).is_none());
        g.add_node(object("db.b", ObjectType::View));
        assert!(g.add_edge(&dep("db.b", "db.a", EdgeKind::References)).unwrap());
        assert!(!g.add_edge(&dep("db.b", "db.a", EdgeKind::References)).unwrap());
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn edge_to_unknown_node_is_invalid() {
        let mut g = CatalogGraph::new(1);
        g.add_node(object("db.a", ObjectType::Table));
        let err = g
            .add_edge(&dep("db.a", "db.missing", EdgeKind::FlowsInto))
            .unwrap_err();
        assert!(err.to_string().contains("unknown target"));
    }

    #[test]
    fn neighbors_follow_edge_orientation() {
        let mut g = CatalogGraph::new(1);
        for id in ["db.src", "db.table", "db.view"] {
            g.add_node(object(id, ObjectType::Table));
        }
        // view references table; src flows into table
        g.add_edge(&dep("db.view", "db.table", EdgeKind::References)).unwrap();
        g.add_edge(&dep("db.src", "db.table", EdgeKind::FlowsInto)).unwrap();

        let table = g.index_of("db.table").unwrap();
        let down: Vec<_> = g
            .neighbors(table, LineageDirection::Downstream)
            .into_iter()
            .map(|(n, _)| g.node(n).id.clone())
            .collect();
        let up: Vec<_> = g
            .neighbors(table, LineageDirection::Upstream)
            .into_iter()
            .map(|(n, _)| g.node(n).id.clone())
            .collect();
        assert_eq!(down, vec!["db.view".to_string()]);
        assert_eq!(up, vec!["db.src".to_string()]);
    }

    #[test]
    fn resolve_prefers_exact_then_suffix_then_name() {
        let mut g = CatalogGraph::new(1);
        g.add_node(object("shop.dbo.orders", ObjectType::Table));
        g.add_node(object("shop.dbo.orders.customer_id", ObjectType::Column));
        g.add_node(object("crm.dbo.customers.customer_id", ObjectType::Column));

        assert_eq!(g.resolve("shop.dbo.orders").unwrap().id, "shop.dbo.orders");
        assert_eq!(
            g.resolve("Orders.Customer_ID").unwrap().id,
            "shop.dbo.orders.customer_id"
        );
        // Ambiguous bare name: shortest id wins
        assert_eq!(
            g.resolve("customer_id").unwrap().id,
            "shop.dbo.orders.customer_id"
        );
        assert!(g.resolve("invoices").is_none());
        assert!(g.resolve("  ").is_none());
    }

    #[test]
    fn stats_count_types_and_kinds() {
        let mut g = CatalogGraph::new(7);
        g.add_node(object("db.a", ObjectType::Table));
        let mut col = object("db.a.email", ObjectType::Column);
        col.pii_category = Some("email".into());
        g.add_node(col);
        g.add_edge(&dep("db.a.email", "db.a", EdgeKind::FlowsInto)).unwrap();

        let stats = g.stats();
        assert_eq!(stats.generation, 7);
        assert_eq!(stats.nodes_by_type["table"], 1);
        assert_eq!(stats.nodes_by_type["column"], 1);
        assert_eq!(stats.edges_by_kind["FLOWS_INTO"], 1);
        assert_eq!(stats.pii_node_count, 1);
    }
}
