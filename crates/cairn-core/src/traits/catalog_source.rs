use crate::errors::CairnResult;
use crate::models::{CatalogDependency, CatalogObject};

/// Relational catalog the graph store is built from.
pub trait ICatalogSource: Send + Sync {
    /// Every catalog object row.
    fn load_objects(&self) -> CairnResult<Vec<CatalogObject>>;

    /// Every dependency/lineage row.
    fn load_dependencies(&self) -> CairnResult<Vec<CatalogDependency>>;

    /// Human-readable source name.
    fn name(&self) -> &str;
}
