//! Test fixture loader and mock collaborators for the Cairn workspace.
//!
//! Provides the sample catalog used by every crate's tests plus in-memory
//! implementations of the collaborator traits with injectable latency and
//! failures.

pub mod mocks;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use cairn_core::models::{CatalogDependency, CatalogObject};

pub use mocks::{
    FixtureCatalogSource, MockClassificationService, MockQueryRewriter, MockTextScorer,
    MockVectorIndex,
};

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// Catalog rows as stored in `catalog/*.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFixture {
    pub objects: Vec<CatalogObject>,
    pub dependencies: Vec<CatalogDependency>,
}

/// The shared sample catalog: a shop, a finance warehouse with card data
/// flowing in from staging, a CRM copy of customer emails, and a three-way
/// procedure call cycle.
pub fn sample_catalog() -> CatalogFixture {
    load_fixture("catalog/sample_catalog.json")
}

/// Split text into lowercase alphanumeric tokens.
pub fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_catalog_loads() {
        assert!(fixture_exists("catalog/sample_catalog.json"));
        let catalog = sample_catalog();
        assert!(catalog.objects.len() > 20);
        assert!(catalog
            .objects
            .iter()
            .any(|o| o.id == "finance.dbo.PaymentsTable.CardNumber"));
    }

    #[test]
    fn every_dependency_endpoint_exists() {
        let catalog = sample_catalog();
        for dep in &catalog.dependencies {
            for id in [&dep.source_id, &dep.target_id] {
                assert!(
                    catalog.objects.iter().any(|o| &o.id == id),
                    "dangling endpoint {id}"
                );
            }
        }
    }

    #[test]
    fn tokens_split_on_punctuation() {
        assert_eq!(tokens("orders.customer_id"), vec!["orders", "customer", "id"]);
    }
}
