use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CairnResult;

/// Payload field -> accepted values. A hit matches when every field matches
/// one of its values.
pub type VectorFilter = BTreeMap<String, Vec<String>>;

/// One nearest-neighbour hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorHit {
    pub document_id: String,
    /// Similarity in [0.0, 1.0]; higher is closer.
    pub score: f64,
    pub collection: String,
    #[serde(default)]
    pub payload: BTreeMap<String, String>,
}

/// A document to write into a collection. The index embeds `text` itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub document_id: String,
    pub text: String,
    #[serde(default)]
    pub payload: BTreeMap<String, String>,
}

/// Embedding-backed similarity index with named collections.
#[async_trait]
pub trait IVectorIndex: Send + Sync {
    /// Nearest neighbours of `text` in `collection`, best first.
    ///
    /// An unreachable index is an error, never an empty list.
    async fn query(
        &self,
        collection: &str,
        text: &str,
        top_k: usize,
        filters: Option<&VectorFilter>,
    ) -> CairnResult<Vec<VectorHit>>;

    async fn upsert(&self, collection: &str, records: Vec<VectorRecord>) -> CairnResult<()>;

    async fn delete(&self, collection: &str, document_ids: &[String]) -> CairnResult<()>;

    fn name(&self) -> &str;
}
