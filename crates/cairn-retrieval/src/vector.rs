//! Vector retriever over the description and schema-signature collections.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use cairn_core::constants::{DESCRIPTION_COLLECTION, MAX_VECTOR_TOP_K, SIGNATURE_COLLECTION};
use cairn_core::errors::{CairnError, CairnResult, RetrievalError};
use cairn_core::models::CatalogObject;
use cairn_core::traits::{IVectorIndex, VectorFilter, VectorHit, VectorRecord};

pub struct VectorRetriever {
    index: Arc<dyn IVectorIndex>,
}

impl VectorRetriever {
    pub fn new(index: Arc<dyn IVectorIndex>) -> Self {
        Self { index }
    }

    pub fn index_name(&self) -> &str {
        self.index.name()
    }

    /// Free-text similarity over object descriptions.
    pub async fn search_natural_language(
        &self,
        text: &str,
        top_k: usize,
        filters: Option<&VectorFilter>,
    ) -> CairnResult<Vec<VectorHit>> {
        check_top_k(top_k)?;
        self.query(DESCRIPTION_COLLECTION, text, top_k, filters).await
    }

    /// Similarity over structured schema signatures.
    pub async fn search_structured(
        &self,
        text: &str,
        top_k: usize,
        filters: Option<&VectorFilter>,
    ) -> CairnResult<Vec<VectorHit>> {
        check_top_k(top_k)?;
        self.query(SIGNATURE_COLLECTION, text, top_k, filters).await
    }

    /// Both collections concurrently; the union of both lists, not deduplicated.
    pub async fn search_hybrid(
        &self,
        text: &str,
        top_k: usize,
        filters: Option<&VectorFilter>,
    ) -> CairnResult<Vec<VectorHit>> {
        check_top_k(top_k)?;
        let (descriptions, signatures) = tokio::join!(
            self.query(DESCRIPTION_COLLECTION, text, top_k, filters),
            self.query(SIGNATURE_COLLECTION, text, top_k, filters),
        );
        let mut hits = descriptions?;
        hits.extend(signatures?);
        debug!(hits = hits.len(), "hybrid vector search");
        Ok(hits)
    }

    /// Upsert each object into both collections. Returns the object count.
    pub async fn index_catalog(&self, objects: &[CatalogObject]) -> CairnResult<usize> {
        let descriptions = objects
            .iter()
            .map(|o| VectorRecord {
                document_id: o.id.clone(),
                text: format!("{} {}", o.name, o.description),
                payload: payload_for(o),
            })
            .collect();
        let signatures = objects
            .iter()
            .map(|o| VectorRecord {
                document_id: o.id.clone(),
                text: o.signature(),
                payload: payload_for(o),
            })
            .collect();
        self.index
            .upsert(DESCRIPTION_COLLECTION, descriptions)
            .await
            .map_err(|e| self.unavailable(e))?;
        self.index
            .upsert(SIGNATURE_COLLECTION, signatures)
            .await
            .map_err(|e| self.unavailable(e))?;
        Ok(objects.len())
    }

    pub async fn remove_objects(&self, document_ids: &[String]) -> CairnResult<()> {
        for collection in [DESCRIPTION_COLLECTION, SIGNATURE_COLLECTION] {
            self.index
                .delete(collection, document_ids)
                .await
                .map_err(|e| self.unavailable(e))?;
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        text: &str,
        top_k: usize,
        filters: Option<&VectorFilter>,
    ) -> CairnResult<Vec<VectorHit>> {
        let mut hits = self
            .index
            .query(collection, text, top_k, filters)
            .await
            .map_err(|e| self.unavailable(e))?;
        hits.truncate(top_k);
        Ok(hits)
    }

    fn unavailable(&self, error: CairnError) -> CairnError {
        match error {
            CairnError::RetrievalError(_) => error,
            other => RetrievalError::Unavailable {
                backend: self.index.name().to_string(),
                reason: other.to_string(),
            }
            .into(),
        }
    }
}

/// Filter map from search option filters; `None` when no filter is set.
pub fn filter_map(
    databases: &[String],
    object_types: &[String],
    categories: &[String],
) -> Option<VectorFilter> {
    let mut filters = BTreeMap::new();
    for (field, values) in [
        ("database", databases),
        ("object_type", object_types),
        ("category", categories),
    ] {
        if !values.is_empty() {
            filters.insert(field.to_string(), values.to_vec());
        }
    }
    (!filters.is_empty()).then_some(filters)
}

fn payload_for(object: &CatalogObject) -> BTreeMap<String, String> {
    let mut payload = BTreeMap::new();
    payload.insert("database".to_string(), object.database.clone());
    payload.insert("object_type".to_string(), object.object_type.to_string());
    payload.insert("name".to_string(), object.name.clone());
    if let Some(category) = &object.category {
        payload.insert("category".to_string(), category.clone());
    }
    payload
}

fn check_top_k(top_k: usize) -> CairnResult<()> {
    if top_k == 0 || top_k > MAX_VECTOR_TOP_K {
        return Err(CairnError::invalid(format!(
            "top_k must be within 1..={MAX_VECTOR_TOP_K}, got {top_k}"
        )));
    }
    Ok(())
}
