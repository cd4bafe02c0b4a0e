//! In-memory collaborators with injectable latency and failures.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use cairn_core::constants::{DESCRIPTION_COLLECTION, SIGNATURE_COLLECTION};
use cairn_core::errors::{CairnError, CairnResult, RetrievalError};
use cairn_core::models::{CatalogDependency, CatalogObject};
use cairn_core::traits::{
    IClassificationService, ICatalogSource, IQueryRewriter, ITextScorer, IVectorIndex,
    ServiceClassification, VectorFilter, VectorHit, VectorRecord,
};

use crate::{sample_catalog, tokens};

fn unavailable(backend: &str) -> CairnError {
    RetrievalError::Unavailable {
        backend: backend.to_string(),
        reason: "injected failure".to_string(),
    }
    .into()
}

fn overlap(query: &[String], text: &str) -> f64 {
    if query.is_empty() {
        return 0.0;
    }
    let doc: HashSet<String> = tokens(text).into_iter().collect();
    let hits = query.iter().filter(|t| doc.contains(*t)).count();
    hits as f64 / query.len() as f64
}

/// Latency and failure switches shared by the async mocks.
#[derive(Default)]
struct Faults {
    delay_ms: AtomicU64,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl Faults {
    async fn enter(&self, backend: &str) -> CairnResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable(backend));
        }
        Ok(())
    }
}

// --- Catalog source ---

pub struct FixtureCatalogSource {
    rows: Mutex<(Vec<CatalogObject>, Vec<CatalogDependency>)>,
    failing: AtomicBool,
    loads: AtomicUsize,
}

impl FixtureCatalogSource {
    pub fn new(objects: Vec<CatalogObject>, dependencies: Vec<CatalogDependency>) -> Self {
        Self {
            rows: Mutex::new((objects, dependencies)),
            failing: AtomicBool::new(false),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn sample() -> Self {
        let catalog = sample_catalog();
        Self::new(catalog.objects, catalog.dependencies)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Replace the rows the next rebuild will see.
    pub fn replace(&self, objects: Vec<CatalogObject>, dependencies: Vec<CatalogDependency>) {
        *self.rows.lock().unwrap() = (objects, dependencies);
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ICatalogSource for FixtureCatalogSource {
    fn load_objects(&self) -> CairnResult<Vec<CatalogObject>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CairnError::ConfigError("catalog database unreachable".into()));
        }
        Ok(self.rows.lock().unwrap().0.clone())
    }

    fn load_dependencies(&self) -> CairnResult<Vec<CatalogDependency>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CairnError::ConfigError("catalog database unreachable".into()));
        }
        Ok(self.rows.lock().unwrap().1.clone())
    }

    fn name(&self) -> &str {
        "fixture-catalog"
    }
}

// --- Vector index ---

/// Token-overlap "embedding" index over named collections.
#[derive(Default)]
pub struct MockVectorIndex {
    collections: Mutex<HashMap<String, Vec<VectorRecord>>>,
    faults: Faults,
}

impl MockVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every object's description and signature.
    pub fn from_catalog(objects: &[CatalogObject]) -> Self {
        let index = Self::new();
        {
            let mut collections = index.collections.lock().unwrap();
            for object in objects {
                let payload = payload_for(object);
                collections
                    .entry(DESCRIPTION_COLLECTION.to_string())
                    .or_default()
                    .push(VectorRecord {
                        document_id: object.id.clone(),
                        text: format!("{} {}", object.name, object.description),
                        payload: payload.clone(),
                    });
                collections
                    .entry(SIGNATURE_COLLECTION.to_string())
                    .or_default()
                    .push(VectorRecord {
                        document_id: object.id.clone(),
                        text: object.signature(),
                        payload,
                    });
            }
        }
        index
    }

    pub fn sample() -> Self {
        Self::from_catalog(&sample_catalog().objects)
    }

    pub fn set_delay(&self, delay: Duration) {
        self.faults
            .delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set_failing(&self, failing: bool) {
        self.faults.failing.store(failing, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.faults.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.collections.lock().unwrap().values().all(Vec::is_empty)
    }
}

fn payload_for(object: &CatalogObject) -> BTreeMap<String, String> {
    let mut payload = BTreeMap::new();
    payload.insert("database".to_string(), object.database.clone());
    payload.insert("object_type".to_string(), object.object_type.to_string());
    if let Some(category) = &object.category {
        payload.insert("category".to_string(), category.clone());
    }
    payload
}

fn matches_filters(payload: &BTreeMap<String, String>, filters: Option<&VectorFilter>) -> bool {
    filters.map_or(true, |filters| {
        filters.iter().all(|(field, accepted)| {
            payload
                .get(field)
                .is_some_and(|value| accepted.iter().any(|a| a.eq_ignore_ascii_case(value)))
        })
    })
}

#[async_trait]
impl IVectorIndex for MockVectorIndex {
    async fn query(
        &self,
        collection: &str,
        text: &str,
        top_k: usize,
        filters: Option<&VectorFilter>,
    ) -> CairnResult<Vec<VectorHit>> {
        self.faults.enter("mock-vector").await?;
        let query = tokens(text);
        let collections = self.collections.lock().unwrap();
        let mut hits: Vec<VectorHit> = collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| matches_filters(&r.payload, filters))
                    .map(|r| VectorHit {
                        document_id: r.document_id.clone(),
                        score: overlap(&query, &r.text),
                        collection: collection.to_string(),
                        payload: r.payload.clone(),
                    })
                    .filter(|h| h.score > 0.0)
                    .collect()
            })
            .unwrap_or_default();
        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn upsert(&self, collection: &str, records: Vec<VectorRecord>) -> CairnResult<()> {
        self.faults.enter("mock-vector").await?;
        let mut collections = self.collections.lock().unwrap();
        let stored = collections.entry(collection.to_string()).or_default();
        for record in records {
            stored.retain(|r| r.document_id != record.document_id);
            stored.push(record);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, document_ids: &[String]) -> CairnResult<()> {
        self.faults.enter("mock-vector").await?;
        if let Some(stored) = self.collections.lock().unwrap().get_mut(collection) {
            stored.retain(|r| !document_ids.contains(&r.document_id));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "mock-vector"
    }
}

// --- Text scorer ---

/// Scores by query-token overlap; optional per-document overrides.
#[derive(Default)]
pub struct MockTextScorer {
    overrides: Mutex<HashMap<String, f64>>,
    faults: Faults,
}

impl MockTextScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the score of any text containing `needle`.
    pub fn with_override(self, needle: &str, score: f64) -> Self {
        self.overrides
            .lock()
            .unwrap()
            .insert(needle.to_string(), score);
        self
    }

    pub fn set_delay(&self, delay: Duration) {
        self.faults
            .delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set_failing(&self, failing: bool) {
        self.faults.failing.store(failing, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.faults.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ITextScorer for MockTextScorer {
    async fn score_batch(&self, query: &str, texts: &[String]) -> CairnResult<Vec<f64>> {
        self.faults.enter("mock-scorer").await?;
        let query = tokens(query);
        let overrides = self.overrides.lock().unwrap();
        Ok(texts
            .iter()
            .map(|text| {
                overrides
                    .iter()
                    .find(|(needle, _)| text.contains(needle.as_str()))
                    .map(|(_, score)| *score)
                    .unwrap_or_else(|| overlap(&query, text))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "mock-scorer"
    }
}

// --- Classification service ---

pub struct MockClassificationService {
    response: Mutex<Option<ServiceClassification>>,
    faults: Faults,
}

impl MockClassificationService {
    pub fn returning(response: ServiceClassification) -> Self {
        Self {
            response: Mutex::new(Some(response)),
            faults: Faults::default(),
        }
    }

    /// A service that always errors.
    pub fn failing() -> Self {
        let service = Self {
            response: Mutex::new(None),
            faults: Faults::default(),
        };
        service.faults.failing.store(true, Ordering::SeqCst);
        service
    }

    pub fn set_delay(&self, delay: Duration) {
        self.faults
            .delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.faults.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IClassificationService for MockClassificationService {
    async fn classify(&self, _query: &str) -> CairnResult<ServiceClassification> {
        self.faults.enter("mock-classifier").await?;
        self.response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| unavailable("mock-classifier"))
    }

    fn name(&self) -> &str {
        "mock-classifier"
    }
}

// --- Query rewriter ---

pub struct MockQueryRewriter {
    suffix: String,
    faults: Faults,
}

impl MockQueryRewriter {
    /// Rewrites `q` into `q <suffix>`.
    pub fn appending(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
            faults: Faults::default(),
        }
    }

    pub fn failing() -> Self {
        let rewriter = Self::appending("");
        rewriter.faults.failing.store(true, Ordering::SeqCst);
        rewriter
    }

    pub fn call_count(&self) -> usize {
        self.faults.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IQueryRewriter for MockQueryRewriter {
    async fn rewrite(&self, query: &str) -> CairnResult<String> {
        self.faults.enter("mock-rewriter").await?;
        Ok(format!("{query} {}", self.suffix).trim().to_string())
    }

    fn name(&self) -> &str {
        "mock-rewriter"
    }
}
