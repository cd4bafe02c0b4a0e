//! [`SearchEngine`]: owns the orchestrator, the graph store, the learner,
//! observability and the response caches.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Instrument};

use cairn_core::config::CairnConfig;
use cairn_core::errors::{CairnError, CairnResult, ExportError};
use cairn_core::models::query::normalize_query;
use cairn_core::models::{
    CategorySuggestion, ExportArtifact, ExportFormat, ExportOptions, FollowUpSuggestion,
    GraphStats, LearningAnalytics, LearningInteraction, SearchQuery, SearchResponse,
};
use cairn_core::traits::{
    ICatalogSource, IClassificationService, IQueryRewriter, ITextScorer, IVectorIndex,
};
use cairn_graph::{scheduler, GraphStore, TraversalConfig};
use cairn_learning::LearningEngine;
use cairn_observability::degradation::DegradationAlert;
use cairn_observability::ObservabilityEngine;
use cairn_retrieval::{QueryClassifier, Reranker, StrategyTable, VectorRetriever};

use crate::autocomplete::{self, RecentQueries};
use crate::cache::{cache_key, ResponseCache, ResponseStore};
use crate::export;
use crate::orchestrator::Orchestrator;

/// External services the engine talks to.
///
/// The text scorer, classification service and query rewriter are optional:
/// without them reranking is skipped, classification falls back to
/// heuristics plus keyword routing, and the agentic path uses the built-in
/// synonym expander.
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn ICatalogSource>,
    pub vector_index: Arc<dyn IVectorIndex>,
    pub text_scorer: Option<Arc<dyn ITextScorer>>,
    pub classification_service: Option<Arc<dyn IClassificationService>>,
    pub query_rewriter: Option<Arc<dyn IQueryRewriter>>,
}

impl Collaborators {
    pub fn new(catalog: Arc<dyn ICatalogSource>, vector_index: Arc<dyn IVectorIndex>) -> Self {
        Self {
            catalog,
            vector_index,
            text_scorer: None,
            classification_service: None,
            query_rewriter: None,
        }
    }

    pub fn with_text_scorer(mut self, scorer: Arc<dyn ITextScorer>) -> Self {
        self.text_scorer = Some(scorer);
        self
    }

    pub fn with_classification_service(mut self, service: Arc<dyn IClassificationService>) -> Self {
        self.classification_service = Some(service);
        self
    }

    pub fn with_query_rewriter(mut self, rewriter: Arc<dyn IQueryRewriter>) -> Self {
        self.query_rewriter = Some(rewriter);
        self
    }
}

/// The public search facade.
///
/// `ObservabilityEngine` needs `&mut self`, so it sits behind a `Mutex` that
/// is only held to record, never across an await.
pub struct SearchEngine {
    orchestrator: Orchestrator,
    graph: Arc<GraphStore>,
    vector: Arc<VectorRetriever>,
    learning: Arc<LearningEngine>,
    observability: Mutex<ObservabilityEngine>,
    cache: ResponseCache,
    store: ResponseStore,
    recent: RecentQueries,
    config: CairnConfig,
}

impl SearchEngine {
    /// Validate `config`, build the initial graph snapshot and wire every
    /// subsystem.
    pub fn new(config: CairnConfig, collaborators: Collaborators) -> CairnResult<Self> {
        config.validate()?;

        let graph = Arc::new(GraphStore::open(collaborators.catalog, &config.graph)?);
        let vector = Arc::new(VectorRetriever::new(collaborators.vector_index));

        let classifier = QueryClassifier::new(
            collaborators.classification_service,
            config.search.classifier_timeout(),
        );
        let strategies = StrategyTable::standard(
            Arc::clone(&vector),
            collaborators.query_rewriter,
            &config.retrieval,
            TraversalConfig::from(&config.graph),
        );
        let reranker = collaborators.text_scorer.map(|scorer| {
            Reranker::new(
                scorer,
                config.retrieval.rerank_max_candidates,
                config.search.rerank_timeout(),
            )
        });
        let orchestrator = Orchestrator::new(
            classifier,
            strategies,
            reranker,
            Arc::clone(&graph),
            config.search.clone(),
            &config.retrieval,
        );

        let stats = graph.get_stats()?;
        info!(
            nodes = stats.node_count,
            edges = stats.edge_count,
            generation = stats.generation,
            "search engine ready"
        );

        let mut observability = ObservabilityEngine::with_config(&config.observability);
        observability.record_graph_rebuild(&stats);

        Ok(Self {
            orchestrator,
            graph,
            vector,
            learning: Arc::new(LearningEngine::new(config.learning.clone())),
            observability: Mutex::new(observability),
            cache: ResponseCache::new(&config.cache),
            store: ResponseStore::new(&config.cache),
            recent: RecentQueries::new(config.cache.recent_query_capacity),
            config,
        })
    }

    pub fn config(&self) -> &CairnConfig {
        &self.config
    }

    pub fn graph(&self) -> &Arc<GraphStore> {
        &self.graph
    }

    pub fn learning(&self) -> &Arc<LearningEngine> {
        &self.learning
    }

    // --- Search ---

    pub async fn search(&self, query: SearchQuery) -> CairnResult<SearchResponse> {
        self.search_with_cancel(query, CancellationToken::new()).await
    }

    /// Answer `query`. Only `InvalidInput`, `AllPathsFailed` and `Cancelled`
    /// are returned as errors; everything else degrades the response.
    pub async fn search_with_cancel(
        &self,
        query: SearchQuery,
        cancel: CancellationToken,
    ) -> CairnResult<SearchResponse> {
        let started = Instant::now();
        if let Err(e) = query.validate() {
            self.observe(|o| o.record_error(&e));
            return Err(e);
        }

        let normalized = normalize_query(&query.text);
        let key = cache_key(&normalized, &query.options);
        let query_id = uuid::Uuid::new_v4().to_string();

        let outcome = match self.cache.get(&key) {
            Some(cached) => {
                debug!(
                    query_id = %query_id,
                    cached_id = %cached.response.query_id,
                    "response cache hit"
                );
                Arc::new(cached.as_cache_hit(query_id, started.elapsed().as_millis() as u64))
            }
            None => {
                let span = cairn_observability::search_span!(query_id, query.text);
                let result = self
                    .orchestrator
                    .run(&query, normalized, query_id, &cancel)
                    .instrument(span)
                    .await;
                let outcome = match result {
                    Ok(outcome) => Arc::new(outcome),
                    Err(e) => {
                        self.observe(|o| o.record_error(&e));
                        return Err(e);
                    }
                };
                let meta = &outcome.response.metadata;
                if meta.failed_paths().next().is_none() && !meta.degraded {
                    self.cache.insert(key, Arc::clone(&outcome));
                }
                outcome
            }
        };

        self.store.insert(Arc::clone(&outcome));
        self.recent.record(&outcome.normalized_query);

        if let Err(e) = self.learning.record_response(outcome.shown(&query.user_id)) {
            debug!(query_id = %outcome.response.query_id, error = %e, "learning record skipped");
        }

        let response = &outcome.response;
        let latency = started.elapsed();
        self.observe(|o| {
            o.record_response(response, latency);
            if !response.metadata.cache_hit {
                if query.options.enable_reranking {
                    o.record_rerank(response.metadata.reranked);
                }
                o.record_classification(
                    outcome.classification_source,
                    &response.metadata.classification_reason,
                );
            }
        });

        Ok(outcome.response.clone())
    }

    /// Autocomplete over catalog names and recently served queries.
    pub fn get_suggestions(&self, partial: &str, max: usize) -> CairnResult<Vec<String>> {
        let graph = self.graph.snapshot()?;
        let max = max.min(self.config.search.autocomplete_max);
        Ok(autocomplete::suggest(&graph, &self.recent, partial, max))
    }

    /// Follow-ups stored with a served response. Unknown ids give an empty list.
    pub fn get_follow_up_suggestions(&self, query_id: &str) -> Vec<FollowUpSuggestion> {
        self.store
            .get(query_id)
            .map(|outcome| outcome.response.follow_ups.clone())
            .unwrap_or_default()
    }

    pub fn get_response(&self, query_id: &str) -> Option<SearchResponse> {
        self.store.get(query_id).map(|o| o.response.clone())
    }

    pub fn export(
        &self,
        query_id: &str,
        format: ExportFormat,
        options: &ExportOptions,
    ) -> CairnResult<ExportArtifact> {
        let _span = cairn_observability::export_span!(query_id, format).entered();
        let outcome = self.store.get(query_id).ok_or_else(|| ExportError::QueryNotFound {
            query_id: query_id.to_string(),
        })?;
        let artifact = export::render(&outcome.response, format, options)?;
        info!(
            query_id,
            format = %format,
            bytes = artifact.bytes.len(),
            "results exported"
        );
        Ok(artifact)
    }

    // --- Learning ---

    pub fn record_interaction(&self, interaction: LearningInteraction) -> CairnResult<()> {
        self.learning.record_interaction(interaction).map(|_| ())
    }

    pub fn trigger_learning_update(&self) -> CairnResult<LearningAnalytics> {
        let analytics = self.learning.trigger_learning_update()?;
        let dropped = self.learning.dropped_events();
        self.observe(|o| o.record_learning_update(&analytics, dropped));
        Ok(analytics)
    }

    pub fn get_analytics(&self, since: Option<DateTime<Utc>>) -> CairnResult<LearningAnalytics> {
        self.learning.get_analytics(since)
    }

    pub fn generate_category_suggestions(
        &self,
        max: usize,
        min_confidence: f64,
    ) -> CairnResult<Vec<CategorySuggestion>> {
        self.learning.generate_category_suggestions(max, min_confidence)
    }

    // --- Graph and index maintenance ---

    /// Rebuild the catalog graph. Cached responses are dropped on success;
    /// on failure the previous snapshot keeps serving.
    pub fn rebuild_graph(&self) -> CairnResult<GraphStats> {
        match self.graph.rebuild() {
            Ok(stats) => {
                self.cache.clear();
                self.observe(|o| o.record_graph_rebuild(&stats));
                Ok(stats)
            }
            Err(e) => {
                let reason = e.to_string();
                self.observe(|o| o.record_graph_rebuild_failure(&reason));
                Err(e)
            }
        }
    }

    pub fn graph_stats(&self) -> CairnResult<GraphStats> {
        self.graph.get_stats()
    }

    /// Upsert every object in the current snapshot into the vector index.
    pub async fn reindex_vectors(&self) -> CairnResult<usize> {
        let graph = self.graph.snapshot()?;
        let objects: Vec<_> = graph.objects().cloned().collect();
        self.vector.index_catalog(&objects).await
    }

    /// Start scheduled graph rebuilds (when an interval is configured) and
    /// the learning worker. Both stop when `cancel` fires. Scheduled
    /// rebuilds go through [`SearchEngine::rebuild_graph`], so they clear
    /// the response cache and feed metrics like a manual rebuild.
    pub fn spawn_background(self: &Arc<Self>, cancel: CancellationToken) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();
        if self.config.graph.rebuild_interval_secs > 0 {
            let engine = Arc::clone(self);
            handles.push(scheduler::spawn_schedule(
                Duration::from_secs(self.config.graph.rebuild_interval_secs),
                cancel.clone(),
                move || engine.rebuild_graph(),
            ));
        }
        handles.push(self.learning.spawn_worker(cancel));
        handles
    }

    // --- Observability ---

    pub fn metrics_snapshot(&self) -> CairnResult<serde_json::Value> {
        self.lock_observability()?.metrics_snapshot()
    }

    pub fn degradation_alerts(&self) -> CairnResult<Vec<DegradationAlert>> {
        Ok(self.lock_observability()?.degradation_alerts())
    }

    fn lock_observability(&self) -> CairnResult<MutexGuard<'_, ObservabilityEngine>> {
        self.observability
            .lock()
            .map_err(|e| CairnError::ConcurrencyError(format!("observability poisoned: {e}")))
    }

    /// Recording is best effort; a poisoned lock only loses metrics.
    fn observe(&self, record: impl FnOnce(&mut ObservabilityEngine)) {
        match self.lock_observability() {
            Ok(mut engine) => record(&mut engine),
            Err(e) => warn!(error = %e, "observability skipped"),
        }
    }
}
