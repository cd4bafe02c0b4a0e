//! Structured log events for key system operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a completed search.
pub fn search_completed(
    query_id: &str,
    routing_path: &str,
    result_count: usize,
    latency_ms: u64,
    degraded: bool,
) {
    tracing::info!(
        event = "search_completed",
        query_id = %query_id,
        routing_path = %routing_path,
        result_count = result_count,
        latency_ms = latency_ms,
        degraded = degraded,
        "search completed"
    );
}

/// Log a retrieval path that failed or timed out.
pub fn path_failed(query_id: &str, path: &str, reason: &str, elapsed_ms: u64) {
    tracing::warn!(
        event = "path_failed",
        query_id = %query_id,
        path = %path,
        reason = %reason,
        elapsed_ms = elapsed_ms,
        "retrieval path failed"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log a successful graph rebuild.
pub fn graph_rebuilt(generation: u64, node_count: usize, edge_count: usize, duration_ms: u64) {
    tracing::info!(
        event = "graph_rebuilt",
        generation = generation,
        node_count = node_count,
        edge_count = edge_count,
        duration_ms = duration_ms,
        "graph rebuilt"
    );
}

/// Log a completed learning batch.
pub fn learning_update_completed(processed_sequence: u64, responses: usize, interactions: usize) {
    tracing::info!(
        event = "learning_update_completed",
        processed_sequence = processed_sequence,
        responses = responses,
        interactions = interactions,
        "learning update completed"
    );
}

/// Log a response cache hit.
pub fn cache_hit(query_id: &str, normalized_query: &str) {
    tracing::debug!(
        event = "cache_hit",
        query_id = %query_id,
        normalized_query = %normalized_query,
        "response cache hit"
    );
}
