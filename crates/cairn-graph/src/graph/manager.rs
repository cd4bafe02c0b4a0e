//! Single-writer / many-reader publication of graph snapshots.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use cairn_core::errors::{CairnError, CairnResult};

use super::arena::CatalogGraph;

/// Holds the current graph generation behind an `Arc`.
///
/// The lock is held only long enough to clone or replace the `Arc`, so
/// traversals never block a rebuild and a rebuild never disturbs a traversal
/// that already holds its snapshot.
pub struct GraphManager {
    current: RwLock<Arc<CatalogGraph>>,
    generation: AtomicU64,
    writer: Mutex<()>,
}

impl GraphManager {
    /// Start with an empty generation-0 graph.
    pub fn new() -> Self {
        Self::with_graph(CatalogGraph::new(0))
    }

    pub fn with_graph(graph: CatalogGraph) -> Self {
        let generation = graph.generation();
        Self {
            current: RwLock::new(Arc::new(graph)),
            generation: AtomicU64::new(generation),
            writer: Mutex::new(()),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> CairnResult<Arc<CatalogGraph>> {
        let guard = self
            .current
            .read()
            .map_err(|e| CairnError::ConcurrencyError(e.to_string()))?;
        Ok(Arc::clone(&guard))
    }

    /// Serialize writers. Held for the whole rebuild, not just the swap.
    pub fn writer_lock(&self) -> CairnResult<MutexGuard<'_, ()>> {
        self.writer
            .lock()
            .map_err(|e| CairnError::ConcurrencyError(e.to_string()))
    }

    /// Generation number the next rebuild should use.
    pub fn next_generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire) + 1
    }

    /// Publish a new graph. Returns the replaced snapshot.
    pub fn publish(&self, graph: CatalogGraph) -> CairnResult<Arc<CatalogGraph>> {
        let generation = graph.generation();
        let mut guard = self
            .current
            .write()
            .map_err(|e| CairnError::ConcurrencyError(e.to_string()))?;
        let previous = std::mem::replace(&mut *guard, Arc::new(graph));
        self.generation.store(generation, Ordering::Release);
        Ok(previous)
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl Default for GraphManager {
    fn default() -> Self {
        Self::new()
    }
}
