use async_trait::async_trait;

use crate::errors::CairnResult;

/// AI query expansion for the agentic path.
#[async_trait]
pub trait IQueryRewriter: Send + Sync {
    /// Rewrite `query` into a richer retrieval query.
    async fn rewrite(&self, query: &str) -> CairnResult<String>;

    fn name(&self) -> &str;
}
