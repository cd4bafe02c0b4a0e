use async_trait::async_trait;

use crate::errors::CairnResult;

/// Cross-encoder style relevance scorer used for late reranking.
#[async_trait]
pub trait ITextScorer: Send + Sync {
    /// Score every text against `query`. Output has the same length and
    /// order as `texts`; higher is more relevant.
    async fn score_batch(&self, query: &str, texts: &[String]) -> CairnResult<Vec<f64>>;

    fn name(&self) -> &str;
}
