use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CairnResult;
use crate::models::{ComplexityTier, RoutingPath};

/// Raw answer from the external classification service, before clamping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceClassification {
    pub primary: RoutingPath,
    #[serde(default)]
    pub secondary: Option<RoutingPath>,
    pub complexity: ComplexityTier,
    pub confidence: f64,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub entities: Vec<String>,
}

/// AI-backed routing classifier.
#[async_trait]
pub trait IClassificationService: Send + Sync {
    async fn classify(&self, query: &str) -> CairnResult<ServiceClassification>;

    fn name(&self) -> &str;
}
