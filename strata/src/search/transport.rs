use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::capabilities::RollupData;
use crate::error::Result;

/// One logical query: the index pattern it targets and its request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchBody {
    pub index: String,
    pub body: Value,
}

impl SearchBody {
    pub fn new(index: impl Into<String>, body: Value) -> Self {
        Self {
            index: index.into(),
            body,
        }
    }
}

/// Opaque transport to the document-search backend.
///
/// Implementations map the backend's "no matching indices" failure to
/// [`Error::MissingIndices`](crate::Error::MissingIndices) and pass every
/// other failure through with its original status information.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Execute several logical queries in one physical round trip.
    /// Responses come back in request order.
    async fn msearch(&self, searches: &[SearchBody]) -> Result<Vec<Value>>;

    /// Execute a single query against a raw index.
    async fn search(&self, search: &SearchBody) -> Result<Value>;

    /// Execute a single query against a rollup index.
    async fn rollup_search(&self, search: &SearchBody) -> Result<Value>;

    /// Enumerate rollup jobs registered under an index pattern.
    async fn rollup_capabilities(&self, index_pattern: &str) -> Result<RollupData>;
}
