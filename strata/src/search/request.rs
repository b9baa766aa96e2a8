use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::transport::{SearchBody, SearchTransport};
use crate::error::{Error, Result};

/// How a request's logical queries reach the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExecutionMode {
    /// All bodies share one physical `_msearch` round trip.
    Batched,
    /// One rollup-search round trip per body, in input order.
    RollupPerQuery,
}

/// One-shot executor for a batch of logical queries, created fresh per
/// logical request by the winning strategy. Construction issues no
/// backend call.
pub struct SearchRequest {
    transport: Arc<dyn SearchTransport>,
    index_pattern: String,
    mode: ExecutionMode,
}

impl SearchRequest {
    pub(crate) fn batched(transport: Arc<dyn SearchTransport>, index_pattern: &str) -> Self {
        Self {
            transport,
            index_pattern: index_pattern.to_string(),
            mode: ExecutionMode::Batched,
        }
    }

    pub(crate) fn rollup(transport: Arc<dyn SearchTransport>, index_pattern: &str) -> Self {
        Self {
            transport,
            index_pattern: index_pattern.to_string(),
            mode: ExecutionMode::RollupPerQuery,
        }
    }

    /// Execute the batch and return raw responses in input order.
    ///
    /// A "no matching indices" outcome from the backend returns an empty
    /// response list instead of an error: an unmapped index pattern is an
    /// expected state for optional data sources. Every other backend
    /// failure propagates unchanged.
    pub async fn search(&self, searches: Vec<SearchBody>) -> Result<Vec<Value>> {
        debug!(
            index_pattern = %self.index_pattern,
            queries = searches.len(),
            mode = ?self.mode,
            "executing search request"
        );

        let outcome = match self.mode {
            ExecutionMode::Batched => self.transport.msearch(&searches).await,
            ExecutionMode::RollupPerQuery => {
                let mut responses = Vec::with_capacity(searches.len());
                let mut result = Ok(());
                for search in &searches {
                    match self.transport.rollup_search(search).await {
                        Ok(response) => responses.push(response),
                        Err(err) => {
                            result = Err(err);
                            break;
                        }
                    }
                }
                result.map(|()| responses)
            }
        };

        match outcome {
            Ok(responses) => Ok(responses),
            Err(Error::MissingIndices(reason)) => {
                warn!(
                    index_pattern = %self.index_pattern,
                    %reason,
                    "index pattern matches no indices, returning empty responses"
                );
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }
}
