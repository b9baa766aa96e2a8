use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::{SearchStrategy, ViabilityCheck};
use crate::capabilities::Capabilities;
use crate::error::{Error, Result};
use crate::search::{SearchRequest, SearchTransport};

const WILDCARD_PATTERN: &str = "*";

/// True for patterns worth a rollup lookup: the bare match-all wildcard
/// can never resolve to exactly one rollup index.
fn is_candidate_pattern(index_pattern: &str) -> bool {
    !index_pattern.is_empty() && index_pattern != WILDCARD_PATTERN
}

/// Serves index patterns backed by pre-aggregated rollup data.
///
/// Viable only when the pattern resolves to exactly one rollup index;
/// ambiguous multi-index patterns defer to the default strategy.
pub struct RollupStrategy {
    transport: Arc<dyn SearchTransport>,
}

impl RollupStrategy {
    pub fn new(transport: Arc<dyn SearchTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl SearchStrategy for RollupStrategy {
    fn name(&self) -> &'static str {
        "rollup"
    }

    async fn check_viability(&self, index_pattern: &str) -> Result<ViabilityCheck> {
        if !is_candidate_pattern(index_pattern) {
            return Ok(ViabilityCheck::NotViable);
        }

        let rollup_data = match self.transport.rollup_capabilities(index_pattern).await {
            Ok(data) => data,
            // A pattern the backend cannot resolve is a normal negative
            // result, not a failure of the check itself.
            Err(Error::MissingIndices(_)) => return Ok(ViabilityCheck::NotViable),
            Err(err) => return Err(err),
        };

        if rollup_data.len() != 1 {
            debug!(
                index_pattern,
                rollup_indices = rollup_data.len(),
                "pattern does not resolve to exactly one rollup index"
            );
            return Ok(ViabilityCheck::NotViable);
        }

        Ok(ViabilityCheck::Viable(Capabilities::from_rollup(
            &rollup_data,
        )))
    }

    fn search_request(&self, index_pattern: &str) -> SearchRequest {
        SearchRequest::rollup(self.transport.clone(), index_pattern)
    }
}
