use async_trait::async_trait;
use std::sync::Arc;

use super::{SearchStrategy, ViabilityCheck};
use crate::capabilities::Capabilities;
use crate::error::Result;
use crate::search::{SearchRequest, SearchTransport};

/// The guaranteed fallback: viable for every index pattern, with an
/// unconstrained capability profile.
pub struct DefaultStrategy {
    transport: Arc<dyn SearchTransport>,
}

impl DefaultStrategy {
    pub fn new(transport: Arc<dyn SearchTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl SearchStrategy for DefaultStrategy {
    fn name(&self) -> &'static str {
        "default"
    }

    async fn check_viability(&self, _index_pattern: &str) -> Result<ViabilityCheck> {
        Ok(ViabilityCheck::Viable(Capabilities::unconstrained()))
    }

    fn search_request(&self, index_pattern: &str) -> SearchRequest {
        SearchRequest::batched(self.transport.clone(), index_pattern)
    }
}
