use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

use super::{DefaultStrategy, SearchStrategy, ViabilityCheck};
use crate::capabilities::Capabilities;
use crate::error::{Error, Result};
use crate::search::SearchTransport;

/// A resolved strategy paired with the capabilities it negotiated.
pub struct ResolvedSearchStrategy {
    pub strategy: Arc<dyn SearchStrategy>,
    pub capabilities: Capabilities,
}

impl std::fmt::Debug for ResolvedSearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSearchStrategy")
            .field("strategy", &self.strategy.name())
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

/// Ordered collection of search strategies.
///
/// Constructed once at service start and handed to consumers via `Arc`;
/// the default strategy is seeded at construction so every index pattern
/// resolves to something. Explicitly registered strategies take
/// precedence over the default and are evaluated in registration order.
/// The registry never shrinks.
pub struct StrategyRegistry {
    strategies: RwLock<Vec<Arc<dyn SearchStrategy>>>,
}

impl StrategyRegistry {
    /// Create a registry with the default strategy seeded as fallback.
    pub fn new(transport: Arc<dyn SearchTransport>) -> Self {
        let fallback: Arc<dyn SearchStrategy> = Arc::new(DefaultStrategy::new(transport));
        Self {
            strategies: RwLock::new(vec![fallback]),
        }
    }

    /// Registration hook for the hosting process: adds a strategy ahead
    /// of the default fallback, after previously registered ones.
    pub fn register(&self, strategy: Arc<dyn SearchStrategy>) {
        let mut strategies = self.strategies.write();
        let fallback_position = strategies.len().saturating_sub(1);
        debug!(strategy = strategy.name(), "registering search strategy");
        strategies.insert(fallback_position, strategy);
    }

    /// Resolve the first viable strategy for an index pattern.
    ///
    /// Strategies are checked sequentially so a later strategy's
    /// viability check never starts before an earlier one definitively
    /// reported non-viable.
    pub async fn resolve(&self, index_pattern: &str) -> Result<ResolvedSearchStrategy> {
        // Snapshot under the lock; viability checks await the backend and
        // must not hold it.
        let strategies: Vec<Arc<dyn SearchStrategy>> = self.strategies.read().clone();

        for strategy in strategies {
            if let ViabilityCheck::Viable(capabilities) =
                strategy.check_viability(index_pattern).await?
            {
                debug!(
                    strategy = strategy.name(),
                    index_pattern, "resolved search strategy"
                );
                return Ok(ResolvedSearchStrategy {
                    strategy,
                    capabilities,
                });
            }
        }

        Err(Error::NoViableStrategy(index_pattern.to_string()))
    }
}
