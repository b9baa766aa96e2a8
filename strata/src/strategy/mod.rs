//! Search strategies and their registry.
//!
//! A strategy judges whether it can serve a given index pattern and, when
//! it can, yields the capability profile downstream query builders must
//! respect. The registry resolves the first viable strategy in priority
//! order, with the default strategy seeded as a guaranteed fallback.

mod default;
mod registry;
mod rollup;

pub use default::DefaultStrategy;
pub use registry::{ResolvedSearchStrategy, StrategyRegistry};
pub use rollup::RollupStrategy;

use async_trait::async_trait;

use crate::capabilities::Capabilities;
use crate::error::Result;
use crate::search::SearchRequest;

/// Outcome of a viability check. Declining an index pattern is a normal
/// negative result driving fallthrough to the next strategy, never an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub enum ViabilityCheck {
    Viable(Capabilities),
    NotViable,
}

impl ViabilityCheck {
    pub fn is_viable(&self) -> bool {
        matches!(self, ViabilityCheck::Viable(_))
    }
}

/// A backend-selection strategy.
///
/// `check_viability` may call the backend (the rollup variant enumerates
/// rollup jobs) and must treat "pattern matches nothing" as a non-viable
/// outcome rather than an error; only genuine transport failures
/// propagate. `search_request` is lazy: building the request issues no
/// search.
#[async_trait]
pub trait SearchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check_viability(&self, index_pattern: &str) -> Result<ViabilityCheck>;

    fn search_request(&self, index_pattern: &str) -> SearchRequest;
}
