//! Search-strategy resolution and capability negotiation for time-series
//! queries over Elasticsearch-compatible backends.
//!
//! Given an index pattern, a [`strategy::StrategyRegistry`] picks the most
//! specific backend able to serve it — a single pre-aggregated rollup
//! index when one matches, raw indices otherwise — and yields a
//! [`capabilities::Capabilities`] profile (supported intervals, fixed time
//! zone, batching) that query builders consult to emit valid requests.
//! The [`annotations::AnnotationQueryBuilder`] is the built-in consumer:
//! it validates annotation definitions, shapes one query per annotation
//! under the negotiated capabilities, executes them as a batched search,
//! and demultiplexes the ordered responses back onto annotation ids.
//!
//! Hosting processes extend resolution through
//! [`strategy::StrategyRegistry::register`]; the default strategy seeded
//! at construction guarantees every pattern resolves to something.

pub mod annotations;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod interval;
pub mod search;
pub mod strategy;

pub use config::Config;
pub use error::{Error, Result};
