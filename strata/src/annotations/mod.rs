//! Annotation queries: declarative annotation definitions, per-annotation
//! query bodies shaped by negotiated capabilities, batched execution, and
//! demultiplexing of responses back onto annotation ids.

mod body;
mod builder;
mod response;

pub use body::annotation_query_body;
pub use builder::{AnnotationQueryBuilder, AnnotationResults};
pub use response::{events_from_response, AnnotationEvent};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::TimeInterval;

/// One annotation source: where its events live and how to render them.
/// Produced by configuration, consumed read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationDefinition {
    pub id: String,
    #[serde(default)]
    pub index_pattern: String,
    #[serde(default)]
    pub time_field: String,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub template: String,
    /// Optional filter narrowing which documents count as events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,
}

impl AnnotationDefinition {
    /// A definition is queryable only when every required field is set.
    pub fn is_valid(&self) -> bool {
        !self.index_pattern.is_empty()
            && !self.time_field.is_empty()
            && !self.fields.is_empty()
            && !self.icon.is_empty()
            && !self.template.is_empty()
    }
}

/// A panel: the index pattern its strategy is resolved against plus the
/// annotation sources drawn on top of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelDefinition {
    pub index_pattern: String,
    #[serde(default)]
    pub annotations: Vec<AnnotationDefinition>,
    /// Requested histogram interval; subject to capability validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<TimeInterval>,
    /// Requested time zone; a backend with a fixed zone overrides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Absolute time range a panel is asking about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeRange {
    pub min: DateTime<Utc>,
    pub max: DateTime<Utc>,
}
