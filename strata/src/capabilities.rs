//! Capability profiles negotiated during strategy resolution.
//!
//! A [`Capabilities`] value describes what the chosen backend supports:
//! which aggregations each field carries, whether the backend pins a time
//! zone, the native interval of pre-aggregated data, and whether multiple
//! logical queries may share one physical request. Downstream query
//! builders consult it so the bodies they emit stay valid for the backend
//! that will serve them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::interval::{IntervalUnit, TimeInterval};

/// Field name -> supported aggregation descriptors.
pub type FieldsCapabilities = HashMap<String, Vec<AggCapability>>;

/// One aggregation descriptor as the backend advertises it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggCapability {
    pub agg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,
}

/// Per-index rollup job data, keyed by rollup index name. Mirrors the
/// backend's rollup capability lookup reply.
pub type RollupData = HashMap<String, RollupIndexCapabilities>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollupIndexCapabilities {
    #[serde(default)]
    pub rollup_jobs: Vec<RollupJob>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupJob {
    pub job_id: String,
    pub rollup_index: String,
    pub index_pattern: String,
    #[serde(default)]
    pub fields: FieldsCapabilities,
}

type IntervalRule = fn(&TimeInterval, &TimeInterval) -> bool;

/// User interval must never be finer-grained than what was pre-aggregated.
fn interval_at_least_default(user: &TimeInterval, default: &TimeInterval) -> bool {
    user.as_millis() >= default.as_millis()
}

/// User interval must keep bucket boundaries aligned with the stored ones.
fn interval_multiple_of_default(user: &TimeInterval, default: &TimeInterval) -> bool {
    user.is_multiple_of(default)
}

/// Rules applied when the backend carries a native interval. All must pass
/// for a user-supplied interval to be accepted.
const PREAGGREGATED_INTERVAL_RULES: &[IntervalRule] =
    &[interval_at_least_default, interval_multiple_of_default];

/// What a resolved backend supports. Immutable after construction.
///
/// `fixed_time_zone` and `default_time_interval` are only present when
/// derived from an actual pre-aggregation definition; absence means the
/// caller's own values are authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct Capabilities {
    batch_requests_support: bool,
    fields: FieldsCapabilities,
    date_histogram: Option<AggCapability>,
}

impl Capabilities {
    /// Capabilities of a raw (non-aggregated) backend: no interval or time
    /// zone constraints, batched requests supported.
    pub fn unconstrained() -> Self {
        Self {
            batch_requests_support: true,
            fields: FieldsCapabilities::new(),
            date_histogram: None,
        }
    }

    /// Capabilities of a rollup-backed index, merging the field
    /// descriptors of every job registered under it. Rollup search does
    /// not support batched requests.
    pub fn from_rollup(rollup_data: &RollupData) -> Self {
        let mut fields = FieldsCapabilities::new();
        for index_caps in rollup_data.values() {
            for job in &index_caps.rollup_jobs {
                for (field, descriptors) in &job.fields {
                    fields
                        .entry(field.clone())
                        .or_default()
                        .extend(descriptors.iter().cloned());
                }
            }
        }

        let date_histogram = find_date_histogram(&fields);

        Self {
            batch_requests_support: false,
            fields,
            date_histogram,
        }
    }

    pub fn batch_requests_support(&self) -> bool {
        self.batch_requests_support
    }

    pub fn fields(&self) -> &FieldsCapabilities {
        &self.fields
    }

    /// Time zone pinned by the backend's date-histogram definition, if any.
    pub fn fixed_time_zone(&self) -> Option<&str> {
        self.date_histogram
            .as_ref()
            .and_then(|agg| agg.time_zone.as_deref())
    }

    /// Native interval of the pre-aggregated data, if any. Descriptors
    /// with calendar intervals this library cannot express as fixed
    /// lengths yield no constraint.
    pub fn default_time_interval(&self) -> Option<TimeInterval> {
        self.date_histogram
            .as_ref()
            .and_then(|agg| agg.interval.as_deref())
            .and_then(|raw| raw.parse().ok())
    }

    /// True iff every interval rule accepts `user` against the default
    /// interval. Without a default interval there is no constraint.
    pub fn validate_interval(&self, user: &TimeInterval) -> bool {
        match self.default_time_interval() {
            Some(default) => PREAGGREGATED_INTERVAL_RULES
                .iter()
                .all(|rule| rule(user, &default)),
            None => true,
        }
    }

    /// Pick the interval a query should use: the requested one when the
    /// rules accept it, the backend's native interval when nothing was
    /// requested, and a one-minute fallback when neither side cares.
    pub fn select_interval(&self, requested: Option<TimeInterval>) -> Result<TimeInterval> {
        match (requested, self.default_time_interval()) {
            (Some(user), Some(_)) => {
                if self.validate_interval(&user) {
                    Ok(user)
                } else {
                    Err(Error::InvalidInterval(user.to_string()))
                }
            }
            (None, Some(default)) => Ok(default),
            (Some(user), None) => Ok(user),
            (None, None) => Ok(TimeInterval::new(1, IntervalUnit::Minute)),
        }
    }

    /// Pick the time zone a query should use: the backend's fixed zone
    /// wins over the requested one; UTC when neither is set.
    pub fn select_time_zone(&self, requested: Option<&str>) -> String {
        self.fixed_time_zone()
            .or(requested)
            .unwrap_or("UTC")
            .to_string()
    }
}

fn find_date_histogram(fields: &FieldsCapabilities) -> Option<AggCapability> {
    fields
        .values()
        .flatten()
        .find(|agg| agg.agg == "date_histogram")
        .cloned()
}
