//! Shared test doubles: an in-memory transport playing the backend.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use strata::capabilities::{
    AggCapability, FieldsCapabilities, RollupData, RollupIndexCapabilities, RollupJob,
};
use strata::search::{SearchBody, SearchTransport};
use strata::{Error, Result};

/// Failure the mock injects into search calls.
#[derive(Debug, Clone)]
pub enum MockFailure {
    None,
    MissingIndices,
    Backend { status: u16, reason: String },
}

impl MockFailure {
    fn into_error(self) -> Option<Error> {
        match self {
            MockFailure::None => None,
            MockFailure::MissingIndices => {
                Some(Error::MissingIndices("no such index".to_string()))
            }
            MockFailure::Backend { status, reason } => Some(Error::Backend { status, reason }),
        }
    }
}

#[derive(Default)]
pub struct MockTransport {
    rollup_data: RollupData,
    responses: Vec<Value>,
    search_failure: Option<MockFailure>,
    lookup_failure: Option<MockFailure>,
    pub msearch_calls: Mutex<Vec<Vec<SearchBody>>>,
    pub rollup_search_calls: Mutex<Vec<SearchBody>>,
    pub rollup_lookups: Mutex<usize>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rollup index whose single job carries a date-histogram
    /// descriptor with the given interval and time zone.
    pub fn with_rollup_index(mut self, index: &str, interval: &str, time_zone: &str) -> Self {
        let mut fields = FieldsCapabilities::new();
        fields.insert(
            "@timestamp".to_string(),
            vec![AggCapability {
                agg: "date_histogram".to_string(),
                interval: Some(interval.to_string()),
                time_zone: Some(time_zone.to_string()),
                delay: None,
            }],
        );
        self.rollup_data.insert(
            index.to_string(),
            RollupIndexCapabilities {
                rollup_jobs: vec![RollupJob {
                    job_id: format!("{index}_job"),
                    rollup_index: index.to_string(),
                    index_pattern: "raw-*".to_string(),
                    fields,
                }],
            },
        );
        self
    }

    /// Canned responses, one per logical query in order.
    pub fn with_responses(mut self, responses: Vec<Value>) -> Self {
        self.responses = responses;
        self
    }

    pub fn with_search_failure(mut self, failure: MockFailure) -> Self {
        self.search_failure = Some(failure);
        self
    }

    pub fn with_lookup_failure(mut self, failure: MockFailure) -> Self {
        self.lookup_failure = Some(failure);
        self
    }
}

#[async_trait]
impl SearchTransport for MockTransport {
    async fn msearch(&self, searches: &[SearchBody]) -> Result<Vec<Value>> {
        self.msearch_calls.lock().push(searches.to_vec());
        if let Some(err) = self.search_failure.clone().and_then(MockFailure::into_error) {
            return Err(err);
        }
        Ok(self.responses.iter().take(searches.len()).cloned().collect())
    }

    async fn search(&self, search: &SearchBody) -> Result<Value> {
        let responses = self.msearch(std::slice::from_ref(search)).await?;
        Ok(responses.into_iter().next().unwrap_or(Value::Null))
    }

    async fn rollup_search(&self, search: &SearchBody) -> Result<Value> {
        let call_index = {
            let mut calls = self.rollup_search_calls.lock();
            calls.push(search.clone());
            calls.len() - 1
        };
        if let Some(err) = self.search_failure.clone().and_then(MockFailure::into_error) {
            return Err(err);
        }
        Ok(self.responses.get(call_index).cloned().unwrap_or(Value::Null))
    }

    async fn rollup_capabilities(&self, _index_pattern: &str) -> Result<RollupData> {
        *self.rollup_lookups.lock() += 1;
        if let Some(err) = self.lookup_failure.clone().and_then(MockFailure::into_error) {
            return Err(err);
        }
        Ok(self.rollup_data.clone())
    }
}

/// An annotation response with one histogram bucket holding `docs`.
pub fn annotation_response(key: i64, docs: Vec<Value>) -> Value {
    let hits: Vec<Value> = docs
        .into_iter()
        .map(|source| json!({ "_source": source }))
        .collect();
    json!({
        "took": 2,
        "aggregations": {
            "annotations": {
                "buckets": [{
                    "key": key,
                    "doc_count": hits.len(),
                    "hits": { "hits": { "hits": hits } }
                }]
            }
        }
    })
}
