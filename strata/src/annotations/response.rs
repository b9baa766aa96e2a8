use serde::Serialize;
use serde_json::Value;

/// Events extracted from one histogram bucket of an annotation response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationEvent {
    /// Bucket key in epoch milliseconds.
    pub key: i64,
    /// Source documents of the bucket's top hits.
    pub docs: Vec<Value>,
}

/// Flatten a raw annotation response into per-bucket events.
///
/// A response with no aggregations (e.g. from an index holding no
/// documents in range) yields no events rather than an error.
pub fn events_from_response(response: &Value) -> Vec<AnnotationEvent> {
    let buckets = match response["aggregations"]["annotations"]["buckets"].as_array() {
        Some(buckets) => buckets,
        None => return Vec::new(),
    };

    buckets
        .iter()
        .filter_map(|bucket| {
            let key = bucket["key"].as_i64()?;
            let docs = bucket["hits"]["hits"]["hits"]
                .as_array()
                .map(|hits| hits.iter().map(|hit| hit["_source"].clone()).collect())
                .unwrap_or_default();
            Some(AnnotationEvent { key, docs })
        })
        .collect()
}
