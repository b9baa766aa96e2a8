use serde_json::{json, Value};

use super::{AnnotationDefinition, PanelDefinition, TimeRange};
use crate::capabilities::Capabilities;
use crate::error::Result;
use crate::search::SearchBody;

/// Events fetched per histogram bucket.
const HITS_PER_BUCKET: usize = 5;

/// Build the query body for one annotation, shaped by the negotiated
/// capabilities: the histogram interval is validated against the
/// backend's native interval and a fixed time zone overrides the panel's.
pub fn annotation_query_body(
    panel: &PanelDefinition,
    annotation: &AnnotationDefinition,
    capabilities: &Capabilities,
    range: &TimeRange,
) -> Result<SearchBody> {
    let interval = capabilities.select_interval(panel.interval)?;
    let time_zone = capabilities.select_time_zone(panel.time_zone.as_deref());

    let mut filters: Vec<Value> = vec![json!({
        "range": {
            (annotation.time_field.clone()): {
                "gte": range.min.to_rfc3339(),
                "lte": range.max.to_rfc3339(),
                "format": "strict_date_optional_time",
            }
        }
    })];

    if let Some(query_string) = &annotation.query_string {
        filters.push(json!({ "query_string": { "query": query_string } }));
    }

    let mut source_fields = annotation.fields.clone();
    if !source_fields.contains(&annotation.time_field) {
        source_fields.push(annotation.time_field.clone());
    }

    let body = json!({
        "size": 0,
        "query": { "bool": { "filter": filters } },
        "aggs": {
            "annotations": {
                "date_histogram": {
                    "field": &annotation.time_field,
                    "fixed_interval": interval.to_string(),
                    "time_zone": time_zone,
                    "min_doc_count": 1,
                },
                "aggs": {
                    "hits": {
                        "top_hits": {
                            "size": HITS_PER_BUCKET,
                            "sort": [{ (annotation.time_field.clone()): { "order": "desc" } }],
                            "_source": { "includes": source_fields },
                        }
                    }
                }
            }
        }
    });

    Ok(SearchBody::new(annotation.index_pattern.clone(), body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    fn fixtures() -> (PanelDefinition, AnnotationDefinition, TimeRange) {
        let annotation = AnnotationDefinition {
            id: "deploys".to_string(),
            index_pattern: "events-*".to_string(),
            time_field: "@timestamp".to_string(),
            fields: vec!["message".to_string()],
            icon: "bolt".to_string(),
            template: "{{message}}".to_string(),
            query_string: Some("tag:deploy".to_string()),
        };
        let panel = PanelDefinition {
            index_pattern: "logs-*".to_string(),
            annotations: vec![annotation.clone()],
            interval: Some("2m".parse().unwrap()),
            time_zone: Some("Europe/Oslo".to_string()),
        };
        let range = TimeRange {
            min: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            max: Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap(),
        };
        (panel, annotation, range)
    }

    #[test]
    fn body_targets_the_annotation_index() {
        let (panel, annotation, range) = fixtures();
        let caps = Capabilities::unconstrained();
        let search = annotation_query_body(&panel, &annotation, &caps, &range).unwrap();
        assert_eq!(search.index, "events-*");
    }

    #[test]
    fn body_carries_interval_zone_and_filters() {
        let (panel, annotation, range) = fixtures();
        let caps = Capabilities::unconstrained();
        let search = annotation_query_body(&panel, &annotation, &caps, &range).unwrap();

        let histogram = &search.body["aggs"]["annotations"]["date_histogram"];
        assert_eq!(histogram["fixed_interval"], "2m");
        assert_eq!(histogram["time_zone"], "Europe/Oslo");
        assert_eq!(histogram["field"], "@timestamp");

        let filters = search.body["query"]["bool"]["filter"].as_array().unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[1]["query_string"]["query"], "tag:deploy");
    }

    #[test]
    fn time_field_is_always_in_source() {
        let (panel, annotation, range) = fixtures();
        let caps = Capabilities::unconstrained();
        let search = annotation_query_body(&panel, &annotation, &caps, &range).unwrap();

        let includes = search.body["aggs"]["annotations"]["aggs"]["hits"]["top_hits"]["_source"]
            ["includes"]
            .as_array()
            .unwrap();
        assert!(includes.contains(&Value::String("@timestamp".to_string())));
        assert!(includes.contains(&Value::String("message".to_string())));
    }
}
