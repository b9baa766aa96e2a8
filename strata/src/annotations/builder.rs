use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::body::annotation_query_body;
use super::response::{events_from_response, AnnotationEvent};
use super::{PanelDefinition, TimeRange};
use crate::error::Result;
use crate::strategy::StrategyRegistry;

/// Events per annotation id.
pub type AnnotationResults = HashMap<String, Vec<AnnotationEvent>>;

/// Runs a panel's annotation queries: resolves the viable strategy for
/// the panel's index pattern, builds one query body per valid annotation
/// under the negotiated capabilities, executes them as one batched
/// search, and maps the ordered responses back onto annotation ids.
pub struct AnnotationQueryBuilder {
    registry: Arc<StrategyRegistry>,
}

impl AnnotationQueryBuilder {
    pub fn new(registry: Arc<StrategyRegistry>) -> Self {
        Self { registry }
    }

    /// Fetch annotation events for a panel over a time range.
    ///
    /// Annotations failing required-fields validation are skipped. With
    /// no valid annotations the backend is never called. A panel whose
    /// index pattern matches no indices yields an empty result rather
    /// than an error; any other backend failure propagates.
    pub async fn annotation_events(
        &self,
        panel: &PanelDefinition,
        range: &TimeRange,
    ) -> Result<AnnotationResults> {
        let resolved = self.registry.resolve(&panel.index_pattern).await?;
        let request = resolved.strategy.search_request(&panel.index_pattern);

        let annotations: Vec<_> = panel
            .annotations
            .iter()
            .filter(|annotation| {
                let valid = annotation.is_valid();
                if !valid {
                    debug!(annotation = %annotation.id, "skipping incomplete annotation");
                }
                valid
            })
            .collect();

        let bodies = annotations
            .iter()
            .map(|annotation| {
                annotation_query_body(panel, annotation, &resolved.capabilities, range)
            })
            .collect::<Result<Vec<_>>>()?;

        if bodies.is_empty() {
            return Ok(AnnotationResults::new());
        }

        let responses = request.search(bodies).await?;
        if responses.is_empty() {
            // Missing indices were absorbed by the search request.
            return Ok(AnnotationResults::new());
        }

        // Response order matches body order; demultiplex positionally.
        Ok(annotations
            .iter()
            .zip(responses.iter())
            .map(|(annotation, response)| {
                (annotation.id.clone(), events_from_response(response))
            })
            .collect())
    }
}
