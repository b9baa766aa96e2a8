//! HTTP surface: the axum router and error envelope.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use strata::annotations::{AnnotationQueryBuilder, AnnotationResults, PanelDefinition, TimeRange};

#[derive(Clone)]
pub struct AppState {
    pub builder: Arc<AnnotationQueryBuilder>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/annotations", post(annotations_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct AnnotationsRequest {
    panel: PanelDefinition,
    time_range: TimeRange,
}

#[derive(Debug, Serialize)]
struct AnnotationsResponse {
    annotations: AnnotationResults,
}

async fn annotations_handler(
    State(state): State<AppState>,
    Json(request): Json<AnnotationsRequest>,
) -> Result<Json<AnnotationsResponse>, ApiError> {
    let annotations = state
        .builder
        .annotation_events(&request.panel, &request.time_range)
        .await?;
    Ok(Json(AnnotationsResponse { annotations }))
}

/// Error envelope returned to HTTP clients.
#[derive(Debug)]
pub struct ApiError(strata::Error);

impl From<strata::Error> for ApiError {
    fn from(err: strata::Error) -> Self {
        Self(err)
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
    status: u16,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    reason: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            strata::Error::InvalidInterval(_) | strata::Error::Config(_) => StatusCode::BAD_REQUEST,
            // Absorbed before reaching handlers in practice.
            strata::Error::MissingIndices(_) => StatusCode::NOT_FOUND,
            // Surface the backend's own status when it maps to one.
            strata::Error::Backend { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            strata::Error::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::warn!(status = status.as_u16(), error = %self.0, "request failed");
        let body = ErrorResponse {
            error: ErrorDetail {
                reason: self.0.to_string(),
            },
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use strata::capabilities::RollupData;
    use strata::search::{SearchBody, SearchTransport};
    use strata::strategy::StrategyRegistry;
    use tower::util::ServiceExt;

    struct CannedTransport {
        response: Value,
    }

    #[async_trait]
    impl SearchTransport for CannedTransport {
        async fn msearch(&self, searches: &[SearchBody]) -> strata::Result<Vec<Value>> {
            Ok(vec![self.response.clone(); searches.len()])
        }

        async fn search(&self, _search: &SearchBody) -> strata::Result<Value> {
            Ok(self.response.clone())
        }

        async fn rollup_search(&self, _search: &SearchBody) -> strata::Result<Value> {
            Ok(self.response.clone())
        }

        async fn rollup_capabilities(&self, _index_pattern: &str) -> strata::Result<RollupData> {
            Ok(RollupData::new())
        }
    }

    fn test_router(response: Value) -> Router {
        let transport = Arc::new(CannedTransport { response });
        let registry = Arc::new(StrategyRegistry::new(transport));
        router(AppState {
            builder: Arc::new(AnnotationQueryBuilder::new(registry)),
        })
    }

    fn annotations_request() -> Value {
        json!({
            "panel": {
                "index_pattern": "logs-*",
                "annotations": [{
                    "id": "deploys",
                    "index_pattern": "events-*",
                    "time_field": "@timestamp",
                    "fields": ["message"],
                    "icon": "bolt",
                    "template": "{{message}}",
                }]
            },
            "time_range": {
                "min": "2024-05-01T00:00:00Z",
                "max": "2024-05-02T00:00:00Z",
            }
        })
    }

    #[tokio::test]
    async fn health_endpoint_responds() {
        let app = test_router(Value::Null);
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn annotations_endpoint_returns_events_by_id() {
        let backend_response = json!({
            "aggregations": { "annotations": { "buckets": [{
                "key": 1714521600000_i64,
                "doc_count": 1,
                "hits": { "hits": { "hits": [{ "_source": { "message": "deploy" } }] } }
            }]}}
        });
        let app = test_router(backend_response);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/api/annotations")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from(annotations_request().to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["annotations"]["deploys"][0]["docs"][0]["message"],
            "deploy"
        );
    }

    #[tokio::test]
    async fn invalid_body_is_rejected() {
        let app = test_router(Value::Null);
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/api/annotations")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
