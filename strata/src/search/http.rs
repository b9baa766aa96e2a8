//! HTTP transport against an Elasticsearch-compatible backend.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::transport::{SearchBody, SearchTransport};
use crate::capabilities::RollupData;
use crate::config::ElasticsearchConfig;
use crate::error::{Error, Result};

const INDEX_NOT_FOUND: &str = "index_not_found_exception";

#[derive(Debug, Clone)]
enum Auth {
    None,
    Basic { username: String, password: String },
    ApiKey(String),
}

/// Transport speaking the backend's REST API: `_msearch` for batched
/// queries, `{index}/_search` and `{index}/_rollup_search` for single
/// queries, `_rollup/data/{pattern}` for the rollup capability lookup.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl HttpTransport {
    pub fn new(config: &ElasticsearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let auth = match (&config.username, &config.api_key) {
            (_, Some(key)) => Auth::ApiKey(key.clone()),
            (Some(username), None) => Auth::Basic {
                username: username.clone(),
                password: config.password.clone().unwrap_or_default(),
            },
            (None, None) => Auth::None,
        };

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Auth::None => request,
            Auth::Basic { username, password } => request.basic_auth(username, Some(password)),
            Auth::ApiKey(key) => request.header("Authorization", format!("ApiKey {}", key)),
        }
    }

    async fn read_json(&self, response: Response) -> Result<Value> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_from_body(status, &body))
    }
}

/// Map a backend error body to the crate taxonomy. A missing index is an
/// expected state for optional data sources, not a failure.
fn error_from_body(status: StatusCode, body: &str) -> Error {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let error_type = parsed["error"]["type"].as_str().unwrap_or_default();
    let reason = parsed["error"]["reason"]
        .as_str()
        .unwrap_or(body)
        .to_string();

    if error_type == INDEX_NOT_FOUND {
        Error::MissingIndices(reason)
    } else {
        Error::Backend {
            status: status.as_u16(),
            reason,
        }
    }
}

/// Per-item errors inside an otherwise successful `_msearch` reply.
fn error_from_msearch_item(item: &Value) -> Error {
    let status = item["status"].as_u64().unwrap_or(500) as u16;
    let error_type = item["error"]["type"].as_str().unwrap_or_default();
    let reason = item["error"]["reason"].as_str().unwrap_or_default().to_string();

    if error_type == INDEX_NOT_FOUND {
        Error::MissingIndices(reason)
    } else {
        Error::Backend { status, reason }
    }
}

#[derive(Deserialize)]
struct MsearchResponse {
    responses: Vec<Value>,
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn msearch(&self, searches: &[SearchBody]) -> Result<Vec<Value>> {
        let mut ndjson = String::new();
        for search in searches {
            ndjson.push_str(&serde_json::to_string(
                &serde_json::json!({ "index": search.index }),
            )?);
            ndjson.push('\n');
            ndjson.push_str(&serde_json::to_string(&search.body)?);
            ndjson.push('\n');
        }

        let response = self
            .apply_auth(self.client.post(format!("{}/_msearch", self.base_url)))
            .header("content-type", "application/x-ndjson")
            .body(ndjson)
            .send()
            .await?;

        let raw = self.read_json(response).await?;
        let parsed: MsearchResponse = serde_json::from_value(raw)?;

        for item in &parsed.responses {
            if item.get("error").is_some() {
                return Err(error_from_msearch_item(item));
            }
        }

        Ok(parsed.responses)
    }

    async fn search(&self, search: &SearchBody) -> Result<Value> {
        let response = self
            .apply_auth(
                self.client
                    .post(format!("{}/{}/_search", self.base_url, search.index)),
            )
            .json(&search.body)
            .send()
            .await?;

        self.read_json(response).await
    }

    async fn rollup_search(&self, search: &SearchBody) -> Result<Value> {
        let response = self
            .apply_auth(
                self.client
                    .post(format!("{}/{}/_rollup_search", self.base_url, search.index)),
            )
            .json(&search.body)
            .send()
            .await?;

        self.read_json(response).await
    }

    async fn rollup_capabilities(&self, index_pattern: &str) -> Result<RollupData> {
        let response = self
            .apply_auth(
                self.client
                    .get(format!("{}/_rollup/data/{}", self.base_url, index_pattern)),
            )
            .send()
            .await?;

        let raw = self.read_json(response).await?;
        Ok(serde_json::from_value(raw)?)
    }
}
