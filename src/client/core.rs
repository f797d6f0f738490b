use crate::client::types::CallStats;
use crate::client::validation;
use crate::config::{ClientConfig, StatusPolicy};
use crate::transport::HttpTransport;
use crate::types::{ResultSet, SymptomQuery};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Client for the `/api/infer` endpoint.
///
/// One call is one POST; there is no retry, cache or request queue. Cloning is
/// cheap and clones share the connection pool.
#[derive(Clone)]
pub struct InferenceClient {
    pub(crate) transport: Arc<HttpTransport>,
    pub(crate) config: Arc<ClientConfig>,
}

impl InferenceClient {
    pub fn builder() -> crate::client::builder::InferenceClientBuilder {
        crate::client::builder::InferenceClientBuilder::new()
    }

    /// Create a client from an already-resolved configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        crate::client::builder::InferenceClientBuilder::new()
            .config(config)
            .build()
    }

    /// Create a client from defaults plus `ENVENOM_*` environment overrides.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &url::Url {
        self.transport.endpoint()
    }

    /// Pull the message out of an `{"error": "..."}` body, the shape the service uses for 4xx.
    fn error_message_from_body(body: &str) -> Option<String> {
        let json: serde_json::Value = serde_json::from_str(body).ok()?;
        json.get("error")
            .and_then(|e| {
                e.as_str()
                    .or_else(|| e.get("message").and_then(|m| m.as_str()))
            })
            .map(|s| s.to_string())
    }

    async fn execute_once(&self, query: &SymptomQuery, request_id: &str) -> Result<(ResultSet, CallStats)> {
        let start = Instant::now();
        debug!(
            request_id,
            endpoint = %self.transport.endpoint(),
            symptoms_len = query.as_str().len(),
            "submitting symptom query"
        );

        let resp = self.transport.post_json(query, request_id).await?;

        let mut context = ErrorContext::new()
            .with_source("inference_client")
            .with_request_id(request_id);
        if let Some(up) = &resp.upstream_request_id {
            context = context.with_details(format!("upstream_id: {}", up));
        }

        if !resp.is_success() {
            match self.config.status_policy {
                StatusPolicy::RequireSuccess => {
                    let message = Self::error_message_from_body(&resp.body)
                        .unwrap_or_else(|| format!("service answered HTTP {}", resp.status));
                    return Err(Error::status_with_context(resp.status, message, context));
                }
                StatusPolicy::Ignore => {
                    warn!(
                        request_id,
                        http_status = resp.status,
                        "non-success status ignored by policy, decoding body anyway"
                    );
                }
            }
        }

        let set = validation::decode_result_set(&resp.body, context)?;
        for r in set.rejected() {
            warn!(
                request_id,
                index = r.index,
                reason = r.reason.as_str(),
                "dropping malformed species entry"
            );
        }

        let stats = CallStats {
            request_id: request_id.to_string(),
            upstream_request_id: resp.upstream_request_id,
            http_status: resp.status,
            duration_ms: start.elapsed().as_millis(),
            entries: set.len(),
            rejected: set.rejected().len(),
        };
        info!(
            request_id,
            http_status = stats.http_status,
            entries = stats.entries,
            rejected = stats.rejected,
            duration_ms = stats.duration_ms as u64,
            "inference request completed"
        );
        Ok((set, stats))
    }

    /// Submit a query and return the candidates with per-call stats.
    pub async fn submit_with_stats(
        &self,
        query: impl Into<SymptomQuery>,
    ) -> Result<(ResultSet, CallStats)> {
        let query = query.into();
        let request_id = Uuid::new_v4().to_string();
        let result = self.execute_once(&query, &request_id).await;
        if let Err(e) = &result {
            error!(
                request_id = request_id.as_str(),
                kind = e.failure_kind().map(|k| k.as_str()).unwrap_or("other"),
                error = %e,
                "inference request failed"
            );
        }
        result
    }

    /// Submit a query: one POST, one decoded [`ResultSet`] or one error.
    pub async fn submit(&self, query: impl Into<SymptomQuery>) -> Result<ResultSet> {
        self.submit_with_stats(query).await.map(|(set, _)| set)
    }

    /// Like [`submit`](Self::submit), but gives up as soon as `cancel` fires.
    ///
    /// The in-flight HTTP future is dropped, which closes its connection.
    pub async fn submit_with_cancel(
        &self,
        query: impl Into<SymptomQuery>,
        cancel: &CancellationToken,
    ) -> Result<ResultSet> {
        let query = query.into();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("symptom query cancelled before completion");
                Err(Error::cancelled_with_context(
                    ErrorContext::new().with_source("inference_client"),
                ))
            }
            r = self.submit(query) => r,
        }
    }
}

#[async_trait::async_trait]
impl crate::backend::InferenceBackend for InferenceClient {
    async fn infer(&self, query: SymptomQuery, cancel: CancellationToken) -> Result<ResultSet> {
        self.submit_with_cancel(query, &cancel).await
    }
}
