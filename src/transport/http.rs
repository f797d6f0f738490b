use crate::config::ClientConfig;
use crate::{Error, ErrorContext, Result};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Proxy;
use serde::Serialize;
use std::time::Duration;

/// Header carrying the client-generated correlation id of a submission.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Raw outcome of one POST: status and the full body, not yet interpreted.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
    /// Correlation id echoed or assigned by the service or an intermediary.
    pub upstream_request_id: Option<String>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: url::Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let endpoint = config.endpoint_url()?;

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &config.proxy {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid proxy: {}", e),
                    ErrorContext::new().with_field_path("proxy"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            Error::configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    fn header_first(headers: &HeaderMap, names: &[&str]) -> Option<String> {
        for name in names {
            if let Some(v) = headers.get(*name) {
                if let Ok(s) = v.to_str() {
                    let s = s.trim();
                    if !s.is_empty() {
                        return Some(s.to_string());
                    }
                }
            }
        }
        None
    }

    /// POST `body` as JSON to the endpoint and read the whole response.
    ///
    /// Any status is returned as-is; only failures to send or to read the
    /// body are errors here.
    pub async fn post_json<T>(&self, body: &T, request_id: &str) -> Result<TransportResponse>
    where
        T: Serialize + ?Sized,
    {
        let context = || {
            ErrorContext::new()
                .with_source("http_transport")
                .with_request_id(request_id)
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(REQUEST_ID_HEADER, request_id)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let mut ctx = context();
                if e.is_timeout() {
                    ctx = ctx.with_details("timed out");
                } else if e.is_connect() {
                    ctx = ctx.with_details("connect failed");
                }
                Error::network_with_context(format!("request failed: {}", e), ctx)
            })?;

        let status = response.status().as_u16();
        let upstream_request_id =
            Self::header_first(response.headers(), &[REQUEST_ID_HEADER, "request-id", "cf-ray"]);
        let body = response.text().await.map_err(|e| {
            Error::network_with_context(format!("failed to read response body: {}", e), context())
        })?;

        Ok(TransportResponse {
            status,
            body,
            upstream_request_id,
        })
    }
}
