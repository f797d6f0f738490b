use crate::client::core::InferenceClient;
use crate::config::{ClientConfig, StatusPolicy, SupersedePolicy};
use crate::transport::HttpTransport;
use crate::Result;
use std::sync::Arc;

/// Builder for creating clients with custom configuration.
///
/// Starts from [`ClientConfig::default`]; individual setters override single
/// keys on top of whatever [`config`](Self::config) supplied.
pub struct InferenceClientBuilder {
    config: ClientConfig,
    base_url: Option<String>,
    endpoint_path: Option<String>,
    timeout_secs: Option<u64>,
    status_policy: Option<StatusPolicy>,
    supersede_policy: Option<SupersedePolicy>,
    proxy: Option<String>,
}

impl InferenceClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            base_url: None,
            endpoint_path: None,
            timeout_secs: None,
            status_policy: None,
            supersede_policy: None,
            proxy: None,
        }
    }

    /// Replace the whole base configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the service base URL (e.g. a mock server in tests).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.endpoint_path = Some(path.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = Some(policy);
        self
    }

    /// Overlap policy used by sessions built with [`InferenceSession::from_client`](crate::InferenceSession::from_client).
    pub fn supersede_policy(mut self, policy: SupersedePolicy) -> Self {
        self.supersede_policy = Some(policy);
        self
    }

    /// Route requests through an HTTP(S) proxy.
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy = Some(url.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<InferenceClient> {
        let mut config = self.config;
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if let Some(path) = self.endpoint_path {
            config.endpoint_path = path;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if let Some(policy) = self.status_policy {
            config.status_policy = policy;
        }
        if let Some(policy) = self.supersede_policy {
            config.supersede_policy = policy;
        }
        if let Some(proxy) = self.proxy {
            config.proxy = Some(proxy);
        }
        config.validate()?;

        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(InferenceClient {
            transport,
            config: Arc::new(config),
        })
    }
}

impl Default for InferenceClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
