//! 客户端配置：默认值、YAML 配置文件与环境变量覆盖。
//!
//! Client configuration.
//!
//! Values are resolved in three layers: built-in defaults, an optional YAML
//! file, then `ENVENOM_*` environment variables.
//!
//! | Variable | Key | Default |
//! |----------|-----|---------|
//! | `ENVENOM_BASE_URL` | `base_url` | `http://localhost:5000` |
//! | `ENVENOM_ENDPOINT_PATH` | `endpoint_path` | `/api/infer` |
//! | `ENVENOM_HTTP_TIMEOUT_SECS` | `timeout_secs` | `30` |
//! | `ENVENOM_HTTP_POOL_MAX_IDLE_PER_HOST` | `pool_max_idle_per_host` | `32` |
//! | `ENVENOM_PROXY_URL` | `proxy` | none |
//! | `ENVENOM_STATUS_POLICY` | `status_policy` | `require-success` |
//! | `ENVENOM_SUPERSEDE_POLICY` | `supersede_policy` | `cancel-superseded` |

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_ENDPOINT_PATH: &str = "/api/infer";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 32;

/// How the client treats a non-2xx response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusPolicy {
    /// Non-2xx is an inference failure; the body is only used for the message.
    #[default]
    RequireSuccess,
    /// Parse the body whatever the status.
    Ignore,
}

impl FromStr for StatusPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "require-success" | "require_success" | "strict" => Ok(StatusPolicy::RequireSuccess),
            "ignore" | "lenient" => Ok(StatusPolicy::Ignore),
            other => Err(Error::configuration_with_context(
                format!("unknown status policy '{}'", other),
                ErrorContext::new()
                    .with_field_path("status_policy")
                    .with_details("expected require-success or ignore"),
            )),
        }
    }
}

/// What a session does when a submission is issued while another is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupersedePolicy {
    /// Cancel the older request; only the newest submission may update results.
    #[default]
    CancelSuperseded,
    /// Let every request finish; whichever response arrives last wins.
    LastArrivalWins,
}

impl FromStr for SupersedePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cancel-superseded" | "cancel_superseded" | "cancel" => {
                Ok(SupersedePolicy::CancelSuperseded)
            }
            "last-arrival-wins" | "last_arrival_wins" | "race" => {
                Ok(SupersedePolicy::LastArrivalWins)
            }
            other => Err(Error::configuration_with_context(
                format!("unknown supersede policy '{}'", other),
                ErrorContext::new()
                    .with_field_path("supersede_policy")
                    .with_details("expected cancel-superseded or last-arrival-wins"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub endpoint_path: String,
    pub timeout_secs: u64,
    pub pool_max_idle_per_host: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    pub status_policy: StatusPolicy,
    pub supersede_policy: SupersedePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            proxy: None,
            status_policy: StatusPolicy::default(),
            supersede_policy: SupersedePolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults with `ENVENOM_*` overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid configuration YAML: {}", e),
                ErrorContext::new().with_source("config_loader"),
            )
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read configuration file: {}", e),
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_source("config_loader"),
            )
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Full resolution: optional file, then environment, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        let cfg = base.with_overrides(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `ENVENOM_*` overrides taken from `lookup`.
    ///
    /// Unparsable numbers are ignored with a warning; unknown policy names are errors.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ENVENOM_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("ENVENOM_ENDPOINT_PATH") {
            self.endpoint_path = v;
        }
        if let Some(v) = lookup("ENVENOM_HTTP_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => warn!(value = v.as_str(), "ignoring invalid ENVENOM_HTTP_TIMEOUT_SECS"),
            }
        }
        if let Some(v) = lookup("ENVENOM_HTTP_POOL_MAX_IDLE_PER_HOST") {
            match v.parse::<usize>() {
                Ok(n) => self.pool_max_idle_per_host = n,
                Err(_) => warn!(
                    value = v.as_str(),
                    "ignoring invalid ENVENOM_HTTP_POOL_MAX_IDLE_PER_HOST"
                ),
            }
        }
        if let Some(v) = lookup("ENVENOM_PROXY_URL") {
            self.proxy = Some(v).filter(|s| !s.is_empty());
        }
        if let Some(v) = lookup("ENVENOM_STATUS_POLICY") {
            self.status_policy = v.parse()?;
        }
        if let Some(v) = lookup("ENVENOM_SUPERSEDE_POLICY") {
            self.supersede_policy = v.parse()?;
        }
        Ok(self)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Endpoint path with exactly one leading `/`.
    pub fn normalized_endpoint_path(&self) -> String {
        let trimmed = self.endpoint_path.trim();
        if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }

    /// Absolute URL submissions are POSTed to.
    pub fn endpoint_url(&self) -> Result<url::Url> {
        let raw = format!(
            "{}{}",
            self.base_url.trim().trim_end_matches('/'),
            self.normalized_endpoint_path()
        );
        url::Url::parse(&raw).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid endpoint URL '{}': {}", raw, e),
                ErrorContext::new().with_field_path("base_url"),
            )
        })
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.endpoint_url()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::configuration_with_context(
                format!("unsupported scheme '{}'", url.scheme()),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details("expected http or https"),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "timeout must be at least one second",
                ErrorContext::new().with_field_path("timeout_secs"),
            ));
        }
        if let Some(proxy) = &self.proxy {
            url::Url::parse(proxy).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid proxy URL: {}", e),
                    ErrorContext::new().with_field_path("proxy"),
                )
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.endpoint_path, "/api/infer");
        assert_eq!(cfg.status_policy, StatusPolicy::RequireSuccess);
        assert_eq!(cfg.supersede_policy, SupersedePolicy::CancelSuperseded);
        assert_eq!(
            cfg.endpoint_url().unwrap().as_str(),
            "http://localhost:5000/api/infer"
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let cfg = ClientConfig::default()
            .with_overrides(lookup_from(&[
                ("ENVENOM_BASE_URL", "https://envenom.example.org/"),
                ("ENVENOM_HTTP_TIMEOUT_SECS", "5"),
                ("ENVENOM_HTTP_POOL_MAX_IDLE_PER_HOST", "not-a-number"),
                ("ENVENOM_STATUS_POLICY", "ignore"),
                ("ENVENOM_SUPERSEDE_POLICY", "last-arrival-wins"),
            ]))
            .unwrap();
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.pool_max_idle_per_host, DEFAULT_POOL_MAX_IDLE_PER_HOST);
        assert_eq!(cfg.status_policy, StatusPolicy::Ignore);
        assert_eq!(cfg.supersede_policy, SupersedePolicy::LastArrivalWins);
        assert_eq!(
            cfg.endpoint_url().unwrap().as_str(),
            "https://envenom.example.org/api/infer"
        );
    }

    #[test]
    fn test_unknown_policy_is_an_error() {
        let err = ClientConfig::default()
            .with_overrides(lookup_from(&[("ENVENOM_STATUS_POLICY", "sometimes")]))
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert_eq!(err.context().field_path.as_deref(), Some("status_policy"));
    }

    #[test]
    fn test_yaml_partial_keys_keep_defaults() {
        let cfg = ClientConfig::from_yaml_str(
            "base_url: http://10.0.0.7:8080\nendpoint_path: api/infer\nsupersede_policy: last-arrival-wins\n",
        )
        .unwrap();
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.normalized_endpoint_path(), "/api/infer");
        assert_eq!(cfg.supersede_policy, SupersedePolicy::LastArrivalWins);
        assert_eq!(
            cfg.endpoint_url().unwrap().as_str(),
            "http://10.0.0.7:8080/api/infer"
        );
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(ClientConfig::from_yaml_str("timeout_secs: [1, 2]").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ClientConfig::default()
            .with_base_url("ftp://example.org")
            .validate()
            .is_err());
        assert!(ClientConfig::default()
            .with_base_url("not a url")
            .validate()
            .is_err());
        assert!(ClientConfig::default().with_timeout_secs(0).validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = ClientConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
}
