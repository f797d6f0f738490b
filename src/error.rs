//! 错误类型：推理请求失败、配置错误与响应校验错误的统一表示。
//!
//! Unified error type for the envenomation client.

use std::fmt;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "config.base_url", "response[2].match_score")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "inference_client", "config_loader")
    pub source: Option<String>,
    /// Client-generated correlation id of the submission, if one was issued.
    pub request_id: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }
}

/// What went wrong inside an [`Error::InferenceRequestFailed`].
///
/// Callers that only care about "did it work" can ignore this; it exists for
/// diagnostics and for policies that want to treat cancellation differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Connection refused, DNS, TLS, timeout, or the body could not be read.
    Network,
    /// The service answered with a non-2xx status.
    Status,
    /// The body was not JSON, or not a JSON array.
    Decode,
    /// The submission was superseded or cancelled before it completed.
    Cancelled,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Network => "network",
            FailureKind::Status => "status",
            FailureKind::Decode => "decode",
            FailureKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the envenomation client.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("Inference request failed ({kind}): {message}{}", format_context(.context))]
    InferenceRequestFailed {
        kind: FailureKind,
        status: Option<u16>,
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if let Some(ref id) = ctx.request_id {
        parts.push(format!("request_id: {}", id));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn network_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::InferenceRequestFailed {
            kind: FailureKind::Network,
            status: None,
            message: msg.into(),
            context,
        }
    }

    pub fn status_with_context(status: u16, msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::InferenceRequestFailed {
            kind: FailureKind::Status,
            status: Some(status),
            message: msg.into(),
            context,
        }
    }

    pub fn decode_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::InferenceRequestFailed {
            kind: FailureKind::Decode,
            status: None,
            message: msg.into(),
            context,
        }
    }

    pub fn cancelled_with_context(context: ErrorContext) -> Self {
        Error::InferenceRequestFailed {
            kind: FailureKind::Cancelled,
            status: None,
            message: "submission cancelled before completion".to_string(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// True for every failure of the submit path (network, status, decode, cancellation).
    pub fn is_inference_failure(&self) -> bool {
        matches!(self, Error::InferenceRequestFailed { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Error::InferenceRequestFailed { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// HTTP status of the response that caused the error, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::InferenceRequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Extract error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Error::InferenceRequestFailed { context, .. }
            | Error::Configuration { context, .. } => context,
        }
    }
}
