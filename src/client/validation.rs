//! 响应校验：在信任边界把服务端 JSON 转换为强类型结果集。
//!
//! Trust-boundary decoding of the inference response.
//!
//! The body must be a JSON array. Each element is decoded on its own: an
//! element that is not an object or has wrongly-typed fields is dropped and
//! recorded as a [`RejectedEntry`], it never fails the whole response. Link
//! fields with schemes other than http(s) are cleared so renderers cannot
//! emit them.

use crate::types::{RejectedEntry, ResultSet, SpeciesMatch};
use crate::{Error, ErrorContext, Result};
use serde_json::Value;
use tracing::warn;

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `doi_url` must be an absolute http(s) URL.
fn is_safe_absolute_link(link: &str) -> bool {
    match url::Url::parse(link) {
        Ok(u) => u.scheme() == "http" || u.scheme() == "https",
        Err(_) => false,
    }
}

/// `image` may also be a path on the serving host (e.g. `/images/stonefish.jpg`).
/// Protocol-relative sources (`//host/x.png`, `/\\host/x.png`) point at another
/// host and are rejected.
fn is_safe_image_source(src: &str) -> bool {
    match url::Url::parse(src) {
        Ok(u) => u.scheme() == "http" || u.scheme() == "https",
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            if src.starts_with("//") || src.starts_with("/\\") {
                return false;
            }
            !src.contains(':') || src.starts_with('/')
        }
        Err(_) => false,
    }
}

fn sanitize_links(index: usize, mut m: SpeciesMatch) -> SpeciesMatch {
    if let Some(src) = m.image.as_deref() {
        if !src.is_empty() && !is_safe_image_source(src) {
            warn!(index, image = src, "dropping image with unsupported scheme");
            m.image = None;
        }
    }
    if let Some(link) = m.doi_url.as_deref() {
        if !link.is_empty() && !is_safe_absolute_link(link) {
            warn!(index, doi_url = link, "dropping reference link with unsupported scheme");
            m.doi_url = None;
        }
    }
    m
}

pub(crate) fn decode_entries(items: Vec<Value>) -> ResultSet {
    let mut matches = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            rejected.push(RejectedEntry {
                index,
                reason: format!("expected object, got {}", json_type_name(&item)),
            });
            continue;
        }
        match serde_json::from_value::<SpeciesMatch>(item) {
            Ok(m) => matches.push(sanitize_links(index, m)),
            Err(e) => rejected.push(RejectedEntry {
                index,
                reason: e.to_string(),
            }),
        }
    }

    ResultSet::new(matches).with_rejected(rejected)
}

/// Decode a response body into a [`ResultSet`].
pub(crate) fn decode_result_set(body: &str, context: ErrorContext) -> Result<ResultSet> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        Error::decode_with_context(
            format!("response is not valid JSON: {}", e),
            context.clone(),
        )
    })?;

    match value {
        Value::Array(items) => Ok(decode_entries(items)),
        other => Err(Error::decode_with_context(
            format!("expected JSON array, got {}", json_type_name(&other)),
            context.with_field_path("$"),
        )),
    }
}
