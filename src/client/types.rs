/// Per-call facts for a completed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallStats {
    /// Client-generated id sent as `x-request-id`.
    pub request_id: String,
    /// Id reported back by the service or an intermediary, if any.
    pub upstream_request_id: Option<String>,
    pub http_status: u16,
    pub duration_ms: u128,
    /// Entries kept after validation.
    pub entries: usize,
    /// Entries dropped by validation.
    pub rejected: usize,
}
