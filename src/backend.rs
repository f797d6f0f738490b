//! 推理后端抽象：会话层与具体 HTTP 客户端之间的接缝。
//!
//! The seam between [`InferenceSession`](crate::session::InferenceSession) and
//! whatever actually answers a symptom query. [`InferenceClient`](crate::InferenceClient)
//! is the production implementation; tests plug in scripted backends.

use crate::types::{ResultSet, SymptomQuery};
use crate::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Answer one query. Implementations must return promptly with a
    /// `Cancelled` failure once `cancel` fires.
    async fn infer(&self, query: SymptomQuery, cancel: CancellationToken) -> Result<ResultSet>;
}
