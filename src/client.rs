//! 推理客户端：每次提交发送一次 POST，返回强类型结果集或错误。
//!
//! Inference client for the `/api/infer` endpoint.
//!
//! Keep the public surface small and predictable. Implementation details are
//! split into submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod types;
pub(crate) mod validation;

pub use builder::InferenceClientBuilder;
pub use core::InferenceClient;
pub use types::CallStats;
