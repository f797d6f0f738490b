//! # envenomation-client
//!
//! 海洋生物蜇伤专家系统的客户端：提交症状描述，获取候选物种、匹配分数与救治建议。
//!
//! Client for the marine envenomation expert system. Submit a free-text
//! description of symptoms to the inference service and get back candidate
//! species with match scores, symptom timelines and treatment advice.
//!
//! ## Overview
//!
//! The inference itself (symptom normalisation, scoring, the species
//! knowledge base) lives behind a single HTTP contract:
//!
//! ```text
//! POST /api/infer
//! Content-Type: application/json
//!
//! {"symptoms": "<free text>"}
//! ```
//!
//! answered with a JSON array of candidate species. This crate owns
//! everything on the caller's side of that contract.
//!
//! ## Key Features
//!
//! - **Typed trust boundary**: responses decode into [`SpeciesMatch`] values;
//!   malformed entries are dropped and reported instead of rendered
//! - **Explicit errors**: every failure of a submission is an
//!   [`Error::InferenceRequestFailed`] returned to the caller and logged
//! - **Explicit state machine**: [`InferenceSession`] tracks `Idle`/`Pending`
//!   and decides what overlapping submissions do
//! - **Renderers**: text and HTML species cards via [`render`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use envenomation_client::{InferenceClient, render::{Render, TextRenderer}};
//!
//! #[tokio::main]
//! async fn main() -> envenomation_client::Result<()> {
//!     let client = InferenceClient::builder()
//!         .base_url("http://localhost:5000")
//!         .build()?;
//!
//!     let results = client.submit("burning pain, swelling, nausea").await?;
//!     println!("{}", TextRenderer.render(&results));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | HTTP inference client and builder |
//! | [`session`] | Idle/Pending state machine holding the displayed results |
//! | [`types`] | Symptom query, species match and result set |
//! | [`render`] | Text and HTML species cards |
//! | [`config`] | Defaults, YAML file and environment configuration |
//! | [`transport`] | reqwest-backed HTTP transport |

pub mod backend;
pub mod client;
pub mod config;
pub mod render;
pub mod session;
pub mod transport;
pub mod types;

pub use backend::InferenceBackend;
pub use client::{CallStats, InferenceClient, InferenceClientBuilder};
pub use config::{ClientConfig, StatusPolicy, SupersedePolicy};
pub use session::{InferenceSession, SessionSnapshot, SessionState, SubmitOutcome};
pub use types::{ResultSet, SpeciesMatch, SymptomQuery};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, FailureKind};
