//! 类型系统模块：症状查询与候选物种结果的强类型表示。
//!
//! # Types Module
//!
//! Strongly-typed representations of everything that crosses the wire.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SymptomQuery`] | Free-text symptoms, the sole field of the request body |
//! | [`SpeciesMatch`] | One candidate species with score, timeline and treatment |
//! | [`ResultSet`] | Ordered candidates plus entries rejected at the trust boundary |
//!
//! ## Example
//!
//! ```rust
//! use envenomation_client::types::{SpeciesMatch, SymptomQuery};
//!
//! let query = SymptomQuery::new("intense pain, swelling");
//! assert_eq!(query.as_str(), "intense pain, swelling");
//!
//! let m = SpeciesMatch::new("Stonefish", 93.456).with_doi_url("https://dx.doi.org/10.1/x");
//! assert!(m.reference_link().is_some());
//! assert!(!m.has_treatment());
//! ```

pub mod query;
pub mod species;

pub use query::SymptomQuery;
pub use species::{RejectedEntry, ResultSet, SpeciesMatch, UNKNOWN_COMMON_NAME};
