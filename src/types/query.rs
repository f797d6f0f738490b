//! Symptom query sent to the inference service.

use serde::{Deserialize, Serialize};

/// Free-text symptom description entered by the user.
///
/// No structural validation is applied; the empty string is a legal query and
/// the service decides what it means. Serialises as `{"symptoms": "..."}`,
/// which is the whole request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomQuery {
    symptoms: String,
}

impl SymptomQuery {
    pub fn new(symptoms: impl Into<String>) -> Self {
        Self {
            symptoms: symptoms.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.symptoms
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.symptoms
    }
}

impl From<&str> for SymptomQuery {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SymptomQuery {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
