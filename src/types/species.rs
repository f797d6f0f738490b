//! Candidate species returned by the inference service.

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder the service itself uses when a species has no common name on record.
pub const UNKNOWN_COMMON_NAME: &str = "Unknown";

fn unknown_name() -> String {
    UNKNOWN_COMMON_NAME.to_string()
}

fn name_or_unknown<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown_name))
}

/// One candidate organism matched against the submitted symptoms.
///
/// Optional fields may arrive as `null` or be missing entirely; both map to
/// `None`. Unknown fields are ignored. `match_score` is the only field an
/// entry cannot do without.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesMatch {
    #[serde(default = "unknown_name", deserialize_with = "name_or_unknown")]
    pub common_name: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Confidence percentage computed by the service.
    pub match_score: f64,
    #[serde(default)]
    pub symptom: Option<String>,
    #[serde(default)]
    pub onset_time: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    /// Raw DOI of the supporting reference.
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub doi_url: Option<String>,
    #[serde(default)]
    pub first_aid: Option<String>,
    #[serde(default)]
    pub hospital_treatment: Option<String>,
    #[serde(default)]
    pub prognosis: Option<String>,
}

// Empty strings count as absent, same as missing or null.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl SpeciesMatch {
    pub fn new(common_name: impl Into<String>, match_score: f64) -> Self {
        Self {
            common_name: common_name.into(),
            image: None,
            match_score,
            symptom: None,
            onset_time: None,
            duration: None,
            reference: None,
            doi_url: None,
            first_aid: None,
            hospital_treatment: None,
            prognosis: None,
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    pub fn with_symptom(mut self, symptom: impl Into<String>) -> Self {
        self.symptom = Some(symptom.into());
        self
    }

    pub fn with_timeline(mut self, onset: impl Into<String>, duration: impl Into<String>) -> Self {
        self.onset_time = Some(onset.into());
        self.duration = Some(duration.into());
        self
    }

    pub fn with_doi_url(mut self, url: impl Into<String>) -> Self {
        self.doi_url = Some(url.into());
        self
    }

    pub fn with_treatment(
        mut self,
        first_aid: impl Into<String>,
        hospital_treatment: impl Into<String>,
        prognosis: impl Into<String>,
    ) -> Self {
        self.first_aid = Some(first_aid.into());
        self.hospital_treatment = Some(hospital_treatment.into());
        self.prognosis = Some(prognosis.into());
        self
    }

    pub fn image_url(&self) -> Option<&str> {
        present(&self.image)
    }

    pub fn reference_link(&self) -> Option<&str> {
        present(&self.doi_url)
    }

    /// The treatment group is shown only when first aid advice exists.
    pub fn has_treatment(&self) -> bool {
        present(&self.first_aid).is_some()
    }
}

/// An entry of the response array that did not survive validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedEntry {
    /// Position in the response array.
    pub index: usize,
    pub reason: String,
}

/// Ordered candidate list, in the order the service returned it.
///
/// Never sorted, deduplicated or merged; a new response replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    matches: Vec<SpeciesMatch>,
    rejected: Vec<RejectedEntry>,
}

impl ResultSet {
    pub fn new(matches: Vec<SpeciesMatch>) -> Self {
        Self {
            matches,
            rejected: Vec::new(),
        }
    }

    pub fn with_rejected(mut self, rejected: Vec<RejectedEntry>) -> Self {
        self.rejected = rejected;
        self
    }

    pub fn matches(&self) -> &[SpeciesMatch] {
        &self.matches
    }

    pub fn rejected(&self) -> &[RejectedEntry] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpeciesMatch> {
        self.matches.iter()
    }

    pub fn into_matches(self) -> Vec<SpeciesMatch> {
        self.matches
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a SpeciesMatch;
    type IntoIter = std::slice::Iter<'a, SpeciesMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = SpeciesMatch;
    type IntoIter = std::vec::IntoIter<SpeciesMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

// Serialises as the bare array, the same shape the service sends.
impl Serialize for ResultSet {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.matches.serialize(serializer)
    }
}
