//! Plain-text species cards for terminals.

use super::{format_match_score, Render, NO_REFERENCE_TEXT, REFERENCE_LINK_TEXT, TREATMENT_HEADING};
use crate::types::{ResultSet, SpeciesMatch};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn render_card(&self, m: &SpeciesMatch) -> String {
        let mut out = String::new();
        let field = |v: &Option<String>| v.clone().unwrap_or_default();

        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}", m.common_name);
        if let Some(src) = m.image_url() {
            let _ = writeln!(out, "  Image: {}", src);
        }
        let _ = writeln!(out, "  Match Score: {}%", format_match_score(m.match_score));
        let _ = writeln!(out, "  Symptom: {}", field(&m.symptom));
        let _ = writeln!(out, "  Onset Time: {}", field(&m.onset_time));
        let _ = writeln!(out, "  Duration: {}", field(&m.duration));
        match m.reference_link() {
            Some(link) => {
                let _ = writeln!(out, "  Reference: {} {}", REFERENCE_LINK_TEXT, link);
            }
            None => {
                let _ = writeln!(out, "  Reference: {}", NO_REFERENCE_TEXT);
            }
        }
        if m.has_treatment() {
            let _ = writeln!(out, "  {}", TREATMENT_HEADING);
            let _ = writeln!(out, "    First Aid: {}", field(&m.first_aid));
            let _ = writeln!(out, "    Hospital Treatment: {}", field(&m.hospital_treatment));
            let _ = writeln!(out, "    Prognosis: {}", field(&m.prognosis));
        }
        out
    }
}

impl Render for TextRenderer {
    fn render(&self, results: &ResultSet) -> String {
        results
            .iter()
            .map(|m| self.render_card(m))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
