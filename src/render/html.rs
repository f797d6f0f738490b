//! HTML species cards.
//!
//! Markup mirrors the form's card layout (`results` > `species-card`, with a
//! `treatment` block). Every server-supplied string is escaped.

use super::{
    format_match_score, Render, NO_REFERENCE_TEXT, PAGE_TITLE, REFERENCE_LINK_TEXT,
    TREATMENT_HEADING,
};
use crate::types::{ResultSet, SpeciesMatch};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn labelled(label: &str, value: &Option<String>) -> String {
    format!(
        "<p><strong>{}:</strong> {}</p>",
        label,
        escape(value.as_deref().unwrap_or_default())
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn render_card(&self, m: &SpeciesMatch) -> String {
        let name = escape(&m.common_name);
        let mut parts = vec![format!("<h2>{}</h2>", name)];

        if let Some(src) = m.image_url() {
            parts.push(format!(
                "<img src=\"{}\" alt=\"{}\" class=\"species-image\">",
                escape(src),
                name
            ));
        }
        parts.push(format!(
            "<p><strong>Match Score:</strong> {}%</p>",
            format_match_score(m.match_score)
        ));
        parts.push(labelled("Symptom", &m.symptom));
        parts.push(labelled("Onset Time", &m.onset_time));
        parts.push(labelled("Duration", &m.duration));
        parts.push(match m.reference_link() {
            Some(link) => format!(
                "<p><strong>Reference:</strong> <a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">{}</a></p>",
                escape(link),
                REFERENCE_LINK_TEXT
            ),
            None => format!("<p><strong>Reference:</strong> {}</p>", NO_REFERENCE_TEXT),
        });
        if m.has_treatment() {
            parts.push(format!(
                "<div class=\"treatment\"><h3>{}</h3>{}{}{}</div>",
                TREATMENT_HEADING,
                labelled("First Aid", &m.first_aid),
                labelled("Hospital Treatment", &m.hospital_treatment),
                labelled("Prognosis", &m.prognosis),
            ));
        }

        format!("<div class=\"species-card\">{}</div>", parts.concat())
    }

    /// Standalone page: title heading followed by the results block.
    pub fn render_document(&self, results: &ResultSet) -> String {
        format!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
             <body><div class=\"inference-container\"><h1>{title}</h1>{body}</div></body></html>\n",
            title = PAGE_TITLE,
            body = self.render(results)
        )
    }
}

impl Render for HtmlRenderer {
    fn render(&self, results: &ResultSet) -> String {
        let cards: String = results.iter().map(|m| self.render_card(m)).collect();
        format!("<div class=\"results\">{}</div>", cards)
    }
}
