//! 渲染层：把结果集渲染为终端文本或 HTML 物种卡片。
//!
//! # Render Module
//!
//! Turns a [`ResultSet`] into species cards. Every renderer follows the same
//! rules:
//!
//! - entries appear in server order;
//! - the image line appears only when an image is present;
//! - the match score is printed with two decimals (`93.456` → `93.46`);
//! - the reference is a `[Ref]` link to `doi_url`, or the text
//!   [`NO_REFERENCE_TEXT`] when there is none;
//! - the treatment block (first aid, hospital treatment, prognosis) appears
//!   only when first aid advice is present.

pub mod text;

#[cfg(feature = "html")]
pub mod html;

pub use text::TextRenderer;

#[cfg(feature = "html")]
pub use html::HtmlRenderer;

use crate::types::ResultSet;

pub const PAGE_TITLE: &str = "Marine Envenomation Expert System";
pub const NO_REFERENCE_TEXT: &str = "No reference available";
pub const REFERENCE_LINK_TEXT: &str = "[Ref]";
pub const TREATMENT_HEADING: &str = "Recommended Treatment";

/// Format a match score the way cards show it: two decimals, no percent sign.
///
/// Rounds on the exact decimal value of the `f64`, with ties going away from
/// zero (`0.125` → `0.13`), so cards agree with the web front end.
/// `1.005` is stored as `1.00499...` and still renders as `1.00`.
pub fn format_match_score(score: f64) -> String {
    const DECIMALS: usize = 2;
    if !score.is_finite() {
        return format!("{:.2}", score);
    }

    // Every f64 >= 0.005 has at most 60 fractional binary digits, so 64
    // decimal places print its value exactly.
    let exact = format!("{:.64}", score.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let frac = frac_part.as_bytes();

    let mut digits: Vec<u8> = int_part.bytes().collect();
    digits.extend(frac.iter().take(DECIMALS));
    if frac.get(DECIMALS).is_some_and(|d| *d >= b'5') {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, b'1');
                break;
            }
            i -= 1;
            if digits[i] == b'9' {
                digits[i] = b'0';
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let split = digits.len() - DECIMALS;
    let mut out = String::with_capacity(digits.len() + 2);
    if score < 0.0 {
        out.push('-');
    }
    out.extend(digits[..split].iter().map(|d| *d as char));
    out.push('.');
    out.extend(digits[split..].iter().map(|d| *d as char));
    out
}

pub trait Render {
    fn render(&self, results: &ResultSet) -> String;
}
