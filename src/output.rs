//! Output rendering for looked-up citations.
//!
//! Downstream note tools split each line on the first `=`, so the field order
//! and key spelling are fixed.

use crate::lookup::NormalizedCitation;

/// Renders a citation as `field=value` lines in the fixed field order.
///
/// Every line, including the last, ends with a newline. Absent fields produce
/// no line.
///
/// # Examples
///
/// ```
/// use bibcite::{render_lines, NormalizedCitation};
///
/// let citation = NormalizedCitation {
///     title: Some("A Study".to_string()),
///     year: Some("2021".to_string()),
///     ..Default::default()
/// };
/// assert_eq!(render_lines(&citation), "title=A Study\nyear=2021\n");
/// ```
pub fn render_lines(citation: &NormalizedCitation) -> String {
    let mut output = String::new();
    for (name, value) in citation.fields() {
        output.push_str(name);
        output.push('=');
        output.push_str(value);
        output.push('\n');
    }
    output
}

/// Renders a citation as a JSON object holding only the present fields.
pub fn render_json(citation: &NormalizedCitation) -> Result<String, serde_json::Error> {
    serde_json::to_string(citation)
}

/// Renders arbitrary `(name, value)` pairs as `name=value` lines.
pub fn render_pairs(fields: &[(String, String)]) -> String {
    fields
        .iter()
        .map(|(name, value)| format!("{}={}\n", name, value))
        .collect()
}
