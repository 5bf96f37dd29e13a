//! Field tokenizer.
//!
//! Splits the body of one entry into `(name, raw value)` pairs. Brace-wrapped
//! values may span several lines and nest; the scan carries a depth counter
//! until the value closes.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::scan::balanced_end;

/// `identifier =` at the current scan position.
static FIELD_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_][\w\-.:]*)\s*=\s*").unwrap());

/// One field as it appears in the entry, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    /// Field name, lower-cased.
    pub name: String,
    /// Raw value including its delimiters. Continuation lines are trimmed
    /// and joined with single spaces.
    pub value: String,
}

/// Tokenizes an entry body (the text after `@type{key,`) into fields, in
/// source order.
///
/// Text that does not start with `identifier =` is skipped up to the end of
/// its line, which covers blank lines, comments and the entry's closing brace.
///
/// # Examples
///
/// ```
/// use bibcite::tokenize_fields;
///
/// let fields = tokenize_fields("  Title = {Multi\n    {Line} Title},\n  year = 2021\n}");
/// assert_eq!(fields[0].name, "title");
/// assert_eq!(fields[0].value, "{Multi {Line} Title}");
/// assert_eq!(fields[1].value, "2021");
/// ```
pub fn tokenize_fields(body: &str) -> Vec<RawField> {
    let mut fields = Vec::new();
    let mut pos = 0;

    while pos < body.len() {
        let rest = &body[pos..];
        let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        pos += rest.len() - trimmed.len();
        if trimmed.is_empty() {
            break;
        }

        let Some(caps) = FIELD_HEADER.captures(trimmed) else {
            pos += trimmed.find('\n').map_or(trimmed.len(), |i| i + 1);
            continue;
        };

        let header_len = caps[0].len();
        let remainder = &trimmed[header_len..];
        let value_len = value_len(remainder);

        let field = RawField {
            name: caps[1].to_ascii_lowercase(),
            value: join_lines(&remainder[..value_len]),
        };
        tracing::trace!(name = %field.name, value = %field.value, "field");
        fields.push(field);

        pos += header_len + value_len;
    }

    fields
}

/// Folds tokenized fields into a map keyed by name. The last duplicate wins.
pub fn field_map(fields: Vec<RawField>) -> HashMap<String, String> {
    fields.into_iter().map(|f| (f.name, f.value)).collect()
}

/// Length in bytes of the value starting at the beginning of `text`.
fn value_len(text: &str) -> usize {
    match text.as_bytes().first() {
        Some(b'{') => balanced_end(text).unwrap_or(text.len()),
        Some(b'"') => quoted_len(text),
        _ => text
            .find(|c: char| matches!(c, ',' | '}' | '\n'))
            .unwrap_or(text.len()),
    }
}

/// Length of a double-quoted value. Quoted values are single-line: an
/// unterminated quote ends at the newline.
fn quoted_len(text: &str) -> usize {
    let mut depth: usize = 0;
    let mut escaped = false;

    for (i, byte) in text.bytes().enumerate().skip(1) {
        match byte {
            b'\n' => return i,
            b'\\' => {
                escaped = !escaped;
                continue;
            }
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'"' if depth == 0 && !escaped => return i + 1,
            _ => {}
        }
        escaped = false;
    }

    text.len()
}

/// Trims every line and joins the non-empty ones with a single space.
fn join_lines(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
