//! Field normalization.
//!
//! Turns a raw field value into the cleaned text handed to downstream tools.
//! An empty result means the field carries nothing usable.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::authors::normalize_authors;
use crate::scan::{brace_balance, outer_group};

/// `\command{text}` with no nested group inside the argument.
static LATEX_COMMAND: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\[a-zA-Z]+\{([^{}]*)\}").unwrap());
/// Escaped special characters such as `\&`.
static LATEX_ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\([&%$#_])").unwrap());
/// Plausible publication years, 1950 through 2029.
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20[0-2]\d|19[5-9]\d)\b").unwrap());

/// Upper bound on de-commanding passes for nested commands.
const MAX_COMMAND_PASSES: usize = 8;

/// How a field's value is cleaned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Title,
    Author,
    Year,
    /// `journal` and `booktitle`.
    Container,
    Doi,
    Other,
}

impl FieldKind {
    /// Classifies a field name (case-insensitive).
    pub fn of(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "title" => FieldKind::Title,
            "author" => FieldKind::Author,
            "year" => FieldKind::Year,
            "journal" | "booktitle" => FieldKind::Container,
            "doi" => FieldKind::Doi,
            _ => FieldKind::Other,
        }
    }
}

/// Normalizes the raw value of field `name`.
///
/// Returns an empty string when nothing usable remains.
///
/// # Examples
///
/// ```
/// use bibcite::normalize_field;
///
/// assert_eq!(normalize_field("title", r"{\textit{Neural} Networks}"), "Neural Networks");
/// assert_eq!(normalize_field("year", "{©2021, revised}"), "2021");
/// assert_eq!(normalize_field("year", "{undated}"), "");
/// ```
pub fn normalize_field(name: &str, raw: &str) -> String {
    let value = strip_delimiters(raw);

    match FieldKind::of(name) {
        FieldKind::Title => clean_title(value),
        FieldKind::Author => normalize_authors(value),
        FieldKind::Year => extract_year(value).unwrap_or_default(),
        FieldKind::Container | FieldKind::Doi => collapse_whitespace(&remove_braces(value)),
        FieldKind::Other => value.to_string(),
    }
}

/// Removes the delimiters around a raw value: surrounding whitespace,
/// trailing commas, one enclosing brace or quote layer, stray braces left
/// unbalanced at either end, and an unpaired quote at either end.
pub fn strip_delimiters(raw: &str) -> &str {
    let mut value = trim_trailing_commas(raw.trim());

    if let Some(inner) = outer_group(value) {
        value = trim_trailing_commas(inner.trim());
    }

    while value.ends_with('}') && brace_balance(value) < 0 {
        value = trim_trailing_commas(value[..value.len() - 1].trim_end());
    }
    while value.starts_with('{') && brace_balance(value) > 0 {
        value = value[1..].trim_start();
    }

    // A quoted value cut short at end of line keeps only its opening quote.
    if value.matches('"').count() % 2 == 1 {
        if let Some(rest) = value.strip_prefix('"') {
            value = rest.trim_start();
        } else if let Some(rest) = value.strip_suffix('"') {
            value = trim_trailing_commas(rest);
        }
    }

    value
}

fn trim_trailing_commas(value: &str) -> &str {
    value.trim_end_matches(|c: char| c == ',' || c.is_whitespace())
}

/// Replaces `\command{text}` with `text`, unescapes specials and drops the
/// remaining braces.
fn clean_title(value: &str) -> String {
    let mut text = value.to_string();
    for _ in 0..MAX_COMMAND_PASSES {
        match LATEX_COMMAND.replace_all(&text, "$1") {
            Cow::Borrowed(_) => break,
            Cow::Owned(replaced) => text = replaced,
        }
    }

    let text = LATEX_ESCAPE.replace_all(&text, "$1");
    collapse_whitespace(&remove_braces(&text))
}

/// Finds a plausible four-digit publication year in `value`.
pub fn extract_year(value: &str) -> Option<String> {
    YEAR.captures(value).map(|caps| caps[1].to_string())
}

fn remove_braces(value: &str) -> String {
    value.chars().filter(|c| *c != '{' && *c != '}').collect()
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
