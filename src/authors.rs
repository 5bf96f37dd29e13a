//! Author list normalization.
//!
//! BibTeX exporters disagree on how author lists are written. Each convention
//! is handled by one [`AuthorRule`]; the rules are tried in a fixed order and
//! the first one that applies produces the list. Nothing here fails: the last
//! rule always applies.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::scan::outer_group;

static AND_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+and\s+").unwrap());
static BRACE_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}]+)\}").unwrap());
static CJK_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\u{4e00}-\u{9fff}]{2,4}").unwrap());

/// Maximum number of words in a token accepted by the paired-token rule.
const MAX_NAME_WORDS: usize = 3;

/// One author-list convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorRule {
    /// `Doe, Jane and John Smith`: the standard BibTeX separator.
    AndSeparated,
    /// `{Zhang San}, {Li Si}`: one author per brace group.
    BraceGrouped,
    /// `Doe, Jane, Smith, John`: family and given names as alternating tokens.
    PairedToken,
    /// `张三 李四`: runs of CJK ideographs, one author per run.
    ScriptAware,
    /// Comma-separated tokens kept as they are.
    Fallback,
}

/// Ordered authors produced by one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorList {
    /// The rule that produced the names.
    pub rule: AuthorRule,
    /// Display names in source order.
    pub names: Vec<String>,
}

impl AuthorList {
    /// Joins the names with `", "`.
    pub fn joined(&self) -> String {
        self.names.join(", ")
    }
}

impl AuthorRule {
    /// All rules in priority order.
    pub const LADDER: [AuthorRule; 5] = [
        AuthorRule::AndSeparated,
        AuthorRule::BraceGrouped,
        AuthorRule::PairedToken,
        AuthorRule::ScriptAware,
        AuthorRule::Fallback,
    ];

    /// Applies this rule to `text`, or returns `None` when the text is not
    /// written in this rule's convention.
    pub fn apply(self, text: &str) -> Option<Vec<String>> {
        match self {
            AuthorRule::AndSeparated => and_separated(text),
            AuthorRule::BraceGrouped => brace_grouped(text),
            AuthorRule::PairedToken => paired_tokens(text),
            AuthorRule::ScriptAware => script_aware(text),
            AuthorRule::Fallback => Some(fallback(text)),
        }
    }
}

/// Splits a raw author value into display names using the first rule of
/// [`AuthorRule::LADDER`] that applies.
pub fn split_authors(raw: &str) -> AuthorList {
    let text = raw.trim();
    let text = outer_group(text).map_or(text, str::trim);

    for rule in AuthorRule::LADDER {
        if let Some(names) = rule.apply(text) {
            let names: Vec<String> = names
                .iter()
                .map(|name| collapse_whitespace(name))
                .filter(|name| !name.is_empty())
                .collect();
            tracing::debug!(?rule, count = names.len(), "split author list");
            return AuthorList { rule, names };
        }
    }

    // Fallback always applies; keep the raw text if it somehow does not.
    AuthorList {
        rule: AuthorRule::Fallback,
        names: vec![collapse_whitespace(text)],
    }
}

/// Normalizes a raw author value into `"First Last, First Last, ..."`.
///
/// Normalizing an already-normalized list is a no-op only for two or three
/// names. Four or more comma-separated two-word names match the
/// paired-token rule and are re-paired as `Family, Given` tokens.
///
/// # Examples
///
/// ```
/// use bibcite::normalize_authors;
///
/// assert_eq!(
///     normalize_authors("{Doe, Jane} and {Smith, John}"),
///     "Jane Doe, John Smith"
/// );
/// assert_eq!(normalize_authors("Doe, Jane, Smith, John"), "Jane Doe, John Smith");
/// ```
pub fn normalize_authors(raw: &str) -> String {
    split_authors(raw).joined()
}

fn and_separated(text: &str) -> Option<Vec<String>> {
    let parts: Vec<&str> = AND_SEPARATOR.split(text).collect();
    if parts.len() < 2 {
        return None;
    }

    let names = parts
        .into_iter()
        .map(|part| {
            let part: String = part.chars().filter(|c| *c != '{' && *c != '}').collect();
            match part.split_once(',') {
                Some((family, given)) => given_family(family, given),
                None => part.trim().to_string(),
            }
        })
        .collect();

    Some(names)
}

fn brace_grouped(text: &str) -> Option<Vec<String>> {
    let names: Vec<String> = BRACE_GROUP
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}

fn paired_tokens(text: &str) -> Option<Vec<String>> {
    let tokens = comma_tokens(text);
    if tokens.len() <= 2 || tokens.len() % 2 != 0 {
        return None;
    }

    let mut names = Vec::with_capacity(tokens.len() / 2);
    for pair in tokens.chunks(2) {
        let (family, given) = (pair[0], pair[1]);
        if looks_like_name_part(family) && looks_like_name_part(given) {
            names.push(given_family(family, given));
        } else {
            names.push(family.to_string());
            names.push(given.to_string());
        }
    }

    Some(names)
}

fn script_aware(text: &str) -> Option<Vec<String>> {
    if comma_tokens(text).len() > 1 {
        return None;
    }

    let names: Vec<String> = CJK_NAME
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    if names.len() > 1 {
        Some(names)
    } else {
        None
    }
}

fn fallback(text: &str) -> Vec<String> {
    let tokens = comma_tokens(text);
    if tokens.is_empty() {
        vec![text.to_string()]
    } else {
        tokens.into_iter().map(str::to_string).collect()
    }
}

/// Non-empty, trimmed comma-separated tokens.
fn comma_tokens(text: &str) -> Vec<&str> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Reassembles a `(family, given)` pair as `"given family"`.
fn given_family(family: &str, given: &str) -> String {
    let (family, given) = (family.trim(), given.trim());
    if given.is_empty() {
        family.to_string()
    } else {
        format!("{} {}", given, family)
    }
}

/// Letters, spaces, periods and hyphens only, with at most three words.
fn looks_like_name_part(token: &str) -> bool {
    let mut letters = token
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-'))
        .peekable();

    letters.peek().is_some()
        && letters.all(char::is_alphabetic)
        && token.split_whitespace().count() <= MAX_NAME_WORDS
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
