//! Citation lookup.
//!
//! Reads a `.bib` file, locates the entry for a citation key, and returns the
//! normalized fields downstream note tools consume.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::fields::{field_map, tokenize_fields};
use crate::locator::{locate_entry, BoundaryStrategy};
use crate::normalize::normalize_field;

/// The fields emitted for a citation, in output order.
pub const CITATION_FIELDS: [&str; 5] = ["title", "author", "year", "journal", "doi"];

/// Errors that can occur when looking up a citation.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("citation '{0}' not found")]
    NotFound(String),

    #[error("citation '{0}' has no usable title")]
    MissingTitle(String),
}

/// Options controlling a lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupOptions {
    /// How the end of the entry is found. Defaults to brace balancing.
    pub strategy: BoundaryStrategy,
}

/// The normalized metadata of one citation.
///
/// A field is present only when its cleaned value is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedCitation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

impl NormalizedCitation {
    /// Returns the value of one of the [`CITATION_FIELDS`].
    pub fn get(&self, field: &str) -> Option<&str> {
        let value = match field {
            "title" => &self.title,
            "author" => &self.author,
            "year" => &self.year,
            "journal" => &self.journal,
            "doi" => &self.doi,
            _ => return None,
        };
        value.as_deref()
    }

    /// Present fields as `(name, value)` pairs in output order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        CITATION_FIELDS
            .into_iter()
            .filter_map(move |name| self.get(name).map(|value| (name, value)))
    }

    /// Returns true when no field is present.
    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }
}

/// Looks up `key` in the bibliography at `path` with default options.
pub fn lookup(path: &Path, key: &str) -> Result<NormalizedCitation, LookupError> {
    lookup_with(path, key, &LookupOptions::default())
}

/// Looks up `key` in the bibliography at `path`.
///
/// The file is read completely and closed before any scanning starts.
pub fn lookup_with(
    path: &Path,
    key: &str,
    options: &LookupOptions,
) -> Result<NormalizedCitation, LookupError> {
    let content = read_lenient(path).map_err(|source| LookupError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    lookup_in_str(&content, key, options)
}

/// Looks up `key` in bibliography text already in memory.
///
/// # Errors
///
/// [`LookupError::NotFound`] when no entry has the key, and
/// [`LookupError::MissingTitle`] when the entry has no usable title.
///
/// # Examples
///
/// ```
/// use bibcite::{lookup_in_str, LookupOptions};
///
/// let bib = "@inproceedings{roe19,\n  title = {Talk},\n  booktitle = {Proc. {X}},\n  year = 2019\n}";
/// let citation = lookup_in_str(bib, "roe19", &LookupOptions::default()).unwrap();
/// assert_eq!(citation.journal.as_deref(), Some("Proc. X"));
/// assert_eq!(citation.doi, None);
/// ```
pub fn lookup_in_str(
    content: &str,
    key: &str,
    options: &LookupOptions,
) -> Result<NormalizedCitation, LookupError> {
    let entry = locate_entry(content, key, options.strategy)
        .ok_or_else(|| LookupError::NotFound(key.to_string()))?;
    let raw = field_map(tokenize_fields(entry.body()));

    let field = |name: &str| {
        raw.get(name)
            .map(|value| normalize_field(name, value))
            .filter(|value| !value.is_empty())
    };

    let citation = NormalizedCitation {
        title: field("title"),
        author: field("author"),
        year: field("year"),
        journal: field("journal").or_else(|| field("booktitle")),
        doi: field("doi"),
    };

    if citation.title.is_none() {
        return Err(LookupError::MissingTitle(key.to_string()));
    }

    Ok(citation)
}

/// Normalizes every field of the entry for `key`, in source order.
///
/// Duplicate fields are folded (the last one wins, at the position of the
/// first). Fields that normalize to nothing are left out. Returns `None` when
/// no entry has the key.
pub fn extract_fields(
    content: &str,
    key: &str,
    options: &LookupOptions,
) -> Option<Vec<(String, String)>> {
    let entry = locate_entry(content, key, options.strategy)?;
    let tokens = tokenize_fields(entry.body());

    let mut order: Vec<String> = Vec::new();
    for token in &tokens {
        if !order.contains(&token.name) {
            order.push(token.name.clone());
        }
    }
    let raw = field_map(tokens);

    let fields = order
        .into_iter()
        .filter_map(|name| {
            let value = normalize_field(&name, raw.get(&name)?);
            (!value.is_empty()).then_some((name, value))
        })
        .collect();

    Some(fields)
}

/// Reads a file as UTF-8, dropping any byte sequences that are not valid.
pub fn read_lenient(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    let mut content = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        content.push_str(chunk.valid());
    }
    Ok(content)
}
