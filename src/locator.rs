//! Entry locator.
//!
//! Finds the span of one `@type{key, ...}` entry inside a whole `.bib` file
//! without parsing the rest of the file.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::scan::closing_end;

/// Start of any entry on a fresh line, used by the next-marker strategy.
static NEXT_ENTRY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n@\w+\s*\{").unwrap());

/// How the end of a located entry is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoundaryStrategy {
    /// Scan forward counting braces; the entry ends where the depth returns
    /// to zero, or at end of file if it never does.
    #[default]
    Balanced,
    /// The entry ends at the next line starting with `@identifier{`.
    ///
    /// Faster, but mis-delimits entries whose values contain `@word{`.
    NextMarker,
}

/// One entry located in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry<'a> {
    /// The entry type as written (e.g. "article"); informational only.
    pub entry_type: &'a str,
    /// The citation key as spelled in the source.
    pub key: &'a str,
    /// Byte span of the whole entry in the source text.
    pub span: Range<usize>,
    text: &'a str,
    header_len: usize,
}

impl<'a> BibEntry<'a> {
    /// The full entry text, from `@` to the entry's end.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// The entry text after the `@type{key,` header.
    pub fn body(&self) -> &'a str {
        &self.text[self.header_len..]
    }
}

/// Builds the pattern matching the header of the entry for `key`.
fn header_pattern(key: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"@(\w+)\s*\{{\s*({})\s*,", regex::escape(key)))
        .case_insensitive(true)
        .build()
}

/// Locates the entry for `key` (matched case-insensitively) in `content`.
///
/// Returns `None` when no entry has that key.
///
/// # Examples
///
/// ```
/// use bibcite::{locate_entry, BoundaryStrategy};
///
/// let bib = "@book{knuth84, title={The {\\TeX}book}}\n@misc{other, title={x}}";
/// let entry = locate_entry(bib, "KNUTH84", BoundaryStrategy::Balanced).unwrap();
/// assert_eq!(entry.entry_type, "book");
/// assert_eq!(entry.text(), "@book{knuth84, title={The {\\TeX}book}}");
/// ```
pub fn locate_entry<'a>(
    content: &'a str,
    key: &str,
    strategy: BoundaryStrategy,
) -> Option<BibEntry<'a>> {
    let pattern = match header_pattern(key) {
        Ok(pattern) => pattern,
        Err(e) => {
            tracing::warn!(key, error = %e, "cannot build entry pattern");
            return None;
        }
    };

    let caps = pattern.captures(content)?;
    let header = caps.get(0)?;
    let start = header.start();
    let rest = &content[header.end()..];

    // Both scans begin after the header, so braces inside the key never end
    // the entry and the span always covers the whole header.
    let end = match strategy {
        BoundaryStrategy::Balanced => match closing_end(rest, 1) {
            Some(len) => header.end() + len,
            None => {
                tracing::warn!(key, "entry braces never balance, reading to end of file");
                content.len()
            }
        },
        BoundaryStrategy::NextMarker => NEXT_ENTRY
            .find(rest)
            .map_or(content.len(), |m| header.end() + m.start()),
    };

    let entry = BibEntry {
        entry_type: caps.get(1)?.as_str(),
        key: caps.get(2)?.as_str(),
        span: start..end,
        text: &content[start..end],
        header_len: header.end() - start,
    };

    tracing::debug!(
        key = entry.key,
        entry_type = entry.entry_type,
        start,
        end,
        ?strategy,
        "located entry"
    );

    Some(entry)
}
