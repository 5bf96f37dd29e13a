//! bibcite: look up BibTeX entries by citation key.
//!
//! This library provides functionality to:
//! - Locate one entry in a `.bib` file by its key, without parsing the rest
//! - Tokenize the entry's fields, including nested and multi-line values
//! - Normalize field values, in particular author lists in mixed conventions
//! - Render the result as `field=value` lines for note-taking tools

pub mod authors;
pub mod fields;
pub mod locator;
pub mod lookup;
pub mod normalize;
pub mod output;
pub mod scan;

pub use authors::{normalize_authors, split_authors, AuthorList, AuthorRule};
pub use fields::{field_map, tokenize_fields, RawField};
pub use locator::{locate_entry, BibEntry, BoundaryStrategy};
pub use lookup::{
    extract_fields, lookup, lookup_in_str, lookup_with, read_lenient, LookupError, LookupOptions,
    NormalizedCitation, CITATION_FIELDS,
};
pub use normalize::{normalize_field, FieldKind};
pub use output::{render_json, render_lines, render_pairs};
