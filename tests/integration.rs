//! Integration tests using TOML fixtures.
//!
//! This test harness loads test cases from TOML files in the `fixtures/` directory
//! and runs them against the bibcite library.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use bibcite::{
    lookup_in_str, normalize_authors, render_lines, split_authors, BoundaryStrategy,
    LookupOptions,
};

/// A test fixture loaded from a TOML file.
#[derive(Debug, Deserialize)]
struct Fixture {
    /// Name of the test case
    name: String,
    /// BibTeX source text (lookup and error tests)
    #[serde(default)]
    bib: String,
    /// Citation key to look up
    #[serde(default)]
    key: String,
    /// Raw author value (author tests)
    #[serde(default)]
    author: String,
    /// Entry boundary strategy: "balanced" (default) or "next-marker"
    #[serde(default)]
    strategy: Option<String>,
    /// Expected output: `field=value` lines, or the normalized author string
    #[serde(default)]
    expected: Option<String>,
    /// Expected author rule name (author tests)
    #[serde(default)]
    expected_rule: Option<String>,
    /// Expected error message fragment (error tests)
    #[serde(default)]
    expected_error: Option<String>,
}

impl Fixture {
    fn options(&self) -> LookupOptions {
        let strategy = match self.strategy.as_deref() {
            None | Some("balanced") => BoundaryStrategy::Balanced,
            Some("next-marker") => BoundaryStrategy::NextMarker,
            Some(other) => panic!("Test '{}': unknown strategy '{}'", self.name, other),
        };
        LookupOptions { strategy }
    }
}

/// Load all fixtures from a directory.
fn load_fixtures(dir: &Path) -> Vec<(String, Fixture)> {
    let mut fixtures = Vec::new();

    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();

        if path.extension().map_or(false, |e| e == "toml") {
            let content = fs::read_to_string(&path).unwrap();
            let fixture: Fixture = toml::from_str(&content).unwrap();
            let name = path.file_stem().unwrap().to_string_lossy().to_string();
            fixtures.push((name, fixture));
        }
    }

    assert!(!fixtures.is_empty(), "no fixtures found in {}", dir.display());
    fixtures.sort_by(|a, b| a.0.cmp(&b.0));
    fixtures
}

fn fixtures_in(subdir: &str) -> Vec<(String, Fixture)> {
    load_fixtures(&Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(subdir))
}

/// Run lookup tests - look up the key and compare the rendered lines.
fn run_lookup_test(name: &str, fixture: &Fixture) {
    let citation = lookup_in_str(&fixture.bib, &fixture.key, &fixture.options())
        .unwrap_or_else(|e| panic!("Test '{}' failed with unexpected error: {}", name, e));

    let output = render_lines(&citation);
    let expected = fixture.expected.as_deref().unwrap_or_default();
    assert_eq!(
        output.trim_end(),
        expected.trim_end(),
        "Test '{}' output mismatch",
        name
    );
}

/// Run author tests - normalize the raw author value.
fn run_author_test(name: &str, fixture: &Fixture) {
    let list = split_authors(&fixture.author);

    if let Some(expected) = &fixture.expected {
        assert_eq!(
            list.joined(),
            *expected,
            "Test '{}' author mismatch (rule {:?})",
            name,
            list.rule
        );
        assert_eq!(
            normalize_authors(&fixture.author),
            *expected,
            "Test '{}' normalize_authors disagrees with split_authors",
            name
        );
    }

    if let Some(expected_rule) = &fixture.expected_rule {
        assert_eq!(
            format!("{:?}", list.rule),
            *expected_rule,
            "Test '{}' rule mismatch",
            name
        );
    }
}

/// Run error tests - verify proper error handling.
fn run_error_test(name: &str, fixture: &Fixture) {
    match lookup_in_str(&fixture.bib, &fixture.key, &fixture.options()) {
        Ok(citation) => panic!(
            "Test '{}' expected an error but succeeded with {:?}",
            name, citation
        ),
        Err(e) => {
            let expected_error = fixture.expected_error.as_deref().unwrap_or_default();
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected_error),
                "Test '{}' error mismatch: expected '{}', got '{}'",
                name,
                expected_error,
                error_msg
            );
        }
    }
}

#[test]
fn test_lookup_fixtures() {
    for (name, fixture) in fixtures_in("lookup") {
        println!("Running lookup test: {}", fixture.name);
        run_lookup_test(&name, &fixture);
    }
}

#[test]
fn test_author_fixtures() {
    for (name, fixture) in fixtures_in("authors") {
        println!("Running author test: {}", fixture.name);
        run_author_test(&name, &fixture);
    }
}

#[test]
fn test_error_fixtures() {
    for (name, fixture) in fixtures_in("errors") {
        println!("Running error test: {}", fixture.name);
        run_error_test(&name, &fixture);
    }
}
