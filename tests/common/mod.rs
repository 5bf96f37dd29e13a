//! Shared test constants and helpers for integration tests.

#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

/// A small bibliography mixing the conventions seen in real exports.
///
/// - `doe2021`: one-line entry with nested braces in the title
/// - `vaswani2017`: multi-line title and "and"-separated authors
/// - `zhang2020`: Chinese authors separated by spaces, quoted journal
/// - `roe2019`: proceedings paper with `booktitle` and a note containing `@team{`
/// - `notitle`: entry without a title
pub const SAMPLE_BIB: &str = r#"% Sample bibliography
@article{doe2021, title={A {Study}}, author={Doe, Jane and Smith, John}, year={2021}, journal={J. Examples}, doi={10.1/x}}

@article{vaswani2017,
  title     = {Attention Is All
               You {Need}},
  author    = {Vaswani, Ashish and Shazeer, Noam and
               Parmar, Niki},
  year      = {2017},
  journal   = {Advances in Neural
               Information Processing Systems},
}

@article{zhang2020,
  title   = {深度学习综述},
  author  = {张三 李四 王小明},
  journal = "计算机学报",
  year    = 2020
}

@inproceedings{roe2019,
  title     = {\textit{Proceedings} Paper},
  author    = {Roe, Richard, Poe, Edgar},
  booktitle = {Proc. of the {ACM}},
  note      = {write to
@team{x} for data},
  year      = {©2019, reprinted},
}

@misc{notitle,
  author = {Nobody, Anne},
  year   = {2000}
}
"#;

/// Expected lookup lines for `doe2021`.
pub const DOE2021_LINES: &str = "title=A Study\nauthor=Jane Doe, John Smith\nyear=2021\njournal=J. Examples\ndoi=10.1/x\n";

/// Creates a temporary file with the given content and extension.
pub fn create_temp_file(content: &str, extension: &str) -> NamedTempFile {
    create_temp_file_bytes(content.as_bytes(), extension)
}

/// Creates a temporary file holding raw bytes (possibly invalid UTF-8).
pub fn create_temp_file_bytes(content: &[u8], extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(extension)
        .tempfile()
        .unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}
