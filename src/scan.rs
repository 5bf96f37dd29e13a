//! Brace-depth scanning.
//!
//! Every stage of the lookup only needs delimiter balance, never a grammar:
//! these helpers carry a depth counter across a linear scan.

/// Returns the byte offset just past the brace that brings the depth back to
/// zero, counting from the first `{` in `text`.
///
/// Closing braces seen before the first opening brace are ignored. Returns
/// `None` when the depth never returns to zero (unbalanced input).
pub fn balanced_end(text: &str) -> Option<usize> {
    let open = text.find('{')?;
    closing_end(&text[open + 1..], 1).map(|len| open + 1 + len)
}

/// Like [`balanced_end`], but `text` starts inside `depth` groups that are
/// already open. Returns the offset just past the brace that closes the
/// outermost of them.
pub fn closing_end(text: &str, depth: usize) -> Option<usize> {
    let mut depth = depth;

    for (i, byte) in text.bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Net brace balance of `text`: opening braces minus closing braces.
pub fn brace_balance(text: &str) -> isize {
    text.bytes().fold(0, |acc, byte| match byte {
        b'{' => acc + 1,
        b'}' => acc - 1,
        _ => acc,
    })
}

/// Returns the contents of `text` when the whole of it is enclosed by one
/// matching brace pair or one pair of double quotes.
///
/// `{a} and {b}` is not enclosed: its first brace closes before the end.
pub fn outer_group(text: &str) -> Option<&str> {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        return Some(&text[1..text.len() - 1]);
    }

    if text.starts_with('{') && balanced_end(text) == Some(text.len()) {
        return Some(&text[1..text.len() - 1]);
    }

    None
}
