//! Content-based language detection.
//!
//! Detection is best effort: it returns `None` when nothing distinctive is
//! found and never panics or errors on odd input.

/// Language canonicalization and manual option tables.
pub mod canonical;
mod heuristic;
#[cfg(test)]
mod tests;

use crate::text::trim_blank_lines;

/// Detect the language of text content.
///
/// Leading and trailing blank lines are stripped before inspection.
///
/// # Returns
/// Canonicalized language label when detection succeeds, otherwise `None`.
pub fn detect_language(content: &str) -> Option<String> {
    let sample = trim_blank_lines(content);
    if sample.is_empty() {
        return None;
    }
    heuristic::detect(sample)
        .map(canonical::canonicalize)
        .filter(|label| !label.is_empty() && label != "text")
}
