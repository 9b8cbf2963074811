//! Shared text normalization helpers.

/// Trim an optional string and drop empty values.
///
/// # Returns
/// `None` when the input is missing or whitespace-only; otherwise the trimmed
/// string.
pub fn normalize_optional_nonempty(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Drop leading and trailing lines that contain only whitespace.
///
/// Interior blank lines and indentation on the first content line are kept.
pub fn trim_blank_lines(content: &str) -> &str {
    let mut start = 0usize;
    for line in content.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        start += line.len();
    }
    let rest = &content[start..];
    let end = rest
        .char_indices()
        .rev()
        .find(|(_, ch)| !ch.is_whitespace())
        .map(|(idx, ch)| idx + ch.len_utf8())
        .unwrap_or(0);
    &rest[..end]
}

#[cfg(test)]
mod tests {
    use super::{normalize_optional_nonempty, trim_blank_lines};

    #[test]
    fn normalize_optional_nonempty_trims_and_drops_blank() {
        assert_eq!(
            normalize_optional_nonempty(Some("  value  ".to_string())),
            Some("value".to_string())
        );
        assert_eq!(normalize_optional_nonempty(Some("   ".to_string())), None);
        assert_eq!(normalize_optional_nonempty(None), None);
    }

    #[test]
    fn trim_blank_lines_keeps_indentation_and_interior_gaps() {
        let content = "\n  \n    def f():\n\n        pass\n\n\t\n";
        assert_eq!(trim_blank_lines(content), "    def f():\n\n        pass");
        assert_eq!(trim_blank_lines(" \n\t\n"), "");
        assert_eq!(trim_blank_lines("plain"), "plain");
    }
}
