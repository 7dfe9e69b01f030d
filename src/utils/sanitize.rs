//! Utilities for sanitizing scraped text before it reaches the output file.

/// Sanitizes a label for the `ADDRESS:PORT#LABEL-CC` line format.
///
/// Control characters and `#` are removed (they would break the line
/// format), and runs of whitespace collapse to a single space. Non-ASCII
/// text is kept as is.
pub fn sanitize_label(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .filter(|c| *c != '#')
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trims a table cell and collapses internal whitespace.
pub fn normalize_cell(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_label_removes_hash_and_newlines() {
        assert_eq!(sanitize_label("  电信 #1\n线路 "), "电信 1 线路");
        assert_eq!(sanitize_label("a\x00b"), "a b");
    }

    #[test]
    fn test_sanitize_label_empty() {
        assert_eq!(sanitize_label(" \t\n"), "");
        assert_eq!(sanitize_label("###"), "");
    }

    #[test]
    fn test_normalize_cell() {
        assert_eq!(normalize_cell("\n  1.1.1.1 \t"), "1.1.1.1");
        assert_eq!(normalize_cell("Los   Angeles"), "Los Angeles");
    }
}
