//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Append `addition` to an accumulator, newline-joined and trimmed.
///
/// Empty (or whitespace-only) additions leave the accumulator unchanged, so
/// the previous value is always a prefix of the result.
pub fn append_line(accumulator: &str, addition: &str) -> String {
    let addition = addition.trim();
    if addition.is_empty() {
        return accumulator.to_string();
    }
    format!("{}\n{}", accumulator, addition).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // "é" is two bytes; the cut must not split it
        assert_eq!(truncate("ééééé", 6), "é...");
    }

    #[test]
    fn test_append_line_to_empty() {
        assert_eq!(append_line("", "  cite sources  "), "cite sources");
    }

    #[test]
    fn test_append_line_joins_with_newline() {
        assert_eq!(append_line("a", "b"), "a\nb");
    }

    #[test]
    fn test_append_line_ignores_blank() {
        assert_eq!(append_line("a", "   "), "a");
    }

    #[test]
    fn test_append_line_keeps_prefix() {
        let first = append_line("", "one");
        let second = append_line(&first, "two");
        assert!(second.starts_with(&first));
    }
}
