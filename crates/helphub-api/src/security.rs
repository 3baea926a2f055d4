//! Input sanitization for free-text fields.

/// Maximum length of a display name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length of an address.
pub const MAX_ADDRESS_LENGTH: usize = 500;

/// Maximum length of booking notes and worker bios.
pub const MAX_TEXT_LENGTH: usize = 2000;

/// Strip control characters (newlines and tabs excepted), trim, and cap at `max_chars`.
pub fn sanitize_text(input: &str, max_chars: usize) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .take(max_chars)
        .collect()
}

/// Single-line variant of [`sanitize_text`] for names and phone numbers.
pub fn sanitize_line(input: &str, max_chars: usize) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(max_chars)
        .collect()
}

/// Sanitize an optional field, mapping blank results to `None`.
pub fn sanitize_optional(input: Option<String>, max_chars: usize) -> Option<String> {
    input
        .map(|s| sanitize_text(&s, max_chars))
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("  hello\u{0}\nworld ", 100), "hello\nworld");
        assert_eq!(sanitize_text("abcdef", 3), "abc");
    }

    #[test]
    fn test_sanitize_line() {
        assert_eq!(sanitize_line(" Ann\nLee ", 100), "AnnLee");
    }

    #[test]
    fn test_sanitize_optional() {
        assert_eq!(sanitize_optional(Some("   ".into()), 10), None);
        assert_eq!(sanitize_optional(Some(" x ".into()), 10), Some("x".into()));
        assert_eq!(sanitize_optional(None, 10), None);
    }
}
