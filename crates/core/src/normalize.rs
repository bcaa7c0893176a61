//! Text normalization for extracted page content.
//!
//! All text pulled out of the page goes through the same pass: Unicode NFC,
//! whitespace runs collapsed to single spaces, ends trimmed. A minimum-length
//! gate then drops fragments too short to be real copy.

use unicode_normalization::UnicodeNormalization;

/// Minimum number of characters a normalized entry must have to be kept.
/// Anything shorter is stray punctuation or decoration markup.
pub const MIN_TEXT_CHARS: usize = 4;

/// Collapse every whitespace run (spaces, tabs, newlines, NBSP) to a single
/// space and trim the ends. Input is NFC-composed first so visually identical
/// strings compare equal downstream.
pub fn normalize_text(text: &str) -> String {
    let composed: String = text.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether a normalized entry clears the minimum-length noise filter.
pub fn is_substantial(text: &str) -> bool {
    text.chars().count() >= MIN_TEXT_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_mixed_whitespace() {
        assert_eq!(normalize_text("Hello   \n  World"), "Hello World");
        assert_eq!(normalize_text("\t\tHello\t\t"), "Hello");
        assert_eq!(normalize_text("  one two  three "), "one two three");
    }

    #[test]
    fn test_nbsp_collapses() {
        assert_eq!(normalize_text("Hello\u{a0}\u{a0}World"), "Hello World");
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \n\t "), "");
    }

    #[test]
    fn test_nfc_composition() {
        // "e" + combining acute composes to a single char
        assert_eq!(normalize_text("cafe\u{301}"), "caf\u{e9}");
    }

    #[test]
    fn test_minimum_length_gate() {
        assert!(!is_substantial("ok"));
        assert!(!is_substantial("..."));
        assert!(is_substantial("okay"));
        assert!(is_substantial("The front lines"));
    }
}
