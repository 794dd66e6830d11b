//! Merging of dictated fragments into a growing text buffer.

/// Punctuation that must hug the preceding word: when an addition starts
/// with one of these, no separator is inserted. Covers both Latin and
/// Persian closing punctuation.
const HUGGING_PUNCTUATION: &[char] = &[
    '.', '،', '؛', ':', '!', '؟', '?', '-', ']', ')', '»', '"', '\'',
];

/// Merge `base` with a newly recognized addition.
///
/// The addition is the concatenation of the finalized fragment and the
/// current interim fragment. Rules, in order:
///
/// - empty addition returns `base` unchanged;
/// - empty `base` returns the addition;
/// - an addition starting with a newline or with closing punctuation is
///   concatenated directly;
/// - a `base` already ending in whitespace is concatenated directly;
/// - otherwise a single space separates the two.
pub fn combine(base: &str, final_fragment: &str, interim_fragment: &str) -> String {
    let addition = format!("{}{}", final_fragment, interim_fragment);
    if addition.is_empty() {
        return base.to_string();
    }
    if base.is_empty() {
        return addition;
    }

    let leading = addition.chars().next();
    if leading == Some('\n') {
        return format!("{}{}", base, addition);
    }
    if leading.is_some_and(|c| HUGGING_PUNCTUATION.contains(&c)) {
        return format!("{}{}", base, addition);
    }

    if base.chars().last().is_some_and(char::is_whitespace) {
        return format!("{}{}", base, addition);
    }

    format!("{} {}", base, addition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_addition_is_noop() {
        assert_eq!(combine("", "", ""), "");
        assert_eq!(combine("hello", "", ""), "hello");
        assert_eq!(combine("hello ", "", ""), "hello ");
        assert_eq!(combine("hello\n", "", ""), "hello\n");
    }

    #[test]
    fn test_empty_base_returns_addition() {
        assert_eq!(combine("", "hello", ""), "hello");
        assert_eq!(combine("", "hello", " world"), "hello world");
        assert_eq!(combine("", "", "interim"), "interim");
    }

    #[test]
    fn test_space_inserted_between_words() {
        assert_eq!(combine("hello", "world", ""), "hello world");
        assert_eq!(combine("hello", "", "world"), "hello world");
    }

    #[test]
    fn test_no_double_space() {
        assert_eq!(combine("hello ", "world", ""), "hello world");
        assert_eq!(combine("hello\t", "world", ""), "hello\tworld");
    }

    #[test]
    fn test_punctuation_hugs_base() {
        assert_eq!(combine("hello", ".", ""), "hello.");
        assert_eq!(combine("hello", "!", ""), "hello!");
        assert_eq!(combine("hello", "? really", ""), "hello? really");
        assert_eq!(combine("سلام", "؟", ""), "سلام؟");
        assert_eq!(combine("سلام", "،", ""), "سلام،");
    }

    #[test]
    fn test_newline_addition_concatenates_directly() {
        assert_eq!(combine("hello", "\nworld", ""), "hello\nworld");
        assert_eq!(combine("hello", "\n", ""), "hello\n");
    }

    #[test]
    fn test_base_ending_in_newline() {
        assert_eq!(combine("hello\n", "world", ""), "hello\nworld");
    }

    #[test]
    fn test_final_and_interim_joined_before_merge() {
        // The two fragments form one addition; no separator between them.
        assert_eq!(combine("note", "first", "second"), "note firstsecond");
    }

    #[test]
    fn test_idempotent_under_repeated_empty_calls() {
        let mut text = "a sentence ".to_string();
        for _ in 0..5 {
            text = combine(&text, "", "");
        }
        assert_eq!(text, "a sentence ");
    }
}
