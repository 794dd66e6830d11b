//! Spoken punctuation commands rewritten into literal characters.
//!
//! Each supported language family carries a table of phrase → literal
//! pairs. Phrases are matched case-insensitively as whole words, longest
//! phrase first so that "exclamation mark" wins over any shorter phrase it
//! contains. Matching consumes the horizontal whitespace before the phrase
//! so the produced punctuation hugs the preceding word ("hello world
//! period" becomes "hello world."); a preceding newline is preserved.

use std::sync::OnceLock;

use regex::{NoExpand, Regex};

/// English command phrases and their literal replacements.
const ENGLISH_COMMANDS: &[(&str, &str)] = &[
    ("question mark", "?"),
    ("exclamation mark", "!"),
    ("exclamation point", "!"),
    ("period", "."),
    ("dot", "."),
    ("comma", ","),
    ("new line", "\n"),
    ("enter", "\n"),
    ("colon", ":"),
    ("semicolon", ";"),
    ("dash", "-"),
    ("hyphen", "-"),
    ("open bracket", "["),
    ("close bracket", "]"),
    ("open parenthesis", "("),
    ("close parenthesis", ")"),
    ("quote", "\""),
];

/// Persian command phrases and their literal replacements.
const PERSIAN_COMMANDS: &[(&str, &str)] = &[
    ("علامت سوال", "؟"),
    ("علامت تعجب", "!"),
    ("نقطه ویرگول", "؛"),
    ("نقطه", "."),
    ("ویرگول", "،"),
    ("سوال", "؟"),
    ("تعجب", "!"),
    ("خط جدید", "\n"),
    ("اینتر", "\n"),
    ("دونقطه", ":"),
    ("خط تیره", "-"),
    ("کروشه باز", "["),
    ("کروشه بسته", "]"),
    ("پرانتز باز", "("),
    ("پرانتز بسته", ")"),
    ("گیومه باز", "«"),
    ("گیومه بسته", "»"),
];

/// How phrase occurrences are delimited in the host language.
enum Matcher {
    /// Latin word boundaries for space-separated languages.
    WordBoundary(Regex),
    /// Adjacent whitespace or string edge for languages whose script has no
    /// Latin word boundary.
    WhitespaceDelimited(Regex),
}

struct Rule {
    matcher: Matcher,
    replacement: &'static str,
}

struct CommandTable {
    rules: Vec<Rule>,
}

impl CommandTable {
    fn word_boundary(commands: &[(&'static str, &'static str)]) -> Self {
        let rules = sorted_longest_first(commands)
            .into_iter()
            .map(|(phrase, replacement)| Rule {
                matcher: Matcher::WordBoundary(
                    Regex::new(&format!(r"(?i)[ \t]*\b{}\b", regex::escape(phrase)))
                        .expect("command phrase regex"),
                ),
                replacement,
            })
            .collect();
        Self { rules }
    }

    fn whitespace_delimited(commands: &[(&'static str, &'static str)]) -> Self {
        let rules = sorted_longest_first(commands)
            .into_iter()
            .map(|(phrase, replacement)| Rule {
                matcher: Matcher::WhitespaceDelimited(
                    Regex::new(&format!(r"(?i)(^|\s)({})(\s|$)", regex::escape(phrase)))
                        .expect("command phrase regex"),
                ),
                replacement,
            })
            .collect();
        Self { rules }
    }

    /// Apply every rule once, longest phrase first. Replacements are not
    /// re-scanned by the rule that produced them.
    fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for rule in &self.rules {
            result = match &rule.matcher {
                Matcher::WordBoundary(pattern) => pattern
                    .replace_all(&result, NoExpand(rule.replacement))
                    .into_owned(),
                Matcher::WhitespaceDelimited(pattern) => pattern
                    .replace_all(&result, |caps: &regex::Captures| {
                        let before = caps.get(1).map_or("", |m| m.as_str());
                        let after = caps.get(3).map_or("", |m| m.as_str());
                        // Hug the preceding word: drop a leading space, keep
                        // a leading newline.
                        let kept = if before.contains('\n') { before } else { "" };
                        format!("{}{}{}", kept, rule.replacement, after)
                    })
                    .into_owned(),
            };
        }
        result
    }
}

fn sorted_longest_first(
    commands: &[(&'static str, &'static str)],
) -> Vec<(&'static str, &'static str)> {
    let mut sorted = commands.to_vec();
    sorted.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
    sorted
}

fn english_table() -> &'static CommandTable {
    static TABLE: OnceLock<CommandTable> = OnceLock::new();
    TABLE.get_or_init(|| CommandTable::word_boundary(ENGLISH_COMMANDS))
}

fn persian_table() -> &'static CommandTable {
    static TABLE: OnceLock<CommandTable> = OnceLock::new();
    TABLE.get_or_init(|| CommandTable::whitespace_delimited(PERSIAN_COMMANDS))
}

/// Rewrite spoken punctuation commands in `text` into literal characters.
///
/// The command table is selected by the language family of `language_tag`:
/// a tag starting with "fa" selects the Persian table, anything else the
/// English one. Empty input is returned unchanged.
pub fn translate(text: &str, language_tag: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let table = if language_tag.starts_with("fa") {
        persian_table()
    } else {
        english_table()
    };
    table.apply(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_noop() {
        assert_eq!(translate("", "en-US"), "");
        assert_eq!(translate("", "fa-IR"), "");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(translate("hello world", "en-US"), "hello world");
    }

    #[test]
    fn test_new_line_phrase() {
        assert_eq!(translate("new line", "en-US"), "\n");
        // Only the whole-word phrase is replaced; "test" is untouched.
        assert_eq!(translate("new line test", "en-US"), "\n test");
    }

    #[test]
    fn test_longest_phrase_wins() {
        assert_eq!(translate("exclamation mark", "en-US"), "!");
        assert_eq!(translate("exclamation point", "en-US"), "!");
        assert_eq!(translate("question mark", "en-US"), "?");
    }

    #[test]
    fn test_punctuation_hugs_preceding_word() {
        assert_eq!(translate("hello world period", "en-US"), "hello world.");
        assert_eq!(translate("wait comma then go", "en-US"), "wait, then go");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(translate("Hello World Period", "en-US"), "Hello World.");
        assert_eq!(translate("NEW LINE", "en-US"), "\n");
    }

    #[test]
    fn test_word_boundary_prevents_substring_match() {
        // "dot" must not fire inside "dotted", "enter" not inside "center".
        assert_eq!(translate("a dotted line", "en-US"), "a dotted line");
        assert_eq!(translate("the center point", "en-US"), "the center point");
    }

    #[test]
    fn test_newline_before_phrase_preserved() {
        assert_eq!(translate("hello\nperiod", "en-US"), "hello\n.");
    }

    #[test]
    fn test_multiple_commands_in_one_fragment() {
        assert_eq!(
            translate("one period two period", "en-US"),
            "one. two."
        );
    }

    #[test]
    fn test_brackets_and_parentheses() {
        assert_eq!(translate("open bracket x close bracket", "en-US"), "[ x]");
        assert_eq!(
            translate("open parenthesis note close parenthesis", "en-US"),
            "( note)"
        );
    }

    #[test]
    fn test_persian_commands() {
        assert_eq!(translate("سلام نقطه", "fa-IR"), "سلام.");
        assert_eq!(translate("سوال", "fa-IR"), "؟");
        assert_eq!(translate("خط جدید", "fa-IR"), "\n");
    }

    #[test]
    fn test_persian_longest_phrase_wins() {
        // "نقطه ویرگول" is the semicolon, not a period followed by a comma.
        assert_eq!(translate("نقطه ویرگول", "fa-IR"), "؛");
        assert_eq!(translate("علامت سوال", "fa-IR"), "؟");
    }

    #[test]
    fn test_persian_boundary_requires_whitespace() {
        // A phrase embedded in a longer word is left alone.
        assert_eq!(translate("بینقطهای", "fa-IR"), "بینقطهای");
    }

    #[test]
    fn test_language_family_selection() {
        // Any "fa"-prefixed tag selects the Persian table.
        assert_eq!(translate("نقطه", "fa"), ".");
        assert_eq!(translate("نقطه", "fa-AF"), ".");
        // Everything else falls back to English.
        assert_eq!(translate("period", "de-DE"), ".");
    }
}
