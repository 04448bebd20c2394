//! Plain-text helpers shared by the extraction stages

/// Characters that can open a verse in place of an uppercase letter
pub const OPENING_PUNCTUATION: &[char] = &['"', '\'', '“', '‘', '(', '[', '¶'];

/// Collapse every whitespace run (including non-breaking spaces) to one space and trim
///
/// ```
/// use bible_text_parser::common::text_utils::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("  In the\u{a0}\n beginning  "), "In the beginning");
/// ```
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove a verse number glued to the start of the text
///
/// Only strips when the leading digit run equals `number` and is immediately
/// followed by a letter of either case or opening punctuation. Ordinal
/// suffixes (`"3rd"`, `"1st."`) and spaced numbers (`"3 men came"`) survive.
///
/// ```
/// use bible_text_parser::common::text_utils::strip_leading_verse_number;
///
/// assert_eq!(strip_leading_verse_number("16For God so loved", "16"), "For God so loved");
/// assert_eq!(strip_leading_verse_number("2he leadeth me", "2"), "he leadeth me");
/// assert_eq!(strip_leading_verse_number("16 men", "16"), "16 men");
/// ```
pub fn strip_leading_verse_number<'a>(text: &'a str, number: &str) -> &'a str {
    if number.is_empty() {
        return text;
    }
    let Some(rest) = text.strip_prefix(number) else {
        return text;
    };
    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        return text;
    }
    if is_ordinal_suffix(rest) {
        return text;
    }
    match rest.chars().next() {
        Some(c) if c.is_alphabetic() || OPENING_PUNCTUATION.contains(&c) => rest,
        _ => text,
    }
}

/// `st`, `nd`, `rd` or `th` standing alone after a number
fn is_ordinal_suffix(rest: &str) -> bool {
    let mut chars = rest.chars();
    let suffix: String = chars.by_ref().take(2).collect::<String>().to_lowercase();
    if !matches!(suffix.as_str(), "st" | "nd" | "rd" | "th") {
        return false;
    }
    !chars.next().is_some_and(char::is_alphabetic)
}

/// Whether `c` can start verse text in inline-numbered sources
pub fn opens_verse(c: char) -> bool {
    c.is_uppercase() || OPENING_PUNCTUATION.contains(&c)
}
