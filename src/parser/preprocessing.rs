//! Markup preprocessing before the tree is built
//!
//! Some providers leave a paragraph open at the end of a verse element. An
//! HTML tree builder then ignores the verse's closing tag (it cannot close
//! across the open paragraph) and nests the following verses inside the
//! paragraph, merging their text. Closing the paragraph before the verse
//! closer keeps each verse self-contained.

use std::borrow::Cow;

use tracing::debug;

use super::markers::{MarkerScanner, find_tag};

/// Balance paragraph tags inside every closed verse-boundary element
///
/// Only tag balance changes; text is never touched. Input without an
/// imbalance is returned unchanged (borrowed).
///
/// # Example
///
/// ```
/// use bible_text_parser::repair;
///
/// let raw = r#"<span data-verse="1"><p>In the beginning</span><span data-verse="2">And</span>"#;
/// assert_eq!(
///     repair(raw),
///     r#"<span data-verse="1"><p>In the beginning</p></span><span data-verse="2">And</span>"#
/// );
/// ```
pub fn repair(raw: &str) -> Cow<'_, str> {
    repair_with(raw, &MarkerScanner::standard())
}

pub(crate) fn repair_with<'a>(raw: &'a str, scanner: &MarkerScanner) -> Cow<'a, str> {
    let mut insertions: Vec<(usize, usize)> = Vec::new();

    for span in scanner.scan(raw).iter().filter(|s| s.closed && !s.milestone) {
        let body = span.body(raw).to_ascii_lowercase();
        let opens = count_tags(&body, "<p");
        let closes = count_tags(&body, "</p");
        if opens > closes {
            insertions.push((span.body_end, opens - closes));
        }
    }

    if insertions.is_empty() {
        return Cow::Borrowed(raw);
    }

    let missing: usize = insertions.iter().map(|(_, n)| n).sum();
    let mut repaired = String::with_capacity(raw.len() + missing * 4);
    let mut copied = 0;
    for (at, count) in &insertions {
        repaired.push_str(&raw[copied..*at]);
        for _ in 0..*count {
            repaired.push_str("</p>");
        }
        copied = *at;
    }
    repaired.push_str(&raw[copied..]);

    debug!(
        "Repaired markup: closed {} paragraph tag(s) in {} verse element(s)",
        missing,
        insertions.len()
    );

    Cow::Owned(repaired)
}

fn count_tags(lower: &str, needle: &str) -> usize {
    let mut count = 0;
    let mut from = 0;
    while let Some(at) = find_tag(&lower[from..], needle) {
        count += 1;
        from += at + needle.len();
    }
    count
}
