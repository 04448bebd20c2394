//! Flat inline-number text
//!
//! Some providers send a chapter as running text with each verse number glued
//! to the start of its verse ("1In the beginning... 2And the earth"). There
//! is no structure to walk, so verse markers are recognized in the text with
//! look-ahead on the expected next number. The result carries verse text
//! only.

use tracing::debug;

use super::node_utils::{PrunedTree, find_body, parse_html};
use crate::common::text_utils::{normalize_whitespace, opens_verse};
use crate::models::UnifiedVerse;

/// Verse numbers may skip at most this many omitted verses
const MAX_SKIPPED_VERSES: u32 = 3;

/// Longest digit run read as a verse number
const MAX_NUMBER_DIGITS: usize = 3;

#[derive(Debug, PartialEq, Eq)]
struct InlineMarker {
    start: usize,
    text_start: usize,
    number: u32,
}

/// Split flat markup or text into verses
pub(crate) fn flat_verses(raw: &str) -> Vec<UnifiedVerse> {
    let dom = parse_html(raw);
    let text = PrunedTree::new(find_body(&dom)).root_text();
    let markers = find_markers(&text);

    if let Some(first) = markers.first() {
        if first.start > 0 {
            debug!(
                "Dropping {} byte(s) of text before the first verse number",
                first.start
            );
        }
    }

    let mut verses = Vec::with_capacity(markers.len());
    for (i, marker) in markers.iter().enumerate() {
        let end = markers.get(i + 1).map_or(text.len(), |next| next.start);
        let verse_text = normalize_whitespace(&text[marker.text_start..end]);
        if verse_text.is_empty() {
            continue;
        }
        let mut verse = UnifiedVerse::new(marker.number.to_string(), verse_text);
        if verses.is_empty() && marker.number == 1 {
            verse.is_first_verse_of_chapter = true;
            verse.starts_new_paragraph = true;
        }
        verses.push(verse);
    }

    debug!("Flat text split into {} verse(s)", verses.len());
    verses
}

/// Locate glued verse numbers, tracking the expected next number
fn find_markers(text: &str) -> Vec<InlineMarker> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut markers = Vec::new();
    let mut expected: Option<u32> = None;
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];
        let starts_run = c.is_ascii_digit() && (i == 0 || !chars[i - 1].1.is_alphanumeric());
        if !starts_run {
            i += 1;
            continue;
        }

        let mut run_end = i;
        while run_end < chars.len() && chars[run_end].1.is_ascii_digit() {
            run_end += 1;
        }

        let accepted = (1..=(run_end - i).min(MAX_NUMBER_DIGITS))
            .rev()
            .find_map(|len| accept_marker(text, &chars, i, len, expected));

        match accepted {
            Some((number, text_index)) => {
                let text_start = chars.get(text_index).map_or(text.len(), |(pos, _)| *pos);
                markers.push(InlineMarker {
                    start,
                    text_start,
                    number,
                });
                expected = Some(number + 1);
                i = text_index;
            }
            None => i = run_end,
        }
    }

    markers
}

/// Decide whether the first `len` digits at `i` are a verse marker
///
/// Returns the verse number and the char index where the verse text starts.
fn accept_marker(
    text: &str,
    chars: &[(usize, char)],
    i: usize,
    len: usize,
    expected: Option<u32>,
) -> Option<(u32, usize)> {
    let start = chars[i].0;
    let end = chars.get(i + len).map_or(text.len(), |(pos, _)| *pos);
    let number: u32 = text[start..end].parse().ok()?;
    if number == 0 {
        return None;
    }

    let (next, spaced) = match chars.get(i + len) {
        Some((_, ' ')) => (chars.get(i + len + 1).map(|(_, c)| *c), true),
        Some((_, c)) => (Some(*c), false),
        None => (None, false),
    };
    let next = next?;
    let text_index = if spaced { i + len + 1 } else { i + len };

    let accepted = match expected {
        None => opens_verse(next) && (!spaced || number == 1),
        Some(want) if number == want => {
            opens_verse(next) || (!spaced && next.is_alphabetic())
        }
        Some(want) => {
            number > want && number <= want + MAX_SKIPPED_VERSES && !spaced && opens_verse(next)
        }
    };

    accepted.then_some((number, text_index))
}
