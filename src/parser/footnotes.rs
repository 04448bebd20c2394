//! Footnote extraction and classification

use markup5ever_rcdom::Handle;

use super::node_utils::{PrunedTree, get_attr};
use crate::models::{Footnote, FootnoteType};
use crate::styles::{Role, StyleTable};

/// Attributes some providers use to carry the footnote glyph
const MARKER_ATTRIBUTES: &[&str] = &["data-caller", "data-marker"];

/// Classify footnote content by keyword, case-insensitively
///
/// Checked in priority order: Hebrew, Greek, manuscript variants, alternative
/// renderings ("or ..."), cross-references ("compare", "see ").
///
/// ```
/// use bible_text_parser::{FootnoteType, classify_footnote};
///
/// assert_eq!(classify_footnote("Hebrew means dust"), FootnoteType::Hebrew);
/// assert_eq!(classify_footnote("Or when God began to create"), FootnoteType::Alternative);
/// assert_eq!(classify_footnote("Compare Matthew 5:3"), FootnoteType::CrossReference);
/// ```
pub fn classify_footnote(content: &str) -> FootnoteType {
    let lower = content.to_lowercase();
    if lower.contains("hebrew") {
        FootnoteType::Hebrew
    } else if lower.contains("greek") {
        FootnoteType::Greek
    } else if lower.contains("manuscripts") {
        FootnoteType::TextualVariant
    } else if lower.starts_with("or ") || lower.contains(" or ") {
        FootnoteType::Alternative
    } else if lower.contains("compare") || lower.contains("see ") {
        FootnoteType::CrossReference
    } else {
        FootnoteType::Other
    }
}

/// Build a footnote from one footnote-content element
///
/// The marker comes from a marker attribute, then a marker glyph inside the
/// note, then the glyph that preceded the note in the text, and is otherwise
/// generated from `ordinal` ("a", "b", ...). Returns `None` for notes with no
/// text once the reference label and marker are set aside.
pub(crate) fn extract_footnote(
    note: &Handle,
    preceding_marker: Option<String>,
    ordinal: usize,
    verse_number: &str,
    styles: &StyleTable,
) -> Option<Footnote> {
    let mut view = PrunedTree::new(note.clone());

    let references = view.find_all(styles, |r| *r == Role::FootnoteReference);
    let reference = references
        .iter()
        .map(|r| view.text(r))
        .find(|t| !t.is_empty())
        .map(|t| {
            t.trim_end_matches(|c: char| c == ':' || c == '.' || c.is_whitespace())
                .to_string()
        })
        .unwrap_or_else(|| verse_number.to_string());
    view.prune_all(&references);

    let inner_markers = view.find_all(styles, |r| *r == Role::FootnoteMarker);
    let inner_marker = inner_markers
        .iter()
        .map(|m| view.text(m))
        .find(|t| !t.is_empty());
    view.prune_all(&inner_markers);

    let content = view.root_text();
    if content.is_empty() {
        return None;
    }

    let marker = MARKER_ATTRIBUTES
        .iter()
        .filter_map(|attr| get_attr(note, attr))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty() && value != "+" && value != "-")
        .or(inner_marker)
        .or(preceding_marker.filter(|m| !m.is_empty()))
        .unwrap_or_else(|| generated_marker(ordinal));

    Some(Footnote {
        marker,
        reference,
        footnote_type: classify_footnote(&content),
        content,
    })
}

fn generated_marker(ordinal: usize) -> String {
    let letter = char::from(b'a' + (ordinal % 26) as u8);
    letter.to_string()
}
