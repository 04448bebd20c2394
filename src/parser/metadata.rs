//! Chapter-level metadata
//!
//! Superscriptions, interludes, acrostic letters between verses, book
//! divisions and tables belong to the chapter rather than to a verse. They are
//! collected in one document-order walk that remembers the verse it is in (or
//! last left), which anchors each item to a verse number.

use std::collections::HashMap;
use std::rc::Rc;

use markup5ever_rcdom::{Handle, Node};
use tracing::debug;

use super::node_utils::{PrunedTree, get_attr, is_element, roles, tag_name};
use super::segment::{VerseSegment, normalize_verse_number};
use super::table::extract_table;
use crate::models::{AcrosticLetter, BibleTable};
use crate::styles::{Role, StyleTable};

/// Everything the document-level walk found
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DocumentMetadata {
    pub superscription: Option<String>,
    pub has_interlude: bool,
    /// Verses followed by an interlude, in document order, deduplicated
    pub interlude_positions: Vec<String>,
    /// Acrostic letters standing outside verse elements
    pub acrostic_letters: Vec<AcrosticLetter>,
    pub collection_division: Option<String>,
    pub tables: Vec<BibleTable>,
}

/// Walk the whole document once and collect chapter-level items
pub(crate) fn extract_metadata(
    document: &Handle,
    segments: &[VerseSegment],
    styles: &StyleTable,
) -> DocumentMetadata {
    let mut scan = MetadataScan {
        styles,
        verse_numbers: segments
            .iter()
            .map(|s| (Rc::as_ptr(&s.element), s.number.clone()))
            .collect(),
        last_verse: None,
        found: DocumentMetadata::default(),
    };
    scan.visit(document, None);

    let found = scan.found;
    debug!(
        superscription = found.superscription.is_some(),
        interludes = found.interlude_positions.len(),
        acrostic_letters = found.acrostic_letters.len(),
        tables = found.tables.len(),
        "Extracted chapter metadata"
    );
    found
}

struct MetadataScan<'a> {
    styles: &'a StyleTable,
    verse_numbers: HashMap<*const Node, String>,
    last_verse: Option<String>,
    found: DocumentMetadata,
}

impl MetadataScan<'_> {
    /// Verse number when `node` is a verse boundary
    ///
    /// Elements carrying a verse-number attribute count too, so fallback
    /// markup (no boundary class) still anchors metadata.
    fn verse_number(&self, node: &Handle) -> Option<String> {
        if let Some(number) = self.verse_numbers.get(&Rc::as_ptr(node)) {
            return Some(number.clone());
        }
        self.styles
            .verse_number_attributes
            .iter()
            .filter_map(|attr| get_attr(node, attr))
            .find_map(|value| normalize_verse_number(&value))
    }

    fn visit(&mut self, node: &Handle, current_verse: Option<&str>) {
        for child in node.children.borrow().iter() {
            if !is_element(child) {
                continue;
            }

            if let Some(number) = self.verse_number(child) {
                self.last_verse = Some(number.clone());
                self.visit(child, Some(&number));
                continue;
            }

            let anchor = current_verse
                .map(str::to_string)
                .or_else(|| self.last_verse.clone());
            let child_roles = roles(child, self.styles);

            if child_roles.contains(&Role::Interlude) {
                self.found.has_interlude = true;
                if let Some(verse) = anchor {
                    if !self.found.interlude_positions.contains(&verse) {
                        self.found.interlude_positions.push(verse);
                    }
                }
            } else if child_roles.contains(&Role::AcrosticLetter) {
                // Letters inside a verse element are that verse's own
                if current_verse.is_none() {
                    let letter = PrunedTree::new(child.clone()).root_text();
                    if !letter.is_empty() {
                        self.found.acrostic_letters.push(AcrosticLetter {
                            letter,
                            after_verse: anchor,
                        });
                    }
                }
            } else if child_roles.contains(&Role::Title) {
                if self.found.superscription.is_none() {
                    self.found.superscription = self.superscription_text(child);
                }
            } else if child_roles.contains(&Role::BookDivision) {
                if self.found.collection_division.is_none() {
                    let text = PrunedTree::new(child.clone()).root_text();
                    self.found.collection_division = Some(text).filter(|t| !t.is_empty());
                }
            } else if tag_name(child) == Some("table") {
                if let Some(table) = extract_table(child, anchor, self.styles) {
                    self.found.tables.push(table);
                }
            } else {
                self.visit(child, current_verse);
            }
        }
    }

    /// Title text without its footnotes or verse-number glyph
    fn superscription_text(&self, title: &Handle) -> Option<String> {
        let mut view = PrunedTree::new(title.clone());
        let hidden = view.find_all(self.styles, |r| {
            matches!(
                r,
                Role::FootnoteContent | Role::FootnoteMarker | Role::VerseNumber
            )
        });
        view.prune_all(&hidden);
        Some(view.root_text()).filter(|t| !t.is_empty())
    }
}
