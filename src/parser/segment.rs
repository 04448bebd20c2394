//! Verse segmentation
//!
//! Structural segmentation finds verse-boundary elements in the tree. When the
//! tree shows none, fallback segmentation locates them in the raw markup and
//! parses each verse body into its own small tree. The two results are kept
//! apart as [`Segmentation`] variants so the degraded path is never mistaken
//! for the structural one.

use std::collections::HashSet;
use std::rc::Rc;

use markup5ever_rcdom::{Handle, Node, RcDom};
use tracing::{debug, warn};

use super::markers::MarkerScanner;
use super::node_utils::{
    PrunedTree, Walk, find_body, get_attr, has_role, is_element, parse_html, roles,
};
use crate::models::ParseMode;
use crate::styles::{Role, StyleTable};

/// One verse's element plus the number it was found under
pub(crate) struct VerseSegment {
    pub number: String,
    pub element: Handle,
    /// Source markup of the verse body, known up front on the fallback path
    pub raw_markup: Option<String>,
    /// First verse inside a prose-paragraph wrapper
    pub opens_paragraph: bool,
    /// Heading standing between the previous verse and this one
    pub leading_heading: Option<String>,
    /// Root of the tree `element` lives in; dropping it would empty the tree
    _document: Handle,
}

impl VerseSegment {
    pub(crate) fn new(number: String, element: Handle, document: Handle) -> Self {
        Self {
            number,
            element,
            raw_markup: None,
            opens_paragraph: false,
            leading_heading: None,
            _document: document,
        }
    }
}

/// Segmentation result tagged with the path that produced it
pub(crate) enum Segmentation {
    Structural(Vec<VerseSegment>),
    Fallback(Vec<VerseSegment>),
}

impl Segmentation {
    pub(crate) fn mode(&self) -> ParseMode {
        match self {
            Segmentation::Structural(_) => ParseMode::Structural,
            Segmentation::Fallback(_) => ParseMode::Fallback,
        }
    }

    pub(crate) fn segments(&self) -> &[VerseSegment] {
        match self {
            Segmentation::Structural(segments) | Segmentation::Fallback(segments) => segments,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.segments().is_empty()
    }
}

/// Split a parsed chapter into verse segments, in source order
pub(crate) fn segment(
    dom: &RcDom,
    raw: &str,
    styles: &StyleTable,
    scanner: &MarkerScanner,
) -> Segmentation {
    let structural = structural_segments(dom, styles);
    if !structural.is_empty() {
        debug!("Structural segmentation found {} verse(s)", structural.len());
        return Segmentation::Structural(structural);
    }

    let fallback = fallback_segments(raw, scanner);
    debug!("Fallback segmentation found {} verse(s)", fallback.len());
    Segmentation::Fallback(fallback)
}

/// Every verse-boundary element in document order, nested ones included
fn structural_segments(dom: &RcDom, styles: &StyleTable) -> Vec<VerseSegment> {
    let mut scan = BoundaryScan {
        styles,
        found: Vec::new(),
        seen_paragraphs: HashSet::new(),
        pending_heading: None,
    };
    scan.visit(&dom.document, None, false);

    scan.found
        .into_iter()
        .enumerate()
        .map(|(index, found)| {
            let number = verse_number_of(&found.element, styles).unwrap_or_else(|| {
                let positional = (index + 1).to_string();
                warn!(
                    "Verse element without a usable number, using position {}",
                    positional
                );
                positional
            });
            let mut segment = VerseSegment::new(number, found.element, dom.document.clone());
            segment.opens_paragraph = found.opens_paragraph;
            segment.leading_heading = found.leading_heading;
            segment
        })
        .collect()
}

struct FoundBoundary {
    element: Handle,
    opens_paragraph: bool,
    leading_heading: Option<String>,
}

/// Document-order walk that also tracks paragraph wrappers and headings
/// standing between verses
struct BoundaryScan<'a> {
    styles: &'a StyleTable,
    found: Vec<FoundBoundary>,
    seen_paragraphs: HashSet<*const Node>,
    pending_heading: Option<String>,
}

impl BoundaryScan<'_> {
    fn visit(&mut self, node: &Handle, paragraph: Option<*const Node>, in_verse: bool) {
        for child in node.children.borrow().iter() {
            if !is_element(child) {
                continue;
            }
            let roles = roles(child, self.styles);
            let paragraph = if roles.contains(&Role::BodyParagraph) {
                Some(Rc::as_ptr(child))
            } else {
                paragraph
            };

            if roles.contains(&Role::VerseBoundary) {
                let opens_paragraph = paragraph.is_some_and(|p| self.seen_paragraphs.insert(p));
                self.found.push(FoundBoundary {
                    element: child.clone(),
                    opens_paragraph,
                    leading_heading: self.pending_heading.take(),
                });
                self.visit(child, paragraph, true);
            } else if !in_verse && roles.contains(&Role::Heading) {
                let text = PrunedTree::new(child.clone()).root_text();
                if !text.is_empty() {
                    self.pending_heading = Some(text);
                }
            } else {
                self.visit(child, paragraph, in_verse);
            }
        }
    }
}

fn fallback_segments(raw: &str, scanner: &MarkerScanner) -> Vec<VerseSegment> {
    scanner
        .scan(raw)
        .iter()
        .enumerate()
        .map(|(index, span)| {
            let body = span.body(raw);
            let dom = parse_html(body);
            let element = find_body(&dom);
            let number = normalize_verse_number(&span.number).unwrap_or_else(|| {
                let positional = (index + 1).to_string();
                warn!(
                    "Unparseable verse number {:?}, using position {}",
                    span.number, positional
                );
                positional
            });
            let mut segment = VerseSegment::new(number, element, dom.document.clone());
            segment.raw_markup = Some(body.to_string());
            segment
        })
        .collect()
}

/// Verse number from the configured attributes, else from the verse-number glyph
fn verse_number_of(element: &Handle, styles: &StyleTable) -> Option<String> {
    let from_attribute = styles
        .verse_number_attributes
        .iter()
        .filter_map(|attr| get_attr(element, attr))
        .find_map(|value| normalize_verse_number(&value));
    if from_attribute.is_some() {
        return from_attribute;
    }

    let tree = PrunedTree::new(element.clone());
    let mut glyph = None;
    tree.walk(element, &mut |node| {
        if glyph.is_some() || has_role(node, styles, |r| *r == Role::VerseBoundary) {
            return Walk::Skip;
        }
        if has_role(node, styles, |r| *r == Role::VerseNumber) {
            glyph = Some(node.clone());
            return Walk::Skip;
        }
        Walk::Descend
    });
    glyph.and_then(|g| normalize_verse_number(&tree.text(&g)))
}

/// Accept "7", "12a", "3-4"; reduce "GEN.1.7" and "1:7" to their verse part
pub(crate) fn normalize_verse_number(value: &str) -> Option<String> {
    let value = value.trim();
    let tail = value
        .rsplit(|c| c == '.' || c == ':')
        .next()
        .unwrap_or(value)
        .trim();
    if tail.starts_with(|c: char| c.is_ascii_digit()) {
        Some(tail.to_string())
    } else {
        None
    }
}
