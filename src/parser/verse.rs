//! Verse content extraction
//!
//! Structural markers are located and pruned from a per-verse view in a fixed
//! order; later steps only see what earlier steps left. The display text is
//! whatever remains once every marker is gone, so footnotes, headings, speaker
//! labels and verse numbers cannot leak into it.

use markup5ever_rcdom::Handle;
use tracing::trace;

use super::footnotes::extract_footnote;
use super::node_utils::{PrunedTree, Walk, has_role, is_element, roles, serialize_node, tag_name};
use super::segment::VerseSegment;
use crate::common::text_utils::{normalize_whitespace, strip_leading_verse_number};
use crate::models::{Footnote, PoetryLine, SpeakerLabel, UnifiedVerse};
use crate::styles::{Role, StyleTable};

fn is_boundary(role: &Role) -> bool {
    *role == Role::VerseBoundary
}

fn is_poetry(role: &Role) -> bool {
    role.poetry_level().is_some()
}

/// View of a verse element with any nested verse elements hidden
fn verse_view(element: &Handle, styles: &StyleTable) -> PrunedTree {
    let mut view = PrunedTree::new(element.clone());
    let nested = view.find_all(styles, is_boundary);
    view.prune_all(&nested);
    view
}

/// Whether the segment holds the chapter-number glyph
pub(crate) fn carries_chapter_number(segment: &VerseSegment, styles: &StyleTable) -> bool {
    let view = verse_view(&segment.element, styles);
    view.contains(&segment.element, styles, |r| *r == Role::ChapterNumber)
}

/// Extract one verse from its segment
///
/// `is_first_segment` marks the chapter's first verse when no chapter-number
/// glyph says otherwise.
pub(crate) fn extract_verse(
    segment: &VerseSegment,
    is_first_segment: bool,
    styles: &StyleTable,
    retain_raw_markup: bool,
) -> UnifiedVerse {
    let root = segment.element.clone();
    let mut view = verse_view(&root, styles);
    let mut verse = UnifiedVerse::new(segment.number.clone(), String::new());

    // Read before anything is pruned: the modifier may sit on any element
    verse.has_stanza_break_before = view.contains(&root, styles, |r| *r == Role::SpaceBefore);

    let opens_paragraph = segment.opens_paragraph
        || view
            .find_all(styles, |r| *r == Role::BodyParagraph)
            .iter()
            .any(|p| view.contains(p, styles, |r| *r == Role::VerseNumber));

    let chapter_marks = view.find_all(styles, |r| *r == Role::ChapterNumber);
    verse.is_first_verse_of_chapter = is_first_segment || !chapter_marks.is_empty();
    verse.starts_new_paragraph = opens_paragraph || verse.is_first_verse_of_chapter;
    view.prune_all(&chapter_marks);

    let headings = view.find_all(styles, |r| *r == Role::Heading);
    verse.heading = first_text(&view, &headings).or_else(|| segment.leading_heading.clone());
    view.prune_all(&headings);

    let (labels, line_elements) = scan_speakers_and_lines(&view, styles);
    let label_elements = view.find_all(styles, |r| *r == Role::SpeakerLabel);
    view.prune_all(&label_elements);

    let letters = view.find_all(styles, |r| *r == Role::AcrosticLetter);
    verse.acrostic_letter = first_text(&view, &letters);
    view.prune_all(&letters);

    verse.is_red_letter_span = view.contains(&root, styles, |r| *r == Role::RedLetter);

    verse.footnotes = extract_footnotes(&mut view, &segment.number, styles);

    let interludes = view.find_all(styles, |r| *r == Role::Interlude);
    verse.has_interlude_marker = !interludes.is_empty();
    view.prune_all(&interludes);
    let chapter_level = view.find_all(styles, |r| {
        matches!(r, Role::Title | Role::BookDivision)
    });
    view.prune_all(&chapter_level);
    let tables = view.find_tag("table");
    view.prune_all(&tables);

    let numbers = view.find_all(styles, |r| *r == Role::VerseNumber);
    view.prune_all(&numbers);

    let (lines, kept_before) = build_poetry_lines(&view, &line_elements, styles);
    verse.poetry_indent_level = lines.iter().map(|l| l.indent_level).max();
    verse.speaker_labels = labels
        .into_iter()
        .filter(|(text, _)| !text.is_empty())
        .map(|(text, raw_index)| SpeakerLabel {
            text,
            before_poetry_line_index: kept_before[raw_index],
        })
        .collect();
    verse.poetry_lines = lines;

    if verse.is_poetry() {
        let (before, after) = prose_around_poetry(&view, styles);
        verse.prose_before = before;
        verse.prose_after = after;
    }

    let text = view.root_text();
    verse.text = strip_leading_verse_number(&text, &segment.number).to_string();

    if retain_raw_markup {
        verse.raw_markup = segment
            .raw_markup
            .clone()
            .or_else(|| serialize_node(&segment.element));
    }

    trace!(
        verse = %verse.number,
        poetry_lines = verse.poetry_lines.len(),
        footnotes = verse.footnotes.len(),
        "Extracted verse"
    );

    verse
}

fn first_text(view: &PrunedTree, elements: &[Handle]) -> Option<String> {
    elements
        .iter()
        .map(|e| view.text(e))
        .find(|t| !t.is_empty())
}

/// One document-order pass pairing each speaker label with the number of
/// poetry lines seen before it
fn scan_speakers_and_lines(
    view: &PrunedTree,
    styles: &StyleTable,
) -> (Vec<(String, usize)>, Vec<(Handle, u8)>) {
    let mut labels = Vec::new();
    let mut lines: Vec<(Handle, u8)> = Vec::new();

    view.walk(view.root(), &mut |node| {
        let node_roles = roles(node, styles);
        if node_roles.contains(&Role::SpeakerLabel) {
            labels.push((view.text(node), lines.len()));
            return Walk::Skip;
        }
        if let Some(level) = node_roles.iter().find_map(Role::poetry_level) {
            // A label written inside a line still introduces that line
            for label in view.find_within(node, styles, |r| *r == Role::SpeakerLabel) {
                labels.push((view.text(&label), lines.len()));
            }
            lines.push((node.clone(), level));
            return Walk::Skip;
        }
        Walk::Descend
    });

    (labels, lines)
}

/// Footnotes in document order, each paired with the marker glyph before it
fn extract_footnotes(view: &mut PrunedTree, number: &str, styles: &StyleTable) -> Vec<Footnote> {
    let mut notes: Vec<(Handle, Option<String>)> = Vec::new();
    let mut markers = Vec::new();
    let mut pending_marker = None;

    view.walk(view.root(), &mut |node| {
        let node_roles = roles(node, styles);
        if node_roles.contains(&Role::FootnoteContent) {
            notes.push((node.clone(), pending_marker.take()));
            Walk::Skip
        } else if node_roles.contains(&Role::FootnoteMarker) {
            pending_marker = Some(view.text(node));
            markers.push(node.clone());
            Walk::Skip
        } else {
            Walk::Descend
        }
    });

    let mut footnotes = Vec::new();
    for (note, marker) in &notes {
        if let Some(footnote) =
            extract_footnote(note, marker.clone(), footnotes.len(), number, styles)
        {
            footnotes.push(footnote);
        }
    }

    for (note, _) in &notes {
        view.prune(note);
    }
    view.prune_all(&markers);

    footnotes
}

/// Poetry lines with visible text, plus for each raw line position the
/// number of kept lines before it
fn build_poetry_lines(
    view: &PrunedTree,
    line_elements: &[(Handle, u8)],
    styles: &StyleTable,
) -> (Vec<PoetryLine>, Vec<usize>) {
    let mut lines = Vec::new();
    let mut kept_before = Vec::with_capacity(line_elements.len() + 1);

    for (element, level) in line_elements {
        kept_before.push(lines.len());
        if view.is_pruned(element) {
            continue;
        }
        let text = view.text(element);
        if text.is_empty() {
            continue;
        }
        lines.push(PoetryLine {
            text,
            indent_level: *level,
            has_stanza_break_before: has_role(element, styles, |r| *r == Role::SpaceBefore),
            is_red_letter_span: view.contains(element, styles, |r| *r == Role::RedLetter),
        });
    }
    kept_before.push(lines.len());

    (lines, kept_before)
}

fn is_paragraph(node: &Handle, styles: &StyleTable) -> bool {
    tag_name(node) == Some("p") || has_role(node, styles, |r| *r == Role::BodyParagraph)
}

/// Prose paragraphs before the first and after the last poetry element
fn prose_around_poetry(view: &PrunedTree, styles: &StyleTable) -> (Option<String>, Option<String>) {
    let children = view.children(view.root());
    let poetry_positions: Vec<usize> = children
        .iter()
        .enumerate()
        .filter(|(_, child)| is_element(child) && view.contains(child, styles, is_poetry))
        .map(|(i, _)| i)
        .collect();
    let (Some(&first), Some(&last)) = (poetry_positions.first(), poetry_positions.last()) else {
        return (None, None);
    };

    let mut paragraphs = Vec::new();
    let mut bare = String::new();
    for child in &children[..first] {
        if is_paragraph(child, styles) {
            let text = view.text(child);
            // An unstyled or empty paragraph opens the poetry section
            if text.is_empty() || !has_role(child, styles, |r| *r == Role::BodyParagraph) {
                break;
            }
            paragraphs.push(text);
        } else {
            bare.push_str(&view.raw_text(child));
        }
    }
    let before = if paragraphs.is_empty() {
        Some(normalize_whitespace(&bare)).filter(|t| !t.is_empty())
    } else {
        Some(paragraphs.join(" "))
    };

    let after: Vec<String> = children[last + 1..]
        .iter()
        .filter(|child| has_role(child, styles, |r| *r == Role::BodyParagraph))
        .map(|child| view.text(child))
        .filter(|t| !t.is_empty())
        .collect();
    let after = if after.is_empty() {
        None
    } else {
        Some(after.join(" "))
    };

    (before, after)
}
