//! Raw-markup scanning for verse-boundary elements
//!
//! Both the paragraph repair pass and the fallback segmenter need to find
//! verse boundaries without a tree: the repair pass runs before the tree is
//! built, and the fallback segmenter runs because the tree did not show them.
//!
//! Some sources mark verses with milestones instead of wrappers: an element
//! holding only the number glyph, with the verse text following it. Such a
//! marker's body runs from after its closing tag to the next marker.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};
use tracing::trace;

use crate::error::{ParseError, Result};
use crate::styles::StyleTable;

static STANDARD_START: OnceLock<Regex> = OnceLock::new();
static TAG: OnceLock<Regex> = OnceLock::new();

/// Verse-boundary element located in raw markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawVerseSpan {
    /// Verse-number attribute value as written
    pub number: String,
    /// Lowercased tag name of the boundary element
    pub tag: String,
    /// Byte offset of the opening `<`
    pub start: usize,
    /// Byte offset just after the opening tag
    pub body_start: usize,
    /// Byte offset of the matching closing tag, or of the next boundary when unclosed
    pub body_end: usize,
    /// Whether a matching closing tag was found
    pub closed: bool,
    /// The element held only its number glyph; the body is the text after it
    pub milestone: bool,
}

impl RawVerseSpan {
    pub(crate) fn body<'a>(&self, raw: &'a str) -> &'a str {
        &raw[self.body_start..self.body_end]
    }
}

/// Compiled matcher for opening tags that carry a verse-number attribute
#[derive(Debug, Clone)]
pub(crate) struct MarkerScanner {
    start: Regex,
}

fn start_pattern<S: AsRef<str>>(attributes: &[S]) -> String {
    let names = attributes
        .iter()
        .map(|a| a.as_ref().trim())
        .filter(|a| !a.is_empty())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");
    format!(
        r#"<([a-z][a-z0-9-]*)\b[^>]*?\s(?:{names})\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+))[^>]*>"#
    )
}

impl MarkerScanner {
    /// Scanner for the standard verse-number attributes
    pub(crate) fn standard() -> Self {
        let start = STANDARD_START.get_or_init(|| {
            let attributes = StyleTable::standard().verse_number_attributes;
            RegexBuilder::new(&start_pattern(&attributes))
                .case_insensitive(true)
                .build()
                .expect("Failed to compile verse marker regex")
        });
        Self {
            start: start.clone(),
        }
    }

    /// Scanner for a provider-specific attribute list
    pub(crate) fn new<S: AsRef<str>>(attributes: &[S]) -> Result<Self> {
        let start = RegexBuilder::new(&start_pattern(attributes))
            .case_insensitive(true)
            .build()
            .map_err(|e| ParseError::InvalidStyleTable(format!("verse-number attributes: {e}")))?;
        Ok(Self { start })
    }

    /// Locate verse-boundary elements in source order
    ///
    /// A boundary nested inside an earlier closed boundary (an inner
    /// verse-number glyph carrying the same attribute, say) is not reported.
    /// A closed boundary whose visible text is empty or only its number is
    /// reported as a milestone.
    pub(crate) fn scan(&self, raw: &str) -> Vec<RawVerseSpan> {
        let starts: Vec<(usize, usize, String, String)> = self
            .start
            .captures_iter(raw)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let tag = caps.get(1)?.as_str().to_ascii_lowercase();
                let number = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .or_else(|| caps.get(4))
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();
                Some((whole.start(), whole.end(), tag, number))
            })
            .collect();

        let lower = raw.to_ascii_lowercase();
        let mut spans: Vec<RawVerseSpan> = Vec::with_capacity(starts.len());
        let mut covered_until = 0;

        for (i, (start, body_start, tag, number)) in starts.iter().enumerate() {
            if *start < covered_until {
                continue;
            }
            let (mut body_start, mut body_end, closed) =
                match find_closer(&lower[*body_start..], tag) {
                    Some(offset) => (*body_start, body_start + offset, true),
                    None => (*body_start, starts.get(i + 1).map_or(raw.len(), |s| s.0), false),
                };
            if closed {
                covered_until = body_end;
            }

            let milestone = closed && is_glyph_only(&raw[body_start..body_end], number);
            if milestone {
                let after_closer = raw[body_end..]
                    .find('>')
                    .map_or(raw.len(), |offset| body_end + offset + 1);
                let next = starts[i + 1..]
                    .iter()
                    .find(|s| s.0 >= after_closer)
                    .map_or(raw.len(), |s| s.0);
                body_start = after_closer;
                body_end = trim_trailing_open_tags(raw, after_closer, next);
            }

            trace!(number = %number, tag = %tag, closed, milestone, "verse marker");
            spans.push(RawVerseSpan {
                number: number.clone(),
                tag: tag.clone(),
                start: *start,
                body_start,
                body_end,
                closed,
                milestone,
            });
        }

        spans
    }
}

/// Whether an element body shows nothing but the verse-number glyph
fn is_glyph_only(body: &str, number: &str) -> bool {
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("Failed to compile tag regex"));
    let visible = tag.replace_all(body, "");
    let visible = visible.trim();
    visible.is_empty() || visible == number || visible.chars().all(|c| c.is_ascii_digit())
}

/// Pull `end` back over opening tags that belong to the next verse's block
fn trim_trailing_open_tags(raw: &str, start: usize, mut end: usize) -> usize {
    loop {
        let body = raw[start..end].trim_end();
        if !body.ends_with('>') {
            return start + body.len();
        }
        let Some(open) = body.rfind('<') else {
            return start + body.len();
        };
        if body[open..].starts_with("</") {
            return start + body.len();
        }
        end = start + open;
    }
}

/// Byte offset of the closing tag balancing an already-open `tag`
fn find_closer(lower: &str, tag: &str) -> Option<usize> {
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let mut depth = 1usize;
    let mut pos = 0;

    while pos < lower.len() {
        let rest = &lower[pos..];
        let next_close = find_tag(rest, &close)?;
        match find_tag(rest, &open) {
            Some(next_open) if next_open < next_close => {
                depth += 1;
                pos += next_open + open.len();
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos + next_close);
                }
                pos += next_close + close.len();
            }
        }
    }
    None
}

/// Find `needle` (`<tag` or `</tag`) only where the tag name ends there
pub(crate) fn find_tag(haystack: &str, needle: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(found) = haystack[from..].find(needle) {
        let at = from + found;
        let after = haystack[at + needle.len()..].chars().next();
        match after {
            Some(c) if c.is_ascii_alphanumeric() || c == '-' => from = at + needle.len(),
            _ => return Some(at),
        }
    }
    None
}
