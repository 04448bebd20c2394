use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which extraction path produced a chapter
///
/// Anything other than `Structural` is a degraded result: `Fallback` lost the
/// document tree and re-parsed each verse on its own, `Flat` and `VerseList`
/// carry verse text only (no poetry, speaker labels or typed footnotes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParseMode {
    Structural,
    Fallback,
    Flat,
    VerseList,
}

impl ParseMode {
    /// Whether the result carries full structural fidelity
    pub fn is_structural(&self) -> bool {
        matches!(self, ParseMode::Structural)
    }
}

/// A fully parsed chapter, the contract handed to rendering code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedChapter {
    /// Human-readable reference (e.g., "Psalm 23")
    pub reference: String,
    /// Source text edition
    pub translation_id: String,
    /// Book name derived from the reference (e.g., "1 Corinthians")
    pub book_name: String,
    /// Chapter number derived from the reference
    pub chapter_number: u32,
    /// Verses in canonical order, never empty
    pub verses: Vec<UnifiedVerse>,
    /// Psalm superscription, interludes, acrostics, book divisions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_metadata: Option<PsalmMetadata>,
    /// Tables anchored after verses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<BibleTable>,
    /// Extraction path that produced this document
    pub parse_mode: ParseMode,
}

impl UnifiedChapter {
    /// Look up a verse by its source number
    pub fn verse(&self, number: &str) -> Option<&UnifiedVerse> {
        self.verses.iter().find(|v| v.number == number)
    }

    /// Number of verses in the chapter
    pub fn verse_count(&self) -> usize {
        self.verses.len()
    }

    /// Whether any verse is laid out as poetry
    pub fn is_poetry(&self) -> bool {
        self.verses.iter().any(UnifiedVerse::is_poetry)
    }

    /// All verse text joined with single spaces
    pub fn full_text(&self) -> String {
        self.verses
            .iter()
            .map(|v| v.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Serialize to the camelCase JSON shape consumed by renderers
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One verse with its display text and structural annotations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedVerse {
    /// Verse number as it appears in source ("1", "12a", "3-4")
    pub number: String,
    /// Plain display text, free of markup, footnotes and inline numbers
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default)]
    pub is_red_letter_span: bool,
    #[serde(default)]
    pub is_first_verse_of_chapter: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub poetry_lines: Vec<PoetryLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poetry_indent_level: Option<u8>,
    #[serde(default)]
    pub has_stanza_break_before: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub speaker_labels: Vec<SpeakerLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acrostic_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub footnotes: Vec<Footnote>,
    #[serde(default)]
    pub has_interlude_marker: bool,
    #[serde(default)]
    pub starts_new_paragraph: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prose_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prose_after: Option<String>,
    /// Source markup, for diagnostics only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_markup: Option<String>,
}

impl UnifiedVerse {
    /// Create a verse with text only
    pub fn new(number: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Whether the verse should be rendered as indented poetry lines
    pub fn is_poetry(&self) -> bool {
        !self.poetry_lines.is_empty()
    }
}

/// One indented line of verse-form content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoetryLine {
    pub text: String,
    /// Indent level, 1 to 3
    pub indent_level: u8,
    pub has_stanza_break_before: bool,
    pub is_red_letter_span: bool,
}

/// Speaker attribution placed before a poetry line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerLabel {
    pub text: String,
    /// Zero-based index into the verse's `poetry_lines`
    pub before_poetry_line_index: usize,
}

/// Footnote extracted out of verse text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footnote {
    /// Marker glyph shown in the text ("a", "b", "*")
    pub marker: String,
    /// Reference label the note attaches to (e.g., "1:1")
    pub reference: String,
    pub content: String,
    #[serde(rename = "type")]
    pub footnote_type: FootnoteType,
}

/// Footnote classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FootnoteType {
    Hebrew,
    Greek,
    Alternative,
    TextualVariant,
    #[serde(rename = "cross-reference")]
    CrossReference,
    Other,
}

/// Chapter-level metadata carried by Psalms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsalmMetadata {
    /// Psalm number within the Psalter
    pub composition_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superscription: Option<String>,
    pub has_interlude: bool,
    /// Verse numbers followed by an interlude marker
    #[serde(default)]
    pub interlude_positions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acrostic_letters: Vec<AcrosticLetter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition_type: Option<CompositionType>,
    /// Book division label such as "BOOK II"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_division: Option<String>,
}

/// Acrostic stanza letter found between verses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcrosticLetter {
    pub letter: String,
    /// `None` when the letter precedes the first verse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_verse: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompositionType {
    Acrostic,
}

/// Tabular content (census lists, genealogies)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibleTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_verse: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub cells: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse_number: Option<String>,
}
