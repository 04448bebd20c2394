//! Chapter parsing pipeline
//!
//! `repair → tree → segment → extract verses → chapter metadata → assemble`,
//! one module per stage. [`ChapterParser`] coordinates the stages; the free
//! functions use a shared default parser.

use std::borrow::Cow;
use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::common::ChapterReference;
use crate::config::ParserConfig;
use crate::error::{ParseError, Result};
use crate::models::{ParseMode, UnifiedChapter};

mod assemble;
mod flat;
mod footnotes;
mod markers;
mod metadata;
pub(crate) mod node_utils;
mod preprocessing;
mod segment;
mod table;
mod verse;
mod verse_list;

pub use footnotes::classify_footnote;
pub use preprocessing::repair;

use assemble::assemble;
use markers::MarkerScanner;
use metadata::{DocumentMetadata, extract_metadata};
use segment::{Segmentation, segment};
use verse::{carries_chapter_number, extract_verse};
use verse_list::{VerseListPayload, looks_like_json};

/// Parser for one provider vocabulary
///
/// Holds only immutable configuration, so one instance can serve any number
/// of threads.
///
/// # Example
///
/// ```
/// use bible_text_parser::{ChapterParser, ParserConfig, ParseMode};
///
/// let parser = ChapterParser::with_config(ParserConfig::new().with_translation_id("KJV")).unwrap();
/// let chapter = parser
///     .parse(
///         r#"<p class="p"><span class="verse" data-verse="16">For God so loved the world</span></p>"#,
///         "John 3",
///     )
///     .unwrap();
///
/// assert_eq!(chapter.translation_id, "KJV");
/// assert_eq!(chapter.parse_mode, ParseMode::Structural);
/// assert_eq!(chapter.verses[0].number, "16");
/// ```
#[derive(Debug, Clone)]
pub struct ChapterParser {
    config: ParserConfig,
    scanner: MarkerScanner,
}

impl Default for ChapterParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ChapterParser {
    /// Parser with the standard vocabulary
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
            scanner: MarkerScanner::standard(),
        }
    }

    /// Parser for a custom configuration
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidStyleTable` if the style table fails validation.
    pub fn with_config(config: ParserConfig) -> Result<Self> {
        config.style_table.validate()?;
        let scanner = MarkerScanner::new(&config.style_table.verse_number_attributes)?;
        Ok(Self { config, scanner })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse provider markup for one chapter
    ///
    /// Uses verse-boundary elements when the tree has them and falls back to
    /// raw-markup verse markers otherwise; `parse_mode` tells which.
    ///
    /// # Errors
    ///
    /// * `ParseError::InvalidReference` if `reference` is blank
    /// * `ParseError::NoContent` if neither path finds a verse
    pub fn parse(&self, raw: &str, reference: &str) -> Result<UnifiedChapter> {
        let reference = ChapterReference::parse(reference)?;
        let styles = &self.config.style_table;

        let markup = if self.config.repair_markup {
            preprocessing::repair_with(raw, &self.scanner)
        } else {
            Cow::Borrowed(raw)
        };
        let dom = node_utils::parse_html(&markup);

        let segmentation = segment(&dom, &markup, styles, &self.scanner);
        if segmentation.is_empty() {
            debug!("No verse segments in {} bytes of markup", raw.len());
            return Err(ParseError::NoContent {
                reference: reference.to_string(),
            });
        }
        if let Segmentation::Fallback(segments) = &segmentation {
            warn!(
                reference = %reference,
                verses = segments.len(),
                "No verse elements in the document tree, using raw-markup fallback"
            );
        }

        let segments = segmentation.segments();
        // A chapter-number glyph on a later verse outranks position
        let first_marked_elsewhere = segments
            .iter()
            .skip(1)
            .any(|s| carries_chapter_number(s, styles));
        let verses = segments
            .iter()
            .enumerate()
            .map(|(i, s)| {
                extract_verse(
                    s,
                    i == 0 && !first_marked_elsewhere,
                    styles,
                    self.config.retain_raw_markup,
                )
            })
            .collect();

        let metadata = extract_metadata(&dom.document, segments, styles);

        Ok(assemble(
            verses,
            metadata,
            &reference,
            &self.config,
            segmentation.mode(),
        ))
    }

    /// Parse running text with verse numbers glued to verse starts
    ///
    /// The result has verse numbers and text only.
    ///
    /// # Errors
    ///
    /// * `ParseError::InvalidReference` if `reference` is blank
    /// * `ParseError::NoContent` if no verse number is recognized
    pub fn parse_flat(&self, raw: &str, reference: &str) -> Result<UnifiedChapter> {
        let reference = ChapterReference::parse(reference)?;
        let verses = flat::flat_verses(raw);
        if verses.is_empty() {
            return Err(ParseError::NoContent {
                reference: reference.to_string(),
            });
        }
        Ok(assemble(
            verses,
            DocumentMetadata::default(),
            &reference,
            &self.config,
            ParseMode::Flat,
        ))
    }

    /// Parse a JSON verse-list payload
    ///
    /// The payload's `translation_id` wins over the configured one.
    ///
    /// # Errors
    ///
    /// * `ParseError::JsonError` if the payload does not deserialize
    /// * `ParseError::InvalidReference` if no chapter reference can be derived
    /// * `ParseError::NoContent` if no verse has text
    pub fn parse_verse_list_json(&self, json: &str) -> Result<UnifiedChapter> {
        let payload = VerseListPayload::from_json(json)?;
        let reference = ChapterReference::parse(&payload.chapter_reference())?;
        let translation_id = payload
            .translation_id
            .clone()
            .filter(|t| !t.trim().is_empty());

        let verses = payload.into_verses();
        if verses.is_empty() {
            return Err(ParseError::NoContent {
                reference: reference.to_string(),
            });
        }

        let mut chapter = assemble(
            verses,
            DocumentMetadata::default(),
            &reference,
            &self.config,
            ParseMode::VerseList,
        );
        if let Some(translation_id) = translation_id {
            chapter.translation_id = translation_id;
        }
        Ok(chapter)
    }

    /// Parse whatever a provider returned
    ///
    /// JSON payloads go to [`parse_verse_list_json`](Self::parse_verse_list_json);
    /// markup goes to [`parse`](Self::parse), retried as flat text when no
    /// verse element or marker is found.
    pub fn parse_any(&self, raw: &str, reference: &str) -> Result<UnifiedChapter> {
        if looks_like_json(raw) {
            return self.parse_verse_list_json(raw);
        }
        match self.parse(raw, reference) {
            Err(e) if e.is_no_content() => {
                warn!(
                    reference = reference,
                    "No verse markup found, reading as flat inline-number text"
                );
                self.parse_flat(raw, reference)
            }
            result => result,
        }
    }
}

fn default_parser() -> &'static ChapterParser {
    static DEFAULT_PARSER: OnceLock<ChapterParser> = OnceLock::new();
    DEFAULT_PARSER.get_or_init(ChapterParser::new)
}

/// Parse provider markup with the standard vocabulary
///
/// See [`ChapterParser::parse`].
pub fn parse_chapter(raw: &str, reference: &str) -> Result<UnifiedChapter> {
    default_parser().parse(raw, reference)
}

/// Parse flat inline-number text with the standard configuration
///
/// ```
/// use bible_text_parser::{ParseMode, parse_flat_text};
///
/// let chapter = parse_flat_text("1In the beginning was the Word. 2The same was in the beginning with God.", "John 1").unwrap();
/// assert_eq!(chapter.parse_mode, ParseMode::Flat);
/// assert_eq!(chapter.verses[1].text, "The same was in the beginning with God.");
/// ```
pub fn parse_flat_text(raw: &str, reference: &str) -> Result<UnifiedChapter> {
    default_parser().parse_flat(raw, reference)
}

/// Parse a JSON verse-list payload with the standard configuration
pub fn parse_verse_list_json(json: &str) -> Result<UnifiedChapter> {
    default_parser().parse_verse_list_json(json)
}
