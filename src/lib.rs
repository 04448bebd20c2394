#![deny(
    clippy::panic,
    clippy::absolute_paths,
    clippy::print_stderr,
    clippy::print_stdout
)]

//! # Bible Text Parser
//!
//! Converts per-provider Bible chapter markup into one unified chapter document.
//!
//! Providers deliver chapters as irregular HTML: verse numbers glued to text,
//! footnotes interleaved with content, poetry and paragraph structure signalled
//! only by class names. This crate turns that markup into a [`UnifiedChapter`]
//! holding verses, headings, poetry lines, speaker labels, typed footnotes,
//! tables and Psalm metadata, with every structural marker removed from the
//! display text.
//!
//! Parsing is pure and synchronous: no network, no files, no shared mutable
//! state. A [`ChapterParser`] can be shared freely across threads.
//!
//! ## Quick Start
//!
//! ```
//! use bible_text_parser::parse_chapter;
//!
//! let markup = r#"
//!     <span class="verse" data-verse="1"><span class="chapternum">23 </span>
//!       <p class="q1"><span class="versenum">1</span>The LORD is my shepherd;</p>
//!       <p class="q2">I shall not want.</p>
//!     </span>
//! "#;
//!
//! let chapter = parse_chapter(markup, "Psalm 23").unwrap();
//! assert_eq!(chapter.book_name, "Psalm");
//! assert_eq!(chapter.verses[0].text, "The LORD is my shepherd; I shall not want.");
//! assert_eq!(chapter.verses[0].poetry_lines.len(), 2);
//! ```

pub mod common;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod styles;

// Re-export main types for convenience
pub use common::ChapterReference;
pub use config::ParserConfig;
pub use error::{ParseError, Result};
pub use models::{
    AcrosticLetter, BibleTable, CompositionType, Footnote, FootnoteType, ParseMode, PoetryLine,
    PsalmMetadata, SpeakerLabel, TableRow, UnifiedChapter, UnifiedVerse,
};
pub use parser::{
    ChapterParser, classify_footnote, parse_chapter, parse_flat_text, parse_verse_list_json,
    repair,
};
pub use styles::{Role, StyleRule, StyleTable};
