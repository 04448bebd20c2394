//! Chapter reference parsing
//!
//! A chapter reference is an optional leading numeral, a book name, a single
//! space and a chapter number: `"John 3"`, `"Psalm 23"`, `"1 Corinthians 13"`.
//! Single-chapter books may omit the number (`"Jude"`), which means chapter 1.

use crate::error::{ParseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A parsed chapter reference
///
/// # Examples
///
/// ```
/// use bible_text_parser::ChapterReference;
///
/// let reference = ChapterReference::parse("1 Corinthians 13").unwrap();
/// assert_eq!(reference.book_name(), "1 Corinthians");
/// assert_eq!(reference.chapter(), 13);
///
/// let jude = ChapterReference::parse("Jude").unwrap();
/// assert_eq!(jude.chapter(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChapterReference {
    raw: String,
    book_name: String,
    chapter: u32,
}

impl ChapterReference {
    /// Parse a reference string
    ///
    /// The input is trimmed. The book name is the reference with a trailing
    /// `<space><digits>` removed; the chapter is the trailing digit run,
    /// defaulting to 1.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidReference` if the string is empty after
    /// trimming.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::InvalidReference {
                reference: s.to_string(),
            });
        }

        let without_digits = trimmed.trim_end_matches(|c: char| c.is_ascii_digit());
        let digits = &trimmed[without_digits.len()..];

        let chapter = if digits.is_empty() {
            1
        } else {
            digits.parse::<u32>().unwrap_or(1)
        };

        let book_name = if !digits.is_empty() && without_digits.ends_with(' ') {
            without_digits.trim_end().to_string()
        } else {
            trimmed.to_string()
        };

        Ok(Self {
            raw: trimmed.to_string(),
            book_name,
            chapter,
        })
    }

    /// The reference as given (trimmed)
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn book_name(&self) -> &str {
        &self.book_name
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    /// Whether the book is one of the given Psalm designations (case-insensitive)
    pub fn is_psalm<S: AsRef<str>>(&self, designations: &[S]) -> bool {
        designations
            .iter()
            .any(|d| d.as_ref().eq_ignore_ascii_case(&self.book_name))
    }
}

impl fmt::Display for ChapterReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for ChapterReference {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
