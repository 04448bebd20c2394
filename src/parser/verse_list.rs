//! JSON verse-list payloads
//!
//! Verse-list providers answer with plain JSON instead of markup:
//!
//! ```json
//! {
//!   "reference": "John 3",
//!   "verses": [
//!     {"book_name": "John", "chapter": 3, "verse": 1, "text": "Now there was a man..."}
//!   ],
//!   "translation_id": "web"
//! }
//! ```

use serde::Deserialize;
use tracing::debug;

use crate::common::text_utils::normalize_whitespace;
use crate::error::Result;
use crate::models::UnifiedVerse;

#[derive(Debug, Deserialize)]
pub(crate) struct VerseListPayload {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub verses: Vec<VerseEntry>,
    #[serde(default)]
    pub translation_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerseEntry {
    #[serde(default)]
    pub book_name: Option<String>,
    #[serde(default)]
    pub chapter: Option<u32>,
    pub verse: VerseNumber,
    #[serde(default)]
    pub text: String,
}

/// Providers send verse numbers as numbers or strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum VerseNumber {
    Number(u32),
    Text(String),
}

impl VerseNumber {
    fn into_string(self) -> String {
        match self {
            VerseNumber::Number(n) => n.to_string(),
            VerseNumber::Text(s) => s.trim().to_string(),
        }
    }
}

impl VerseListPayload {
    pub(crate) fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Chapter reference: the payload's own without any verse part, else
    /// built from the first verse's book and chapter
    pub(crate) fn chapter_reference(&self) -> String {
        let from_payload = self
            .reference
            .as_deref()
            .map(|r| r.split(':').next().unwrap_or(r).trim())
            .filter(|r| !r.is_empty());
        if let Some(reference) = from_payload {
            return reference.to_string();
        }

        self.verses
            .first()
            .and_then(|v| {
                let book = v.book_name.as_deref()?.trim();
                Some(match v.chapter {
                    Some(chapter) => format!("{book} {chapter}"),
                    None => book.to_string(),
                })
            })
            .unwrap_or_default()
    }

    /// Verses with non-empty text, whitespace-normalized
    pub(crate) fn into_verses(self) -> Vec<UnifiedVerse> {
        let mut verses: Vec<UnifiedVerse> = self
            .verses
            .into_iter()
            .filter_map(|entry| {
                let text = normalize_whitespace(&entry.text);
                (!text.is_empty()).then(|| UnifiedVerse::new(entry.verse.into_string(), text))
            })
            .collect();

        if let Some(first) = verses.first_mut() {
            if first.number == "1" {
                first.is_first_verse_of_chapter = true;
                first.starts_new_paragraph = true;
            }
        }
        debug!("Verse list payload holds {} verse(s)", verses.len());
        verses
    }
}

/// Cheap check for a JSON object payload
pub(crate) fn looks_like_json(raw: &str) -> bool {
    raw.trim_start().starts_with('{')
}
