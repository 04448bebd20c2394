//! Declarative class-name → semantic-role table
//!
//! Provider editions signal structure only through class names, and each
//! edition uses its own vocabulary. The extractor never branches on a class
//! name directly; it asks the [`StyleTable`] which [`Role`]s an element plays.
//! Supporting a new provider vocabulary means adding rules, not code.

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};

/// Semantic role an element plays in a chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Wraps the whole content of one verse
    VerseBoundary,
    /// Inline verse-number glyph
    VerseNumber,
    /// Large chapter-number glyph at the start of a chapter
    ChapterNumber,
    /// Section heading
    Heading,
    /// Directly quoted speech
    RedLetter,
    /// Poetry line with indent level 1 to 3
    PoetryLine { level: u8 },
    /// Modifier: visual gap before this element
    SpaceBefore,
    SpeakerLabel,
    AcrosticLetter,
    /// Footnote body
    FootnoteContent,
    /// Footnote glyph placed in the running text
    FootnoteMarker,
    /// Reference label inside a footnote body
    FootnoteReference,
    /// Psalm superscription
    Title,
    /// Psalter book division ("BOOK II")
    BookDivision,
    /// Liturgical pause ("Selah")
    Interlude,
    /// Prose paragraph
    BodyParagraph,
    /// Table header cell
    TableHeader,
}

impl Role {
    /// Indent level when this is a poetry-line role
    pub fn poetry_level(&self) -> Option<u8> {
        match self {
            Role::PoetryLine { level } => Some(*level),
            _ => None,
        }
    }
}

/// One class pattern mapped to a role
///
/// A pattern is an exact class name, or a prefix when it ends with `*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRule {
    pub pattern: String,
    pub role: Role,
}

impl StyleRule {
    pub fn new(pattern: impl Into<String>, role: Role) -> Self {
        Self {
            pattern: pattern.into(),
            role,
        }
    }

    pub fn matches(&self, class: &str) -> bool {
        match self.pattern.strip_suffix('*') {
            Some(prefix) => class.starts_with(prefix),
            None => self.pattern == class,
        }
    }
}

/// Provider vocabulary: class rules plus verse-number attribute names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleTable {
    pub rules: Vec<StyleRule>,
    /// Attributes that carry a verse number, checked in order
    pub verse_number_attributes: Vec<String>,
}

const STANDARD_RULES: &[(&str, Role)] = &[
    ("verse", Role::VerseBoundary),
    ("versenum", Role::VerseNumber),
    ("verse-num", Role::VerseNumber),
    ("v", Role::VerseNumber),
    ("chapternum", Role::ChapterNumber),
    ("chapter-num", Role::ChapterNumber),
    ("c", Role::ChapterNumber),
    ("heading", Role::Heading),
    ("section-heading", Role::Heading),
    ("s", Role::Heading),
    ("s1", Role::Heading),
    ("s2", Role::Heading),
    ("s3", Role::Heading),
    ("woj", Role::RedLetter),
    ("wj", Role::RedLetter),
    ("red-letter", Role::RedLetter),
    ("q", Role::PoetryLine { level: 1 }),
    ("q1", Role::PoetryLine { level: 1 }),
    ("indent-1", Role::PoetryLine { level: 1 }),
    ("line-1", Role::PoetryLine { level: 1 }),
    ("q2", Role::PoetryLine { level: 2 }),
    ("indent-2", Role::PoetryLine { level: 2 }),
    ("line-2", Role::PoetryLine { level: 2 }),
    ("q3", Role::PoetryLine { level: 3 }),
    ("indent-3", Role::PoetryLine { level: 3 }),
    ("line-3", Role::PoetryLine { level: 3 }),
    ("sb", Role::SpaceBefore),
    ("space-before", Role::SpaceBefore),
    ("stanza-break", Role::SpaceBefore),
    ("speaker", Role::SpeakerLabel),
    ("sp", Role::SpeakerLabel),
    ("acrostic", Role::AcrosticLetter),
    ("hebrew-letter", Role::AcrosticLetter),
    ("qa", Role::AcrosticLetter),
    ("footnote", Role::FootnoteContent),
    ("note", Role::FootnoteContent),
    ("f", Role::FootnoteContent),
    ("footnote-marker", Role::FootnoteMarker),
    ("fm", Role::FootnoteMarker),
    ("caller", Role::FootnoteMarker),
    ("footnote-ref", Role::FootnoteReference),
    ("fr", Role::FootnoteReference),
    ("psalm-title", Role::Title),
    ("superscription", Role::Title),
    ("d", Role::Title),
    ("psalm-book", Role::BookDivision),
    ("book-division", Role::BookDivision),
    ("ms", Role::BookDivision),
    ("ms1", Role::BookDivision),
    ("selah", Role::Interlude),
    ("interlude", Role::Interlude),
    ("qs", Role::Interlude),
    ("p", Role::BodyParagraph),
    ("m", Role::BodyParagraph),
    ("pi", Role::BodyParagraph),
    ("pmo", Role::BodyParagraph),
    ("body-text", Role::BodyParagraph),
    ("prose", Role::BodyParagraph),
    ("table-header", Role::TableHeader),
    ("th", Role::TableHeader),
];

const STANDARD_VERSE_ATTRIBUTES: &[&str] = &["data-verse", "data-number", "data-v"];

impl Default for StyleTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl StyleTable {
    /// Vocabulary shared by the gateway-style and USFM-style providers
    pub fn standard() -> Self {
        Self {
            rules: STANDARD_RULES
                .iter()
                .map(|(pattern, role)| StyleRule::new(*pattern, *role))
                .collect(),
            verse_number_attributes: STANDARD_VERSE_ATTRIBUTES
                .iter()
                .map(|a| a.to_string())
                .collect(),
        }
    }

    /// Load a provider table from JSON
    ///
    /// ```
    /// use bible_text_parser::{Role, StyleTable};
    ///
    /// let table = StyleTable::from_json(r#"{
    ///     "rules": [
    ///         {"pattern": "vs", "role": "verseBoundary"},
    ///         {"pattern": "poem-*", "role": {"poetryLine": {"level": 2}}}
    ///     ],
    ///     "verseNumberAttributes": ["data-vs"]
    /// }"#).unwrap();
    ///
    /// assert_eq!(table.roles_for(["poem-x"]), vec![Role::PoetryLine { level: 2 }]);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let table: StyleTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Check that every rule and attribute is usable
    pub fn validate(&self) -> Result<()> {
        if let Some(rule) = self
            .rules
            .iter()
            .find(|r| r.pattern.trim_end_matches('*').trim().is_empty())
        {
            return Err(ParseError::InvalidStyleTable(format!(
                "empty class pattern for role {:?}",
                rule.role
            )));
        }
        if let Some(rule) = self.rules.iter().find(|r| {
            r.role
                .poetry_level()
                .is_some_and(|level| !(1..=3).contains(&level))
        }) {
            return Err(ParseError::InvalidStyleTable(format!(
                "poetry level out of range in pattern {:?}",
                rule.pattern
            )));
        }
        if self
            .verse_number_attributes
            .iter()
            .all(|a| a.trim().is_empty())
        {
            return Err(ParseError::InvalidStyleTable(
                "no verse-number attributes".to_string(),
            ));
        }
        Ok(())
    }

    /// Add a rule; later rules extend, never shadow, earlier ones
    pub fn with_rule(mut self, pattern: impl Into<String>, role: Role) -> Self {
        self.rules.push(StyleRule::new(pattern, role));
        self
    }

    /// Add a verse-number attribute name
    pub fn with_verse_number_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.verse_number_attributes.push(attribute.into());
        self
    }

    /// All roles played by an element with the given classes, deduplicated
    pub fn roles_for<'c, I>(&self, classes: I) -> Vec<Role>
    where
        I: IntoIterator<Item = &'c str>,
    {
        let mut roles = Vec::new();
        for class in classes {
            for rule in self.rules.iter().filter(|r| r.matches(class)) {
                if !roles.contains(&rule.role) {
                    roles.push(rule.role);
                }
            }
        }
        roles
    }
}
