//! Parser configuration

use crate::styles::StyleTable;

const DEFAULT_PSALM_BOOK_NAMES: &[&str] = &["Psalm", "Psalms", "Ps", "Psa", "Pss"];

/// Configuration options for chapter parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Identifier of the source text edition, copied into every chapter
    pub translation_id: String,
    /// Class-name vocabulary of the provider
    pub style_table: StyleTable,
    /// Balance unclosed paragraph tags before building the tree
    pub repair_markup: bool,
    /// Keep each verse's source markup in `UnifiedVerse::raw_markup`
    pub retain_raw_markup: bool,
    /// Book names (case-insensitive) whose chapters carry Psalm metadata
    pub psalm_book_names: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            translation_id: "unknown".to_string(),
            style_table: StyleTable::standard(),
            repair_markup: true,
            retain_raw_markup: false,
            psalm_book_names: DEFAULT_PSALM_BOOK_NAMES
                .iter()
                .map(|n| n.to_string())
                .collect(),
        }
    }
}

impl ParserConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the translation identifier
    pub fn with_translation_id(mut self, translation_id: impl Into<String>) -> Self {
        self.translation_id = translation_id.into();
        self
    }

    /// Replace the provider vocabulary
    pub fn with_style_table(mut self, style_table: StyleTable) -> Self {
        self.style_table = style_table;
        self
    }

    /// Set whether to repair unbalanced paragraph tags
    pub fn with_repair_markup(mut self, repair: bool) -> Self {
        self.repair_markup = repair;
        self
    }

    /// Set whether to keep per-verse source markup
    pub fn with_retain_raw_markup(mut self, retain: bool) -> Self {
        self.retain_raw_markup = retain;
        self
    }

    /// Replace the list of Psalm book designations
    pub fn with_psalm_book_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.psalm_book_names = names.into_iter().map(Into::into).collect();
        self
    }
}
