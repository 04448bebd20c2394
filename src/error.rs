use std::result;

use thiserror::Error;

/// Error types for Bible chapter parsing operations
#[derive(Error, Debug)]
pub enum ParseError {
    /// Neither the structural nor the fallback segmentation found a verse
    #[error("No verse content found for {reference}")]
    NoContent { reference: String },

    /// Reference string could not be interpreted as a chapter reference
    #[error("Invalid chapter reference: {reference:?}")]
    InvalidReference { reference: String },

    /// JSON payload or style table failed to deserialize
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Style table is unusable (empty pattern, no verse-number attributes)
    #[error("Invalid style table: {0}")]
    InvalidStyleTable(String),
}

impl ParseError {
    /// Whether the error means "nothing to show" rather than bad input
    pub fn is_no_content(&self) -> bool {
        matches!(self, ParseError::NoContent { .. })
    }
}

pub type Result<T> = result::Result<T, ParseError>;
