//! Shared value types and text helpers

pub mod reference;
pub mod text_utils;

pub use reference::ChapterReference;
