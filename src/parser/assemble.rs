//! Unified document assembly
//!
//! Pure data combination: no markup is inspected here.

use std::mem;

use super::metadata::DocumentMetadata;
use crate::common::ChapterReference;
use crate::config::ParserConfig;
use crate::models::{
    AcrosticLetter, CompositionType, ParseMode, PsalmMetadata, UnifiedChapter, UnifiedVerse,
};

/// Combine extracted verses and chapter-level metadata into the final document
///
/// Acrostic letters found between verses are attached to the verse that
/// follows them when it has none of its own. Verses followed by an interlude
/// get `has_interlude_marker`. Psalm metadata is attached only for chapters
/// of a configured Psalm book.
pub(crate) fn assemble(
    mut verses: Vec<UnifiedVerse>,
    mut metadata: DocumentMetadata,
    reference: &ChapterReference,
    config: &ParserConfig,
    mode: ParseMode,
) -> UnifiedChapter {
    let unattached = attach_acrostic_letters(&mut verses, &metadata.acrostic_letters);

    for verse in verses.iter_mut() {
        if metadata.interlude_positions.contains(&verse.number) {
            verse.has_interlude_marker = true;
        }
    }

    let tables = mem::take(&mut metadata.tables);
    let chapter_metadata = reference
        .is_psalm(&config.psalm_book_names)
        .then(|| psalm_metadata(&verses, metadata, unattached, reference));

    UnifiedChapter {
        reference: reference.to_string(),
        translation_id: config.translation_id.clone(),
        book_name: reference.book_name().to_string(),
        chapter_number: reference.chapter(),
        verses,
        chapter_metadata,
        tables,
        parse_mode: mode,
    }
}

/// Returns the letters no verse could take
fn attach_acrostic_letters(
    verses: &mut [UnifiedVerse],
    letters: &[AcrosticLetter],
) -> Vec<AcrosticLetter> {
    let mut unattached = Vec::new();
    for letter in letters {
        let target = match &letter.after_verse {
            None => Some(0),
            Some(after) => verses
                .iter()
                .rposition(|v| &v.number == after)
                .map(|i| i + 1),
        };
        match target.and_then(|i| verses.get_mut(i)) {
            Some(verse) if verse.acrostic_letter.is_none() => {
                verse.acrostic_letter = Some(letter.letter.clone());
            }
            _ => unattached.push(letter.clone()),
        }
    }
    unattached
}

fn psalm_metadata(
    verses: &[UnifiedVerse],
    metadata: DocumentMetadata,
    unattached: Vec<AcrosticLetter>,
    reference: &ChapterReference,
) -> PsalmMetadata {
    let mut acrostic_letters: Vec<AcrosticLetter> = verses
        .iter()
        .enumerate()
        .filter_map(|(i, verse)| {
            let letter = verse.acrostic_letter.clone()?;
            let after_verse = i
                .checked_sub(1)
                .and_then(|prev| verses.get(prev))
                .map(|v| v.number.clone());
            Some(AcrosticLetter {
                letter,
                after_verse,
            })
        })
        .collect();
    acrostic_letters.extend(unattached);

    let interlude_positions: Vec<String> = verses
        .iter()
        .filter(|v| v.has_interlude_marker)
        .map(|v| v.number.clone())
        .fold(Vec::new(), |mut positions, number| {
            if !positions.contains(&number) {
                positions.push(number);
            }
            positions
        });

    PsalmMetadata {
        composition_number: reference.chapter(),
        superscription: metadata.superscription,
        has_interlude: metadata.has_interlude || !interlude_positions.is_empty(),
        interlude_positions,
        composition_type: (!acrostic_letters.is_empty()).then_some(CompositionType::Acrostic),
        acrostic_letters,
        collection_division: metadata.collection_division,
    }
}
