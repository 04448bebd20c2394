//! Structural parsing of prose chapters: headings, paragraphs, red letter,
//! footnotes and tables.

#[path = "../common/mod.rs"]
mod common;

use bible_text_parser::{ChapterParser, FootnoteType, ParseMode, ParserConfig};
use common::fixture;
use rstest::rstest;

#[test]
fn test_genesis_heading_and_first_verse() {
    let chapter = fixture("genesis_1.html").parse();

    assert_eq!(chapter.parse_mode, ParseMode::Structural);
    assert_eq!(chapter.book_name, "Genesis");
    assert_eq!(chapter.chapter_number, 1);
    assert_eq!(chapter.verse_count(), 5);

    let first = &chapter.verses[0];
    assert_eq!(first.number, "1");
    assert_eq!(first.heading.as_deref(), Some("The Account of Creation"));
    assert!(first.is_first_verse_of_chapter);
    assert!(first.starts_new_paragraph);
    assert_eq!(
        first.text,
        "In the beginning God created the heaven and the earth."
    );

    assert!(chapter.verses[1..].iter().all(|v| v.heading.is_none()));
    assert!(chapter.verses[1..].iter().all(|v| !v.is_first_verse_of_chapter));
}

#[test]
fn test_genesis_paragraph_starts() {
    let chapter = fixture("genesis_1.html").parse();
    let starts: Vec<(&str, bool)> = chapter
        .verses
        .iter()
        .map(|v| (v.number.as_str(), v.starts_new_paragraph))
        .collect();
    assert_eq!(
        starts,
        vec![("1", true), ("2", false), ("3", true), ("4", false), ("5", false)]
    );
}

#[test]
fn test_genesis_footnotes_leave_the_text() {
    let chapter = fixture("genesis_1.html").parse();

    let verse = chapter.verse("2").unwrap();
    assert_eq!(
        verse.text,
        "And the earth was without form, and void; and darkness was upon the face of the deep. And the Spirit of God moved upon the face of the waters."
    );
    assert_eq!(verse.footnotes.len(), 1);
    let note = &verse.footnotes[0];
    assert_eq!(note.marker, "a");
    assert_eq!(note.reference, "1:2");
    assert_eq!(note.content, "Hebrew tehom, the watery deep");
    assert_eq!(note.footnote_type, FootnoteType::Hebrew);

    let verse = chapter.verse("4").unwrap();
    assert!(verse.text.ends_with("divided the light from the darkness."));
    assert_eq!(verse.footnotes[0].marker, "b");
    assert_eq!(verse.footnotes[0].footnote_type, FootnoteType::Alternative);
}

#[test]
fn test_john_red_letter_and_cross_reference() {
    let chapter = fixture("john_3.html").parse();
    let numbers: Vec<&str> = chapter.verses.iter().map(|v| v.number.as_str()).collect();
    assert_eq!(numbers, vec!["16", "17", "22"]);

    let verse = chapter.verse("16").unwrap();
    assert!(verse.is_red_letter_span);
    assert!(verse.text.starts_with("For God so loved the world"));
    assert!(verse.text.contains("only begotten Son, that whosoever"));
    assert_eq!(verse.footnotes[0].footnote_type, FootnoteType::Greek);

    assert!(chapter.verse("17").unwrap().is_red_letter_span);

    let narrative = chapter.verse("22").unwrap();
    assert!(!narrative.is_red_letter_span);
    assert_eq!(
        narrative.heading.as_deref(),
        Some("John the Baptist Exalts Christ")
    );
    assert!(narrative.starts_new_paragraph);
    assert_eq!(narrative.footnotes[0].content, "Compare John 4:2");
    assert_eq!(
        narrative.footnotes[0].footnote_type,
        FootnoteType::CrossReference
    );
}

#[test]
fn test_numbers_census_table() {
    let chapter = fixture("numbers_1.html").parse();

    assert_eq!(chapter.verse_count(), 2);
    assert_eq!(chapter.tables.len(), 1);

    let table = &chapter.tables[0];
    assert_eq!(table.after_verse.as_deref(), Some("19"));
    assert_eq!(table.headers, vec!["Tribe", "Number"]);
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[0].cells, vec!["Reuben", "46,500"]);
    assert_eq!(table.rows[0].verse_number.as_deref(), Some("21"));
    assert_eq!(table.rows[2].cells, vec!["Gad", "45,650"]);
    assert_eq!(table.rows[2].verse_number.as_deref(), Some("25"));

    // Table text stays out of the verses around it
    assert!(chapter.verses.iter().all(|v| !v.text.contains("Reuben")));
    assert!(chapter.chapter_metadata.is_none());
}

#[test]
fn test_retained_raw_markup() {
    let parser =
        ChapterParser::with_config(ParserConfig::new().with_retain_raw_markup(true)).unwrap();
    let chapter = parser
        .parse(&fixture("genesis_1.html").read_markup(), "Genesis 1")
        .unwrap();

    let raw = chapter.verses[0].raw_markup.as_deref().unwrap();
    assert!(raw.contains(r#"data-verse="1""#));
    assert!(raw.contains("In the beginning"));
    assert!(!raw.contains("And the earth"));
}

#[test]
fn test_raw_markup_is_dropped_by_default() {
    let chapter = fixture("genesis_1.html").parse();
    assert!(chapter.verses.iter().all(|v| v.raw_markup.is_none()));
}

#[rstest]
#[case("genesis_1.html", "Genesis 1", "KJV")]
#[case("john_3.html", "John 3", "ESV")]
#[case("numbers_1.html", "Numbers 1", "NIV")]
fn test_translation_id_is_copied(
    #[case] filename: &'static str,
    #[case] reference: &str,
    #[case] translation: &str,
) {
    let parser =
        ChapterParser::with_config(ParserConfig::new().with_translation_id(translation)).unwrap();
    let chapter = parser
        .parse(&fixture(filename).read_markup(), reference)
        .unwrap();
    assert_eq!(chapter.translation_id, translation);
    assert_eq!(chapter.reference, reference);
}

#[test]
fn test_unclosed_paragraphs_keep_verses_apart() {
    let chapter = fixture("ephesians_1_unclosed.html").parse();
    let numbers: Vec<&str> = chapter.verses.iter().map(|v| v.number.as_str()).collect();
    assert_eq!(numbers, vec!["1", "2", "3"]);
    assert_eq!(
        chapter.verses[0].text,
        "Paul, an apostle of Jesus Christ by the will of God, to the saints which are at Ephesus:"
    );
    assert_eq!(
        chapter.verses[1].text,
        "Grace be to you, and peace, from God our Father, and from the Lord Jesus Christ."
    );
    assert!(!chapter.verses[0].text.contains("Grace"));
}
