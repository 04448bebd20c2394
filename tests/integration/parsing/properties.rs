//! Properties every parsed chapter must satisfy, checked across all fixtures
//! and generated chapters.

#[path = "../common/mod.rs"]
mod common;

use bible_text_parser::{
    ChapterParser, FootnoteType, ParserConfig, classify_footnote, parse_chapter,
};
use common::{
    chapter_text_pool, fixture, generated_poetry_chapter, generated_prose_chapter,
    has_markup_residue, markup_plain_text, markup_test_cases, significant_words,
    structural_test_cases,
};
use rstest::rstest;

#[test]
fn test_no_marker_leaks_into_verse_text() {
    for case in markup_test_cases() {
        let chapter = case.parse();
        for verse in &chapter.verses {
            let context = format!("{} verse {}", case.filename, verse.number);
            assert!(!verse.text.is_empty(), "{context}: empty text");
            assert!(!has_markup_residue(&verse.text), "{context}: {}", verse.text);
            assert!(
                !verse.text.starts_with(&verse.number),
                "{context}: leading verse number in {:?}",
                verse.text
            );
            for note in &verse.footnotes {
                assert!(
                    !verse.text.contains(&note.content),
                    "{context}: footnote text {:?} leaked",
                    note.content
                );
            }
            for label in &verse.speaker_labels {
                assert!(
                    !verse.text.starts_with(&label.text),
                    "{context}: speaker label leaked"
                );
            }
            if let Some(heading) = &verse.heading {
                assert!(!verse.text.contains(heading.as_str()), "{context}: heading leaked");
            }
        }
    }
}

#[test]
fn test_glued_numbers_are_stripped_before_lowercase_text() {
    let chapter = fixture("psalm_23_glued.html").parse();
    let texts: Vec<&str> = chapter.verses.iter().map(|v| v.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "The LORD is my shepherd; I shall not want.",
            "He maketh me to lie down in green pastures:",
            "he leadeth me beside the still waters.",
            "he restoreth my soul: he leadeth me in the paths of righteousness for his name's sake.",
        ]
    );
}

#[test]
fn test_ordinals_at_verse_start_survive() {
    let chapter = parse_chapter(
        r#"<span class="verse" data-verse="3">3rd of the month they came.</span>"#,
        "Esther 9",
    )
    .unwrap();
    assert_eq!(chapter.verses[0].text, "3rd of the month they came.");
}

#[test]
fn test_every_word_is_kept_somewhere() {
    for case in markup_test_cases() {
        let chapter = case.parse();
        let source = significant_words(&markup_plain_text(&case.read_markup()));
        let kept = significant_words(&chapter_text_pool(&chapter));
        let missing: Vec<&String> = source.difference(&kept).collect();
        assert!(missing.is_empty(), "{}: lost words {missing:?}", case.filename);
    }
}

#[rstest]
#[case("Genesis 1", 31)]
#[case("John 3", 36)]
#[case("Matthew 5", 48)]
#[case("Jude", 25)]
fn test_prose_verse_counts(#[case] reference: &str, #[case] count: usize) {
    let chapter = parse_chapter(&generated_prose_chapter(count), reference).unwrap();
    assert_eq!(chapter.verse_count(), count);
    let expected: Vec<String> = (1..=count).map(|n| n.to_string()).collect();
    let numbers: Vec<String> = chapter.verses.iter().map(|v| v.number.clone()).collect();
    assert_eq!(numbers, expected);
    assert_eq!(
        chapter.verses.iter().filter(|v| v.is_first_verse_of_chapter).count(),
        1
    );
}

#[rstest]
#[case("Psalm 23", 6, false)]
#[case("Psalm 117", 2, false)]
#[case("Psalm 119", 176, true)]
#[case("Lamentations 3", 66, false)]
fn test_poetry_verse_counts(#[case] reference: &str, #[case] count: usize, #[case] acrostic: bool) {
    let chapter = parse_chapter(&generated_poetry_chapter(count, acrostic), reference).unwrap();
    assert_eq!(chapter.verse_count(), count);
    assert!(chapter.verses.iter().all(|v| v.poetry_lines.len() == 2));
    assert_eq!(chapter.verses.last().unwrap().number, count.to_string());
}

#[test]
fn test_psalm_23_fixture_count() {
    assert_eq!(fixture("psalm_23.html").parse().verse_count(), 6);
}

#[test]
fn test_parsing_is_deterministic() {
    for case in markup_test_cases() {
        let first = case.parse();
        let second = case.parse();
        assert_eq!(first, second, "{}", case.filename);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }
}

#[test]
fn test_speaker_label_positions_match_source_order() {
    let chapter = fixture("song_of_songs_2.html").parse();
    for verse in &chapter.verses {
        let indexes: Vec<usize> = verse
            .speaker_labels
            .iter()
            .map(|l| l.before_poetry_line_index)
            .collect();
        let mut sorted = indexes.clone();
        sorted.sort_unstable();
        assert_eq!(indexes, sorted, "verse {}", verse.number);
        assert!(indexes.iter().all(|&i| i < verse.poetry_lines.len()));
    }
}

#[rstest]
#[case("Hebrew ruach, wind or spirit", FootnoteType::Hebrew)]
#[case("Greek logos", FootnoteType::Greek)]
#[case("Some manuscripts add verse 4", FootnoteType::TextualVariant)]
#[case("Or the Word was divine", FootnoteType::Alternative)]
#[case("Literally heart or mind", FootnoteType::Alternative)]
#[case("Compare Genesis 1:1", FootnoteType::CrossReference)]
#[case("See also Proverbs 8:22", FootnoteType::CrossReference)]
#[case("That is, a lament", FootnoteType::Other)]
fn test_footnote_classification(#[case] content: &str, #[case] expected: FootnoteType) {
    assert_eq!(classify_footnote(content), expected);
}

#[test]
fn test_footnote_types_follow_content() {
    for case in markup_test_cases() {
        for verse in case.parse().verses {
            for note in &verse.footnotes {
                assert_eq!(note.footnote_type, classify_footnote(&note.content));
            }
        }
    }
}

#[test]
fn test_unclosed_paragraphs_are_repaired() {
    let chapter = fixture("ephesians_1_unclosed.html").parse();

    assert_eq!(chapter.verse_count(), 3);
    assert!(!chapter.verses[0].text.contains("Grace be to you"));
    assert!(!chapter.verses[1].text.contains("Blessed be the God"));
    assert!(chapter.verses[2].text.starts_with("Blessed be the God"));
}

#[test]
fn test_nested_verses_without_repair() {
    let parser =
        ChapterParser::with_config(ParserConfig::new().with_repair_markup(false)).unwrap();
    let chapter = parser
        .parse(
            concat!(
                r#"<span class="verse" data-verse="1"><p class="p"><span class="v">1</span>Paul, an apostle</span>"#,
                r#"<span class="verse" data-verse="2"><span class="v">2</span>Grace be to you</span>"#,
                r#"<span class="verse" data-verse="3"><span class="v">3</span>Blessed be the God</span>"#,
            ),
            "Ephesians 1",
        )
        .unwrap();

    let texts: Vec<&str> = chapter.verses.iter().map(|v| v.text.as_str()).collect();
    assert_eq!(texts, vec!["Paul, an apostle", "Grace be to you", "Blessed be the God"]);
}

#[test]
fn test_genesis_1_end_to_end() {
    let chapter = fixture("genesis_1.html").parse();
    let first = &chapter.verses[0];
    assert_eq!(first.number, "1");
    assert_eq!(first.heading.as_deref(), Some("The Account of Creation"));
    assert!(first.is_first_verse_of_chapter);
    assert!(!first.text.starts_with('1'));
    assert!(first.text.starts_with("In the beginning"));
}

#[test]
fn test_psalm_superscription_and_interludes() {
    let meta = fixture("psalm_4.html").parse().chapter_metadata.unwrap();
    assert_eq!(meta.superscription.as_deref(), Some("A psalm of David"));
    assert!(meta.has_interlude);
    assert!(meta.interlude_positions.iter().any(|p| p == "2"));
    assert!(meta.interlude_positions.iter().any(|p| p == "4"));
}

#[test]
fn test_tables_only_where_the_source_has_them() {
    for case in structural_test_cases() {
        let chapter = case.parse();
        let has_table = case.read_markup().contains("<table");
        assert_eq!(!chapter.tables.is_empty(), has_table, "{}", case.filename);
        if !has_table {
            assert!(!chapter.to_json().unwrap().contains("\"tables\""));
        }
    }
}

#[test]
fn test_only_psalms_carry_psalm_metadata() {
    for case in structural_test_cases() {
        let chapter = case.parse();
        assert_eq!(
            chapter.chapter_metadata.is_some(),
            case.reference.starts_with("Psalm"),
            "{}",
            case.filename
        );
    }
}
