//! Poetry layout, speaker labels, prose around poetry and Psalm metadata.

#[path = "../common/mod.rs"]
mod common;

use bible_text_parser::{CompositionType, FootnoteType, parse_chapter};
use common::{HEBREW_LETTERS, fixture, generated_poetry_chapter};

#[test]
fn test_psalm_23_lines_and_levels() {
    let chapter = fixture("psalm_23.html").parse();
    assert_eq!(chapter.verse_count(), 6);
    assert!(chapter.is_poetry());

    let first = &chapter.verses[0];
    assert!(first.is_first_verse_of_chapter);
    assert_eq!(first.text, "The LORD is my shepherd; I shall not want.");
    let lines: Vec<(&str, u8)> = first
        .poetry_lines
        .iter()
        .map(|l| (l.text.as_str(), l.indent_level))
        .collect();
    assert_eq!(
        lines,
        vec![("The LORD is my shepherd;", 1), ("I shall not want.", 2)]
    );
    assert_eq!(first.poetry_indent_level, Some(2));

    let fourth = chapter.verse("4").unwrap();
    assert_eq!(fourth.poetry_lines.len(), 4);
    assert_eq!(fourth.poetry_indent_level, Some(3));
    assert!(fourth.has_stanza_break_before);
    assert!(fourth.poetry_lines[0].has_stanza_break_before);
    assert!(!fourth.poetry_lines[1].has_stanza_break_before);
    assert_eq!(
        fourth.poetry_lines[3].text,
        "thy rod and thy staff they comfort me."
    );
}

#[test]
fn test_psalm_23_footnote_inside_poetry_line() {
    let chapter = fixture("psalm_23.html").parse();
    let verse = chapter.verse("5").unwrap();

    assert_eq!(verse.poetry_lines[1].text, "thou anointest my head with oil;");
    assert!(!verse.text.contains("fat"));
    assert_eq!(verse.footnotes.len(), 1);
    assert_eq!(verse.footnotes[0].reference, "23:5");
    assert_eq!(verse.footnotes[0].footnote_type, FootnoteType::Hebrew);

    let meta = chapter.chapter_metadata.unwrap();
    assert_eq!(meta.composition_number, 23);
    assert_eq!(meta.superscription.as_deref(), Some("A Psalm of David."));
    assert!(!meta.has_interlude);
}

#[test]
fn test_poetry_lines_join_into_verse_text() {
    let chapter = fixture("psalm_4.html").parse();
    for verse in &chapter.verses {
        let joined = verse
            .poetry_lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(verse.text, joined, "verse {}", verse.number);
    }
}

#[test]
fn test_psalm_4_interludes() {
    let chapter = fixture("psalm_4.html").parse();
    assert_eq!(chapter.verse_count(), 8);

    let marked: Vec<&str> = chapter
        .verses
        .iter()
        .filter(|v| v.has_interlude_marker)
        .map(|v| v.number.as_str())
        .collect();
    assert_eq!(marked, vec!["2", "4"]);

    let second = chapter.verse("2").unwrap();
    assert_eq!(
        second.poetry_lines[1].text,
        "how long will ye love vanity, and seek after leasing?"
    );
    assert!(!second.text.contains("Selah"));

    let meta = chapter.chapter_metadata.unwrap();
    assert_eq!(meta.superscription.as_deref(), Some("A psalm of David"));
    assert!(meta.has_interlude);
    assert_eq!(meta.interlude_positions, vec!["2", "4"]);
    assert!(meta.composition_type.is_none());
}

#[test]
fn test_psalm_4_stanza_breaks() {
    let chapter = fixture("psalm_4.html").parse();
    let breaks: Vec<&str> = chapter
        .verses
        .iter()
        .filter(|v| v.has_stanza_break_before)
        .map(|v| v.number.as_str())
        .collect();
    assert_eq!(breaks, vec!["3", "5", "6"]);
}

#[test]
fn test_song_speaker_labels() {
    let chapter = fixture("song_of_songs_2.html").parse();
    assert_eq!(chapter.book_name, "Song of Songs");
    assert!(chapter.chapter_metadata.is_none());

    let anchors = |number: &str| -> Vec<(String, usize)> {
        chapter
            .verse(number)
            .unwrap()
            .speaker_labels
            .iter()
            .map(|l| (l.text.clone(), l.before_poetry_line_index))
            .collect()
    };

    assert_eq!(
        anchors("10"),
        vec![("She".to_string(), 0), ("He".to_string(), 1)]
    );
    assert_eq!(anchors("15"), vec![("Friends".to_string(), 0)]);
    // Label written inside the line it introduces
    assert_eq!(anchors("16"), vec![("She".to_string(), 0)]);
    assert!(anchors("17").is_empty());

    let verse = chapter.verse("16").unwrap();
    assert_eq!(verse.poetry_lines[0].text, "My beloved is mine, and I am his:");
    assert!(!verse.text.contains("She"));
}

#[test]
fn test_speaker_label_indexes_are_in_range() {
    let chapter = fixture("song_of_songs_2.html").parse();
    for verse in &chapter.verses {
        for label in &verse.speaker_labels {
            assert!(label.before_poetry_line_index < verse.poetry_lines.len());
        }
    }
}

#[test]
fn test_prose_before_poetry() {
    let chapter = fixture("1_samuel_2.html").parse();
    let first = &chapter.verses[0];

    assert_eq!(first.heading.as_deref(), Some("Hannah's Prayer"));
    assert_eq!(first.prose_before.as_deref(), Some("And Hannah prayed, and said,"));
    assert!(first.prose_after.is_none());
    assert_eq!(first.poetry_lines.len(), 4);
    assert_eq!(first.poetry_lines[0].text, "My heart rejoiceth in the LORD,");
    assert!(first.text.starts_with("And Hannah prayed, and said, My heart rejoiceth"));

    let second = &chapter.verses[1];
    assert!(second.prose_before.is_none());
    assert_eq!(second.poetry_lines.len(), 3);
}

#[test]
fn test_psalm_119_acrostic() {
    let markup = generated_poetry_chapter(176, true);
    let chapter = parse_chapter(&markup, "Psalm 119").unwrap();
    assert_eq!(chapter.verse_count(), 176);

    for (i, letter) in HEBREW_LETTERS.iter().enumerate() {
        let number = (i * 8 + 1).to_string();
        assert_eq!(
            chapter.verse(&number).unwrap().acrostic_letter.as_deref(),
            Some(*letter)
        );
    }
    assert!(chapter.verse("2").unwrap().acrostic_letter.is_none());

    let meta = chapter.chapter_metadata.as_ref().unwrap();
    assert_eq!(meta.composition_type, Some(CompositionType::Acrostic));
    assert_eq!(meta.acrostic_letters.len(), 22);
    assert_eq!(meta.acrostic_letters[0].letter, "Aleph");
    assert!(meta.acrostic_letters[0].after_verse.is_none());
    assert_eq!(meta.acrostic_letters[1].letter, "Beth");
    assert_eq!(meta.acrostic_letters[1].after_verse.as_deref(), Some("8"));
    assert_eq!(meta.acrostic_letters[21].after_verse.as_deref(), Some("168"));

    // Letters never end up in verse text
    assert!(!chapter.verse("9").unwrap().text.contains("Beth"));
}

#[test]
fn test_acrostic_letter_inside_verse() {
    let chapter = parse_chapter(
        concat!(
            r#"<span class="verse" data-verse="1"><span class="qa">Aleph</span>"#,
            r#"<p class="q1">Blessed are the undefiled in the way,</p></span>"#,
        ),
        "Psalm 119",
    )
    .unwrap();
    let verse = &chapter.verses[0];
    assert_eq!(verse.acrostic_letter.as_deref(), Some("Aleph"));
    assert_eq!(verse.text, "Blessed are the undefiled in the way,");
}

#[test]
fn test_book_division() {
    let chapter = parse_chapter(
        concat!(
            r#"<p class="ms">BOOK II</p><p class="d">To the chief Musician, Maschil, for the sons of Korah.</p>"#,
            r#"<span class="verse" data-verse="1"><p class="q1"><span class="v">1</span>As the hart panteth after the water brooks,</p></span>"#,
        ),
        "Psalms 42",
    )
    .unwrap();
    let meta = chapter.chapter_metadata.unwrap();
    assert_eq!(meta.collection_division.as_deref(), Some("BOOK II"));
    assert_eq!(
        meta.superscription.as_deref(),
        Some("To the chief Musician, Maschil, for the sons of Korah.")
    );
    assert_eq!(meta.composition_number, 42);
}
