//! Table extraction (census lists, genealogies)

use markup5ever_rcdom::Handle;

use super::node_utils::{PrunedTree, Walk, has_role, tag_name};
use super::segment::normalize_verse_number;
use crate::models::{BibleTable, TableRow};
use crate::styles::{Role, StyleTable};

fn is_cell(node: &Handle) -> bool {
    matches!(tag_name(node), Some("td") | Some("th"))
}

fn is_header_cell(node: &Handle, styles: &StyleTable) -> bool {
    tag_name(node) == Some("th") || has_role(node, styles, |r| *r == Role::TableHeader)
}

/// Extract a `<table>` anchored after `after_verse`
///
/// A first row made only of header cells becomes `headers`. A verse-number
/// glyph inside a data cell is moved out of the cell text into the row's
/// `verse_number`. Rows without cells are dropped; a table with neither
/// headers nor rows yields `None`.
pub(crate) fn extract_table(
    table: &Handle,
    after_verse: Option<String>,
    styles: &StyleTable,
) -> Option<BibleTable> {
    let view = PrunedTree::new(table.clone());
    let mut rows = Vec::new();
    view.walk(table, &mut |node| {
        if tag_name(node) == Some("tr") {
            rows.push(node.clone());
            Walk::Skip
        } else {
            Walk::Descend
        }
    });

    let mut extracted = BibleTable {
        after_verse,
        ..Default::default()
    };

    for (index, row) in rows.iter().enumerate() {
        let cells: Vec<Handle> = view
            .children(row)
            .into_iter()
            .filter(is_cell)
            .collect();
        if cells.is_empty() {
            continue;
        }

        if index == 0 && cells.iter().all(|c| is_header_cell(c, styles)) {
            extracted.headers = cells.iter().map(|c| view.text(c)).collect();
            continue;
        }

        let mut verse_number = None;
        let mut texts = Vec::with_capacity(cells.len());
        for cell in cells {
            let mut cell_view = PrunedTree::new(cell.clone());
            let marks = cell_view.find_all(styles, |r| *r == Role::VerseNumber);
            if verse_number.is_none() {
                verse_number = marks
                    .iter()
                    .map(|m| cell_view.text(m))
                    .find_map(|t| normalize_verse_number(&t));
            }
            cell_view.prune_all(&marks);
            texts.push(cell_view.root_text());
        }

        extracted.rows.push(TableRow {
            cells: texts,
            verse_number,
        });
    }

    if extracted.headers.is_empty() && extracted.rows.is_empty() {
        None
    } else {
        Some(extracted)
    }
}
