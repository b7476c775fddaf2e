//! Pipe-table text format.
//!
//! ```text
//! | Name | Qty |
//! | --- | ---: |
//! | pears | 3 |
//! ```
//!
//! Output is not padded to equal column widths; the format only needs the
//! pipes and the separator row to be well-formed.

use markdown_weaver::{Alignment, Event, Parser, Tag, TagEnd};

use crate::error::TableError;
use crate::render::default_md_options;

use super::grid::{ColAlignment, Grid};

/// Build the canonical pipe-table representation.
///
/// The first row is the header, followed by the alignment separator row and
/// the remaining rows as body.
pub fn build_pipe_table(rows: &[Vec<String>], alignments: &[ColAlignment]) -> String {
    let mut out = String::new();

    for (index, row) in rows.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        push_row(&mut out, row.iter().map(|cell| escape_cell(cell)));

        if index == 0 {
            out.push('\n');
            push_row(&mut out, alignments.iter().map(|a| a.separator().into()));
        }
    }

    out
}

fn push_row<I>(out: &mut String, cells: I)
where
    I: Iterator<Item = String>,
{
    out.push('|');
    for cell in cells {
        out.push(' ');
        out.push_str(&cell);
        out.push_str(" |");
    }
}

/// Escape bare pipes so a cell cannot split into two columns.
pub fn escape_cell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut escaped = false;
    for c in text.chars() {
        if c == '|' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    out
}

/// Fold a committed cell's text onto a single line.
///
/// Contenteditable cells can pick up line breaks, which a pipe-table row
/// cannot hold.
pub fn normalize_cell_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace(['\n', '\r'], " ");
    text.trim().to_string()
}

fn column_alignment(alignment: &Alignment) -> ColAlignment {
    match alignment {
        Alignment::Center => ColAlignment::Center,
        Alignment::Right => ColAlignment::Right,
        Alignment::Left | Alignment::None => ColAlignment::Left,
    }
}

/// Cell markdown from the source slice of a table cell.
///
/// The slice can carry the delimiting pipes and padding; escaped pipes stay
/// escaped so the cell source round-trips.
fn cell_source(raw: &str) -> String {
    let mut cell = raw.trim();
    if let Some(rest) = cell.strip_prefix('|') {
        cell = rest;
    }
    if let Some(rest) = cell.strip_suffix('|') {
        if !rest.ends_with('\\') {
            cell = rest;
        }
    }
    cell.trim().to_string()
}

/// Parse the first pipe table in `source` into a [`Grid`].
///
/// Table recognition follows GFM: a header row and a matching separator row
/// are required, and the table ends at the first blank line or non-table
/// block. Body rows are fitted to the header width by [`Grid::new`].
pub fn parse_pipe_table(source: &str) -> Result<Grid, TableError> {
    let mut alignments: Option<Vec<ColAlignment>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();

    for (event, range) in Parser::new_ext(source, default_md_options()).into_offset_iter() {
        match event {
            Event::Start(Tag::Table(columns)) => {
                alignments = Some(columns.iter().map(column_alignment).collect());
            }
            Event::Start(Tag::TableHead | Tag::TableRow) => rows.push(Vec::new()),
            Event::Start(Tag::TableCell) => {
                if let Some(row) = rows.last_mut() {
                    row.push(cell_source(&source[range]));
                }
            }
            Event::End(TagEnd::Table) => break,
            _ => {}
        }
    }

    let alignments = alignments.ok_or_else(|| {
        TableError::MalformedTable("no header and separator rows found".into())
    })?;
    tracing::trace!(
        target: "moondown::table",
        rows = rows.len(),
        cols = alignments.len(),
        "parsed pipe table"
    );
    Grid::new(rows, alignments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_build_pipe_table() {
        let table = build_pipe_table(
            &rows(&[&["Name", "Qty"], &["pears", "3"], &["figs", ""]]),
            &[ColAlignment::Left, ColAlignment::Right],
        );
        insta::assert_snapshot!(table, @r"
        | Name | Qty |
        | --- | ---: |
        | pears | 3 |
        | figs |  |
        ");
    }

    #[test]
    fn test_header_only_table() {
        let table = build_pipe_table(&rows(&[&["a", "b"]]), &[ColAlignment::Center; 2]);
        assert_eq!(table, "| a | b |\n| :---: | :---: |");
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
        assert_eq!(escape_cell("a\\|b"), "a\\|b");
        assert_eq!(escape_cell("a\\\\|b"), "a\\\\\\|b");
    }

    #[test]
    fn test_normalize_cell_text() {
        assert_eq!(normalize_cell_text(" one\ntwo\r\nthree "), "one two three");
    }

    #[test]
    fn test_parse_pipe_table() {
        let grid = parse_pipe_table(
            "| a | b | c |\n|:---|:---:|---:|\n| 1 | 2 | 3 |\n| x \\| y | |\n",
        )
        .unwrap();
        assert_eq!(
            grid.alignments(),
            &[ColAlignment::Left, ColAlignment::Center, ColAlignment::Right]
        );
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.rows()[1], vec!["1", "2", "3"]);
        assert_eq!(grid.rows()[2], vec!["x \\| y", "", ""]);
    }

    #[test]
    fn test_parse_without_outer_pipes() {
        let grid = parse_pipe_table("a | b\n--- | ---\nc | d").unwrap();
        assert_eq!(grid.rows(), &rows(&[&["a", "b"], &["c", "d"]])[..]);
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        assert!(matches!(
            parse_pipe_table("| a | b |\n| c | d |"),
            Err(TableError::MalformedTable(_))
        ));
        assert!(matches!(
            parse_pipe_table("| a |"),
            Err(TableError::MalformedTable(_))
        ));
    }

    #[test]
    fn test_parse_stops_at_blank_line() {
        let grid = parse_pipe_table("| a |\n| --- |\n| 1 |\n\nParagraph").unwrap();
        assert_eq!(grid.rows(), &rows(&[&["a"], &["1"]])[..]);
    }

    #[test]
    fn test_parse_skips_leading_prose() {
        let grid =
            parse_pipe_table("Intro text.\n\n| a | b |\n| --- | --- |\n| `c` | **d** |").unwrap();
        assert_eq!(grid.rows(), &rows(&[&["a", "b"], &["`c`", "**d**"]])[..]);
    }

    #[test]
    fn test_serialize_then_parse() {
        let source = "| a | b |\n| :---: | ---: |\n| c | d |";
        let grid = parse_pipe_table(source).unwrap();
        assert_eq!(grid.serialize(), source);
    }
}
