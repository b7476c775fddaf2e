//! Markdown list editing helpers.
//!
//! All offsets are byte offsets into the document text. Functions return
//! edits rather than modified text so hosts can apply them to their own
//! buffer and keep undo history intact.

use std::ops::Range;

/// Bullet glyphs by nesting level.
pub const BULLET_SYMBOLS: [char; 6] = ['●', '○', '■', '□', '◆', '◇'];

/// Indent added or removed by Tab and Shift-Tab.
pub const INDENT_UNIT: &str = "  ";

/// Replace `range` with `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub insert: String,
}

impl TextEdit {
    pub fn new(range: Range<usize>, insert: impl Into<String>) -> Self {
        Self {
            range,
            insert: insert.into(),
        }
    }
}

/// Edits for a key command plus where the cursor ends up afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEdit {
    pub edits: Vec<TextEdit>,
    pub cursor: usize,
}

/// Apply non-overlapping edits to `text`.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> String {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| e.range.start);

    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for edit in sorted {
        out.push_str(&text[pos..edit.range.start]);
        out.push_str(&edit.insert);
        pos = edit.range.end;
    }
    out.push_str(&text[pos..]);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker<'a> {
    /// Digits of an ordered item, without the dot.
    Ordered(&'a str),
    Bullet(char),
}

/// A list item line prefix: `{indent}{marker}{space}`.
#[derive(Debug, Clone, Copy)]
struct ListPrefix<'a> {
    indent: &'a str,
    marker: Marker<'a>,
    /// Byte length of indent, marker and the following whitespace char.
    len: usize,
}

impl ListPrefix<'_> {
    fn next_marker_text(&self) -> String {
        match self.marker {
            Marker::Ordered(digits) => format!("{}.", parse_number(digits) + 1),
            Marker::Bullet(c) => c.to_string(),
        }
    }
}

fn parse_number(digits: &str) -> u64 {
    digits.parse().unwrap_or(0)
}

/// Match `^(\s*)(\d+\.|[-*])\s` at the start of `line`.
fn parse_prefix(line: &str) -> Option<ListPrefix<'_>> {
    let body = line.trim_start_matches([' ', '\t']);
    let indent = &line[..line.len() - body.len()];

    let (marker, marker_len) = match body.chars().next()? {
        c @ ('-' | '*') => (Marker::Bullet(c), 1),
        c if c.is_ascii_digit() => {
            let digits = body.bytes().take_while(u8::is_ascii_digit).count();
            if body.as_bytes().get(digits) != Some(&b'.') {
                return None;
            }
            (Marker::Ordered(&body[..digits]), digits + 1)
        }
        _ => return None,
    };

    let space = body[marker_len..].chars().next()?;
    if !space.is_whitespace() {
        return None;
    }
    Some(ListPrefix {
        indent,
        marker,
        len: indent.len() + marker_len + space.len_utf8(),
    })
}

/// Lines with their starting byte offsets.
fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split('\n').map(move |line| {
        let start = offset;
        offset += line.len() + 1;
        (start, line)
    })
}

fn line_bounds(text: &str, pos: usize) -> Range<usize> {
    let start = text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[pos..].find('\n').map(|i| pos + i).unwrap_or(text.len());
    start..end
}

/// Renumber ordered list items so each nesting level counts up from 1.
///
/// Deeper indentation starts a new count; returning to a shallower level
/// resumes that level's count. Blank lines and bullet items keep the count
/// going; any other line ends the list.
pub fn renumber_ordered_lists(text: &str) -> Vec<TextEdit> {
    struct Level {
        indent: usize,
        next: u64,
    }

    let mut edits = Vec::new();
    let mut levels: Vec<Level> = Vec::new();
    let mut prev_indent: Option<usize> = None;

    for (start, line) in lines_with_offsets(text) {
        match parse_prefix(line) {
            Some(prefix @ ListPrefix {
                marker: Marker::Ordered(digits),
                ..
            }) => {
                let indent = prefix.indent.len();
                match prev_indent {
                    Some(prev) if indent < prev => levels.retain(|l| l.indent <= indent),
                    Some(prev) if indent == prev => {}
                    _ => {
                        levels.retain(|l| l.indent < indent);
                        levels.push(Level { indent, next: 1 });
                    }
                }
                if levels.is_empty() {
                    levels.push(Level { indent, next: 1 });
                }

                if let Some(level) = levels.last_mut() {
                    if parse_number(digits) != level.next {
                        let number_start = start + indent;
                        edits.push(TextEdit::new(
                            number_start..number_start + digits.len(),
                            level.next.to_string(),
                        ));
                    }
                    level.next += 1;
                }
                prev_indent = Some(indent);
            }
            Some(prefix) => prev_indent = Some(prefix.indent.len()),
            None if line.trim().is_empty() => {}
            None => {
                levels.clear();
                prev_indent = None;
            }
        }
    }

    edits
}

/// Enter inside a list item.
///
/// On a non-empty item, starts a new item with the same indentation (and the
/// next number for ordered lists). On an empty item, moves it out to the
/// nearest shallower item's level, or ends the list by removing the marker.
/// Returns `None` when the cursor line is not a list item.
pub fn continue_list(text: &str, cursor: usize) -> Option<ListEdit> {
    let line = line_bounds(text, cursor);
    let before = &text[line.start..cursor];
    let after = &text[cursor..line.end];
    let prefix = parse_prefix(before)?;
    let content = &before[prefix.len..];

    if !content.trim().is_empty() || !after.trim().is_empty() {
        let insert = format!("\n{}{} ", prefix.indent, prefix.next_marker_text());
        let end = cursor + insert.len();
        return Some(ListEdit {
            edits: vec![TextEdit::new(cursor..cursor, insert)],
            cursor: end,
        });
    }

    let outer = text[..line.start]
        .split('\n')
        .rev()
        .filter_map(parse_prefix)
        .find(|p| p.indent.len() < prefix.indent.len());

    match outer {
        Some(outer) => {
            let insert = format!("{}{} ", outer.indent, outer.next_marker_text());
            let end = line.start + insert.len();
            Some(ListEdit {
                edits: vec![TextEdit::new(line.clone(), insert)],
                cursor: end,
            })
        }
        None => Some(ListEdit {
            edits: vec![TextEdit::new(line.start..line.start + prefix.len, "")],
            cursor: line.start,
        }),
    }
}

/// Tab on a list line: indent the item by one unit.
pub fn indent_list_item(text: &str, cursor: usize) -> Option<ListEdit> {
    let line = line_bounds(text, cursor);
    parse_prefix(&text[line.start..cursor])?;
    Some(ListEdit {
        edits: vec![TextEdit::new(line.start..line.start, INDENT_UNIT)],
        cursor: cursor + INDENT_UNIT.len(),
    })
}

/// Shift-Tab on a list line: remove up to one unit of indentation.
///
/// A list line that is already flush left is still consumed, with no edits.
pub fn outdent_list_item(text: &str, cursor: usize) -> Option<ListEdit> {
    let line = line_bounds(text, cursor);
    let prefix = parse_prefix(&text[line.start..cursor])?;

    let remove = if prefix.indent.starts_with('\t') {
        1
    } else {
        prefix
            .indent
            .bytes()
            .take(INDENT_UNIT.len())
            .take_while(|b| *b == b' ')
            .count()
    };
    let edits = if remove == 0 {
        Vec::new()
    } else {
        vec![TextEdit::new(line.start..line.start + remove, "")]
    };
    Some(ListEdit {
        edits,
        cursor: cursor - remove,
    })
}

/// A styled bullet replacing an unordered list marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletMarker {
    /// The indentation, marker and following space being replaced.
    pub range: Range<usize>,
    pub level: usize,
    pub indentation: String,
    pub symbol: char,
}

impl BulletMarker {
    /// Level class, cycling every three levels.
    pub fn class(&self) -> String {
        format!("cm-bullet-list-l{}", self.level % 3)
    }

    /// Widget markup: the indentation and glyph in a classed span.
    pub fn html(&self) -> String {
        format!(
            "<span class=\"cm-bullet-list {}\">{}{} </span>",
            self.class(),
            self.indentation,
            self.symbol
        )
    }
}

/// Glyph for a nesting level.
pub fn bullet_symbol(level: usize) -> char {
    BULLET_SYMBOLS[level % BULLET_SYMBOLS.len()]
}

/// Bullet decorations for every unordered list item outside code fences.
pub fn bullet_markers(text: &str) -> Vec<BulletMarker> {
    let mut markers = Vec::new();
    let mut in_fence = false;

    for (start, line) in lines_with_offsets(text) {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || is_thematic_break(trimmed) {
            continue;
        }
        let Some(prefix) = parse_prefix(line) else {
            continue;
        };
        if !matches!(prefix.marker, Marker::Bullet(_)) {
            continue;
        }

        let level = prefix.indent.len() / 2;
        markers.push(BulletMarker {
            range: start..start + prefix.len,
            level,
            indentation: prefix.indent.to_string(),
            symbol: bullet_symbol(level),
        });
    }

    markers
}

/// `---`, `* * *` and similar.
fn is_thematic_break(line: &str) -> bool {
    let mut chars = line.chars().filter(|c| !c.is_whitespace());
    let Some(first) = chars.next() else {
        return false;
    };
    matches!(first, '-' | '*' | '_') && chars.clone().count() >= 2 && chars.all(|c| c == first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renumbered(text: &str) -> String {
        apply_edits(text, &renumber_ordered_lists(text))
    }

    #[test]
    fn test_renumber_flat() {
        assert_eq!(renumbered("1. a\n5. b\n9. c"), "1. a\n2. b\n3. c");
        assert!(renumber_ordered_lists("1. a\n2. b").is_empty());
    }

    #[test]
    fn test_renumber_nested() {
        let text = "1. a\n  4. x\n  7. y\n3. b";
        assert_eq!(renumbered(text), "1. a\n  1. x\n  2. y\n2. b");
    }

    #[test]
    fn test_renumber_resets_after_paragraph() {
        let text = "1. a\n2. b\n\nplain\n\n7. c";
        assert_eq!(renumbered(text), "1. a\n2. b\n\nplain\n\n1. c");
    }

    #[test]
    fn test_renumber_blank_lines_continue() {
        assert_eq!(renumbered("1. a\n\n1. b"), "1. a\n\n2. b");
    }

    #[test]
    fn test_renumber_edit_ranges() {
        let edits = renumber_ordered_lists("1. a\n10. b");
        assert_eq!(edits, vec![TextEdit::new(5..7, "2")]);
    }

    #[test]
    fn test_continue_list_new_item() {
        let text = "- one";
        let edit = continue_list(text, text.len()).unwrap();
        assert_eq!(apply_edits(text, &edit.edits), "- one\n- ");
        assert_eq!(edit.cursor, 8);

        let text = "  3. three";
        let edit = continue_list(text, text.len()).unwrap();
        assert_eq!(apply_edits(text, &edit.edits), "  3. three\n  4. ");
    }

    #[test]
    fn test_continue_list_outdents_empty_item() {
        let text = "1. a\n  - ";
        let edit = continue_list(text, text.len()).unwrap();
        assert_eq!(apply_edits(text, &edit.edits), "1. a\n2. ");
        assert_eq!(edit.cursor, 8);
    }

    #[test]
    fn test_continue_list_exits_top_level() {
        let text = "- a\n- ";
        let edit = continue_list(text, text.len()).unwrap();
        assert_eq!(apply_edits(text, &edit.edits), "- a\n");
        assert_eq!(edit.cursor, 4);
    }

    #[test]
    fn test_continue_list_outside_list() {
        assert_eq!(continue_list("plain", 5), None);
        assert_eq!(continue_list("-nospace", 8), None);
    }

    #[test]
    fn test_indent_and_outdent() {
        let text = "- a\n- b";
        let edit = indent_list_item(text, 7).unwrap();
        let indented = apply_edits(text, &edit.edits);
        assert_eq!(indented, "- a\n  - b");
        assert_eq!(edit.cursor, 9);

        let edit = outdent_list_item(&indented, 9).unwrap();
        assert_eq!(apply_edits(&indented, &edit.edits), text);
        assert_eq!(edit.cursor, 7);

        let flush = outdent_list_item(text, 3).unwrap();
        assert!(flush.edits.is_empty());
        assert_eq!(indent_list_item("text", 2), None);
    }

    #[test]
    fn test_bullet_markers() {
        let text = "- a\n  * b\n    - c\n      - d\n1. e\n---\n```\n- code\n```";
        let markers = bullet_markers(text);
        let summary: Vec<(usize, char, String)> = markers
            .iter()
            .map(|m| (m.level, m.symbol, m.class()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0, '●', "cm-bullet-list-l0".to_string()),
                (1, '○', "cm-bullet-list-l1".to_string()),
                (2, '■', "cm-bullet-list-l2".to_string()),
                (3, '□', "cm-bullet-list-l0".to_string()),
            ]
        );
        assert_eq!(markers[1].range, 4..8);
        assert_eq!(
            markers[1].html(),
            "<span class=\"cm-bullet-list cm-bullet-list-l1\">  ○ </span>"
        );
    }
}
