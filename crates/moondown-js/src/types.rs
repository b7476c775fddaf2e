//! Types exposed to JavaScript via wasm-bindgen.
//!
//! Offsets crossing the boundary are UTF-16 code units, as JS strings count
//! them; core works in byte offsets.

use moondown_core::table::{NotificationKind, TableNotification};
use moondown_core::{BulletMarker, Decoration, TextEdit, render_widget_html};
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// Byte offset to UTF-16 offset. Offsets inside a character round down.
pub(crate) fn byte_to_utf16(text: &str, byte: usize) -> usize {
    let mut byte = byte.min(text.len());
    while !text.is_char_boundary(byte) {
        byte -= 1;
    }
    text[..byte].encode_utf16().count()
}

/// UTF-16 offset to byte offset, clamped to the text.
pub(crate) fn utf16_to_byte(text: &str, utf16: usize) -> usize {
    let mut seen = 0;
    for (byte, ch) in text.char_indices() {
        if seen >= utf16 {
            return byte;
        }
        seen += ch.len_utf16();
    }
    text.len()
}

/// Cell coordinate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct JsCellPos {
    pub row: usize,
    pub col: usize,
}

/// Payload passed to `onChange`, `onBlur`, `onCellChange` and `saveIntent`.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsTableNotification {
    /// One of `change`, `blur`, `cellChange`, `saveIntent`.
    pub kind: String,
    pub markdown: String,
    pub cursor: JsCellPos,
    pub is_clean: bool,
}

impl From<&TableNotification> for JsTableNotification {
    fn from(n: &TableNotification) -> Self {
        let kind = match n.kind {
            NotificationKind::Change => "change",
            NotificationKind::Blur => "blur",
            NotificationKind::CellChange => "cellChange",
            NotificationKind::SaveIntent => "saveIntent",
        };
        Self {
            kind: kind.to_string(),
            markdown: n.markdown.clone(),
            cursor: JsCellPos {
                row: n.cursor.row,
                col: n.cursor.col,
            },
            is_clean: n.clean,
        }
    }
}

/// A replacement of `from..to` with `insert`.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct JsTextEdit {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl JsTextEdit {
    pub(crate) fn from_core(text: &str, edit: &TextEdit) -> Self {
        Self {
            from: byte_to_utf16(text, edit.range.start),
            to: byte_to_utf16(text, edit.range.end),
            insert: edit.insert.clone(),
        }
    }
}

/// Edits for a list keystroke plus where the caret ends up.
///
/// `cursor` is measured in the text after the edits are applied.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct JsListEdit {
    pub edits: Vec<JsTextEdit>,
    pub cursor: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsBulletMarker {
    pub from: usize,
    pub to: usize,
    pub level: usize,
    pub symbol: String,
    pub class_name: String,
    pub html: String,
}

impl JsBulletMarker {
    pub(crate) fn from_core(text: &str, marker: &BulletMarker) -> Self {
        Self {
            from: byte_to_utf16(text, marker.range.start),
            to: byte_to_utf16(text, marker.range.end),
            level: marker.level,
            symbol: marker.symbol.to_string(),
            class_name: marker.class(),
            html: marker.html(),
        }
    }
}

/// A decoration: a mark (`hidden`/`visible`) or a widget (`replace`).
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsDecoration {
    pub kind: String,
    pub from: usize,
    pub to: usize,
    #[tsify(optional)]
    pub class_name: Option<String>,
    /// Widget HTML for `replace` decorations.
    #[tsify(optional)]
    pub html: Option<String>,
}

impl JsDecoration {
    pub(crate) fn from_core(text: &str, decoration: &Decoration) -> Self {
        let range = decoration.range();
        let (kind, html) = match decoration {
            Decoration::Hidden(_) => ("hidden", None),
            Decoration::Visible(_) => ("visible", None),
            Decoration::Replace { widget, .. } => ("replace", Some(render_widget_html(widget))),
        };
        Self {
            kind: kind.to_string(),
            from: byte_to_utf16(text, range.start),
            to: byte_to_utf16(text, range.end),
            class_name: decoration.class().map(str::to_string),
            html,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_convert_across_multibyte_text() {
        let text = "é😀x";
        assert_eq!(byte_to_utf16(text, 0), 0);
        assert_eq!(byte_to_utf16(text, 2), 1);
        assert_eq!(byte_to_utf16(text, 6), 3);
        assert_eq!(byte_to_utf16(text, 7), 4);
        assert_eq!(utf16_to_byte(text, 1), 2);
        assert_eq!(utf16_to_byte(text, 3), 6);
        assert_eq!(utf16_to_byte(text, 99), 7);
    }

    #[test]
    fn offsets_inside_a_character_round_down() {
        assert_eq!(byte_to_utf16("é", 1), 0);
    }
}
