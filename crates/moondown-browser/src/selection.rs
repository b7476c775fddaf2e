//! Caret placement inside an editable cell.
//!
//! DOM offsets are UTF-16 code units; [`CellSelection`] ranges are chars.

use moondown_core::TableError;
use moondown_core::table::CellSelection;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, Node};

use crate::dom_err;

/// UTF-16 offset of the `chars`-th character of `text`.
pub fn char_to_utf16(text: &str, chars: usize) -> usize {
    text.chars().take(chars).map(char::len_utf16).sum()
}

/// Find the text node holding a UTF-16 offset within `container`.
///
/// Content under `contenteditable="false"` is skipped. Offsets past the end
/// land at the end of the last text node.
pub fn find_text_node_at_offset(
    container: &HtmlElement,
    target: usize,
) -> Result<Option<(Node, usize)>, TableError> {
    let walker = gloo_utils::document()
        .create_tree_walker_with_what_to_show(container, 0xFFFF_FFFF)
        .map_err(|e| dom_err("create_tree_walker", e))?;

    let mut accumulated = 0;
    let mut last: Option<(Node, usize)> = None;
    let mut skip_until_exit: Option<Element> = None;

    while let Ok(Some(node)) = walker.next_node() {
        if let Some(skip) = &skip_until_exit {
            if skip.contains(Some(&node)) {
                continue;
            }
            skip_until_exit = None;
        }
        if let Some(element) = node.dyn_ref::<Element>() {
            if element.get_attribute("contenteditable").as_deref() == Some("false") {
                skip_until_exit = Some(element.clone());
            }
            continue;
        }
        if node.node_type() != Node::TEXT_NODE {
            continue;
        }

        let len = node
            .text_content()
            .map(|t| t.encode_utf16().count())
            .unwrap_or(0);
        if accumulated + len >= target {
            return Ok(Some((node, target - accumulated)));
        }
        accumulated += len;
        last = Some((node, len));
    }

    Ok(last)
}

/// Select `selection` within `cell`.
///
/// The cell should already have focus; an empty cell gets a collapsed caret
/// at its start.
pub fn select_cell_contents(cell: &HtmlElement, selection: CellSelection) -> Result<(), TableError> {
    let text = cell.text_content().unwrap_or_default();
    let (from, to) = selection.resolve(text.chars().count());
    let (from, to) = (char_to_utf16(&text, from), char_to_utf16(&text, to));

    let document = gloo_utils::document();
    let range = document
        .create_range()
        .map_err(|e| dom_err("create_range", e))?;

    let start = find_text_node_at_offset(cell, from)?;
    let end = find_text_node_at_offset(cell, to)?;
    match (start, end) {
        (Some((start_node, start_offset)), Some((end_node, end_offset))) => {
            range
                .set_start(&start_node, start_offset as u32)
                .map_err(|e| dom_err("range.set_start", e))?;
            range
                .set_end(&end_node, end_offset as u32)
                .map_err(|e| dom_err("range.set_end", e))?;
        }
        _ => {
            let node: &Node = cell.unchecked_ref();
            range
                .set_start(node, 0)
                .map_err(|e| dom_err("range.set_start", e))?;
            range.collapse_with_to_start(true);
        }
    }

    let window = gloo_utils::window();
    let dom_selection = window
        .get_selection()
        .map_err(|e| dom_err("get_selection", e))?
        .ok_or_else(|| TableError::Platform("no selection object".into()))?;
    dom_selection
        .remove_all_ranges()
        .map_err(|e| dom_err("remove_all_ranges", e))?;
    dom_selection
        .add_range(&range)
        .map_err(|e| dom_err("add_range", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::char_to_utf16;

    #[test]
    fn utf16_offsets_count_surrogate_pairs() {
        assert_eq!(char_to_utf16("abc", 2), 2);
        assert_eq!(char_to_utf16("a😀b", 2), 3);
        assert_eq!(char_to_utf16("a😀b", 10), 4);
    }
}
