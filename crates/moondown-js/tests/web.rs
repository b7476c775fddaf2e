//! WASM browser tests for the JavaScript bindings.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use moondown_js::JsTableEditor as TableEditor;

fn ok<T>(result: Result<T, JsError>) -> T {
    result.unwrap_or_else(|e| panic!("{:?}", JsValue::from(e)))
}

/// Call a zero-argument method by its JavaScript name.
fn call_method(target: &JsValue, name: &str) -> JsValue {
    Reflect::get(target, &JsValue::from_str(name))
        .unwrap()
        .dyn_into::<Function>()
        .unwrap()
        .call0(target)
        .unwrap()
}

#[wasm_bindgen_test]
fn test_on_change_receives_the_editor() {
    let seen: Rc<RefCell<Vec<(String, String)>>> = Default::default();
    let on_change = Closure::<dyn FnMut(JsValue, JsValue)>::new({
        let seen = seen.clone();
        move |editor: JsValue, notification: JsValue| {
            let markdown = call_method(&editor, "getMarkdownTable").as_string().unwrap();
            let kind = Reflect::get(&notification, &JsValue::from_str("kind"))
                .unwrap()
                .as_string()
                .unwrap();
            seen.borrow_mut().push((markdown, kind));
        }
    });
    let options = Object::new();
    Reflect::set(&options, &JsValue::from_str("onChange"), on_change.as_ref()).unwrap();

    let editor = ok(TableEditor::from_markdown("| a |\n| --- |\n| b |", options.into()));
    ok(editor.append_row());

    assert_eq!(
        seen.borrow().as_slice(),
        [("| a |\n| --- |\n|  |\n| b |".to_string(), "change".to_string())]
    );

    editor.destroy();
}

#[wasm_bindgen_test]
fn test_from_markdown_ignores_trailing_text() {
    let editor = ok(TableEditor::from_markdown(
        "| a | b |\n| :---: | --- |\n| 1 | 2 |\n\nAfter the table.",
        JsValue::UNDEFINED,
    ));
    assert_eq!(ok(editor.rows()), 2);
    assert_eq!(ok(editor.cols()), 2);
    assert_eq!(
        ok(editor.get_markdown_table()),
        "| a | b |\n| :---: | --- |\n| 1 | 2 |"
    );
    editor.destroy();
}
