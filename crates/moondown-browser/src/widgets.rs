//! Decoration widgets as DOM nodes.

use std::cell::RefCell;
use std::collections::HashMap;

use gloo_events::EventListener;
use moondown_core::TableError;
use moondown_core::decoration::{BlockWidget, render_widget_html};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlImageElement};

use crate::dom_err;

/// Shown in place of an image that failed to load.
pub const BROKEN_IMAGE_SRC: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' \
    width='24' height='24' viewBox='0 0 24 24' fill='none' stroke='%23999' stroke-width='2'%3E\
    %3Crect x='3' y='3' width='18' height='18' rx='2'/%3E%3Cpath d='m3 3 18 18'/%3E%3C/svg%3E";

thread_local! {
    /// Loaded (or failed) images by source URL.
    static IMAGE_CACHE: RefCell<HashMap<String, HtmlImageElement>> = RefCell::new(HashMap::new());
}

/// Whether an image for `src` has finished loading, successfully or not.
pub fn is_image_cached(src: &str) -> bool {
    IMAGE_CACHE.with(|cache| cache.borrow().contains_key(src))
}

/// Drop every cached image.
pub fn clear_image_cache() {
    IMAGE_CACHE.with(|cache| cache.borrow_mut().clear());
}

/// Build the DOM node for a widget.
pub fn widget_to_dom(document: &Document, widget: &BlockWidget) -> Result<Element, TableError> {
    match widget {
        BlockWidget::Image { alt, src } => image_widget(document, alt, src),
        other => {
            let wrap = document
                .create_element("div")
                .map_err(|e| dom_err("create_element", e))?;
            wrap.set_inner_html(&render_widget_html(other));
            // Unwrap the single rendered element.
            Ok(wrap.first_element_child().unwrap_or(wrap))
        }
    }
}

fn image_widget(document: &Document, alt: &str, src: &str) -> Result<Element, TableError> {
    let wrap = document
        .create_element("div")
        .map_err(|e| dom_err("create_element", e))?;
    wrap.set_class_name("cm-image-widget");

    let image = match IMAGE_CACHE.with(|cache| cache.borrow().get(src).cloned()) {
        Some(cached) => cached
            .clone_node()
            .map_err(|e| dom_err("clone_node", e))?
            .unchecked_into::<HtmlImageElement>(),
        None => load_image(document, alt, src)?,
    };
    wrap.append_child(&image)
        .map_err(|e| dom_err("append_child", e))?;

    if !alt.is_empty() {
        let caption = document
            .create_element("div")
            .map_err(|e| dom_err("create_element", e))?;
        caption.set_class_name("cm-image-caption");
        caption.set_text_content(Some(alt));
        wrap.append_child(&caption)
            .map_err(|e| dom_err("append_child", e))?;
    }
    Ok(wrap)
}

fn load_image(document: &Document, alt: &str, src: &str) -> Result<HtmlImageElement, TableError> {
    let image = document
        .create_element("img")
        .map_err(|e| dom_err("create_element", e))?
        .dyn_into::<HtmlImageElement>()
        .map_err(|_| TableError::Platform("created element is not an image".into()))?;
    image.set_alt(alt);

    let on_load = {
        let image = image.clone();
        let src = src.to_owned();
        move |_: &Event| {
            IMAGE_CACHE.with(|cache| cache.borrow_mut().insert(src, image));
        }
    };
    let on_error = {
        let image = image.clone();
        let src = src.to_owned();
        move |_: &Event| {
            tracing::error!(target: "moondown::widgets", %src, "failed to load image");
            image.set_src(BROKEN_IMAGE_SRC);
            image.set_alt("Failed to load image");
            IMAGE_CACHE.with(|cache| cache.borrow_mut().insert(src, image));
        }
    };
    EventListener::once(&image, "load", on_load).forget();
    EventListener::once(&image, "error", on_error).forget();

    image.set_src(src);
    Ok(image)
}
