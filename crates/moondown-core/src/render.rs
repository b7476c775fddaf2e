//! Markdown to HTML for cell display.

use markdown_weaver::{Options, Parser, html};

/// Parser options used for table cells and widgets.
pub fn default_md_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_GFM
        | Options::ENABLE_STRIKETHROUGH
}

/// Render markdown source to HTML.
pub fn markdown_to_html(source: &str) -> String {
    let parser = Parser::new_ext(source, default_md_options());
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Render inline markdown (a table cell) without the paragraph wrapper.
pub fn render_inline(source: &str) -> String {
    let rendered = markdown_to_html(source);
    let trimmed = rendered.trim_end_matches('\n');
    match trimmed
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
    {
        // Only unwrap a single paragraph.
        Some(inner) if !inner.contains("<p>") => inner.to_string(),
        _ => trimmed.to_string(),
    }
}
