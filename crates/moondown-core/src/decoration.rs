//! Syntax-hiding decorations.
//!
//! Markdown markers (`**`, `` ` ``, `#`, `>`, link brackets) are hidden unless
//! the selection touches the construct they belong to, in which case they are
//! shown dimmed. Some constructs are replaced wholesale by a widget while the
//! selection is elsewhere.
//!
//! `==highlight==` has no parser support and is found by scanning text runs.

use std::ops::Range;

use markdown_weaver::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use markdown_weaver_escape::escape_html;

use crate::render::{default_md_options, markdown_to_html};

/// Rendered stand-in for a construct whose source is not being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockWidget {
    /// Whole blockquote lines, rendered as markdown.
    Blockquote { source: String },
    /// Fenced code block body.
    Code { language: String, content: String },
    Image { alt: String, src: String },
    /// Inline code, link text, strikethrough and highlight: a classed span
    /// of plain text.
    InlineContent { class: &'static str, text: String },
}

/// One decoration over a byte range of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoration {
    /// Marker hidden (`cm-hidden-markdown`).
    Hidden(Range<usize>),
    /// Marker shown dimmed (`cm-visible-markdown`).
    Visible(Range<usize>),
    /// Range replaced by a widget.
    Replace {
        range: Range<usize>,
        widget: BlockWidget,
    },
}

impl Decoration {
    pub fn range(&self) -> &Range<usize> {
        match self {
            Decoration::Hidden(range) | Decoration::Visible(range) => range,
            Decoration::Replace { range, .. } => range,
        }
    }

    /// CSS class for mark decorations.
    pub fn class(&self) -> Option<&'static str> {
        match self {
            Decoration::Hidden(_) => Some("cm-hidden-markdown"),
            Decoration::Visible(_) => Some("cm-visible-markdown"),
            Decoration::Replace { .. } => None,
        }
    }
}

/// HTML for a widget.
///
/// Image widgets render as a bare `<img>`; hosts that cache images build
/// their own element instead.
pub fn render_widget_html(widget: &BlockWidget) -> String {
    let mut out = String::new();
    match widget {
        BlockWidget::Blockquote { source } => {
            out.push_str("<div class=\"cm-blockquote-widget\">");
            out.push_str(&markdown_to_html(source));
            out.push_str("</div>");
        }
        BlockWidget::Code { language, content } => {
            out.push_str("<pre class=\"cm-blockcode-widget\">");
            if language.is_empty() {
                out.push_str("<code>");
            } else {
                out.push_str("<code class=\"language-");
                push_escaped(&mut out, language);
                out.push_str("\">");
            }
            push_escaped(&mut out, content);
            out.push_str("</code></pre>");
        }
        BlockWidget::Image { alt, src } => {
            out.push_str("<img class=\"cm-image-widget\" src=\"");
            push_escaped(&mut out, src);
            out.push_str("\" alt=\"");
            push_escaped(&mut out, alt);
            out.push_str("\">");
        }
        BlockWidget::InlineContent { class, text } => {
            out.push_str("<span class=\"");
            out.push_str(class);
            out.push_str("\">");
            push_escaped(&mut out, text);
            out.push_str("</span>");
        }
    }
    out
}

fn push_escaped(out: &mut String, text: &str) {
    if let Err(error) = escape_html(out, text) {
        tracing::warn!(target: "moondown::decoration", ?error, "html escape failed");
    }
}

/// Compute decorations for `source` given the selection byte range.
///
/// Results are ordered by range start. Nothing is emitted inside a range that
/// an enclosing construct already replaced.
pub fn syntax_decorations(source: &str, selection: Range<usize>) -> Vec<Decoration> {
    let mut builder = Builder {
        source,
        selection,
        out: Vec::new(),
        replaced_until: 0,
    };

    let mut in_code_block = false;
    for (event, range) in Parser::new_ext(source, default_md_options()).into_offset_iter() {
        if let Event::End(TagEnd::CodeBlock) = event {
            in_code_block = false;
        }
        if range.start < builder.replaced_until {
            continue;
        }
        match event {
            Event::Start(Tag::Emphasis) => builder.paired(range, 1),
            Event::Start(Tag::Strong) => builder.paired(range, 2),
            Event::Start(Tag::Strikethrough) => builder.strikethrough(range),
            Event::Start(Tag::Heading { level, .. }) => builder.heading(range, level as usize),
            Event::Start(Tag::BlockQuote(_)) => builder.blockquote(range),
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                if let CodeBlockKind::Fenced(lang) = kind {
                    builder.fenced_code(range, &lang)
                }
            }
            Event::Text(_) if !in_code_block => builder.highlights(range),
            Event::Start(Tag::Link { .. }) => builder.link(range),
            Event::Start(Tag::Image { dest_url, .. }) => builder.image(range, &dest_url),
            Event::Code(code) => builder.inline_code(range, &code),
            _ => {}
        }
    }

    let mut out = builder.out;
    out.sort_by_key(|d| (d.range().start, d.range().end));
    out
}

struct Builder<'a> {
    source: &'a str,
    selection: Range<usize>,
    out: Vec<Decoration>,
    replaced_until: usize,
}

impl Builder<'_> {
    fn selected(&self, range: &Range<usize>) -> bool {
        self.selection.start <= range.end && self.selection.end >= range.start
    }

    fn mark(&mut self, range: Range<usize>, visible: bool) {
        if range.is_empty() {
            return;
        }
        self.out.push(if visible {
            Decoration::Visible(range)
        } else {
            Decoration::Hidden(range)
        });
    }

    fn replace(&mut self, range: Range<usize>, widget: BlockWidget) {
        self.replaced_until = range.end;
        self.out.push(Decoration::Replace { range, widget });
    }

    /// Symmetric markers of `width` bytes at both ends.
    fn paired(&mut self, range: Range<usize>, width: usize) {
        if range.len() < width * 2 {
            return;
        }
        let visible = self.selected(&range);
        self.mark(range.start..range.start + width, visible);
        self.mark(range.end - width..range.end, visible);
    }

    /// Markers of `width` bytes at both ends. Away from the selection the
    /// whole construct becomes a `class` span of the inner text.
    fn wrapped(&mut self, range: Range<usize>, width: usize, class: &'static str) {
        if !self.selected(&range) {
            let text = self.source[range.start + width..range.end - width].to_string();
            self.replace(range, BlockWidget::InlineContent { class, text });
            return;
        }
        self.mark(range.start..range.start + width, true);
        self.mark(range.end - width..range.end, true);
    }

    /// `~text~` or `~~text~~`.
    fn strikethrough(&mut self, range: Range<usize>) {
        let tildes = self.source[range.clone()]
            .bytes()
            .take_while(|b| *b == b'~')
            .count();
        if tildes == 0 || range.len() < tildes * 2 {
            return;
        }
        self.wrapped(range, tildes, "cm-strikethrough-widget");
    }

    /// `==text==` spans inside one text run. The inner text must not start
    /// or end with whitespace.
    fn highlights(&mut self, range: Range<usize>) {
        let text = &self.source[range.clone()];
        let mut from = 0;
        while let Some(open) = text[from..].find("==").map(|i| from + i) {
            let body = open + 2;
            let Some(close) = text[body..].find("==").map(|i| body + i) else {
                break;
            };
            let inner = &text[body..close];
            if inner.is_empty()
                || inner.starts_with(|c: char| c.is_whitespace() || c == '=')
                || inner.ends_with(char::is_whitespace)
            {
                from = body;
                continue;
            }
            let start = range.start + open;
            self.wrapped(start..range.start + close + 2, 2, "cm-highlight-widget");
            from = close + 2;
        }
    }

    fn heading(&mut self, range: Range<usize>, level: usize) {
        // Setext headings have no leading marker; level six keeps its hashes.
        if level > 5 || !self.source[range.clone()].starts_with('#') {
            return;
        }
        let visible = self.selected(&range);
        let end = (range.start + level + 1).min(range.end);
        self.mark(range.start..end, visible);
    }

    fn blockquote(&mut self, range: Range<usize>) {
        let source = self.source;
        let range = self.line_range(range);
        if !self.selected(&range) {
            let quote = source[range.clone()].to_string();
            self.replace(range, BlockWidget::Blockquote { source: quote });
            return;
        }

        let mut offset = range.start;
        for line in source[range.clone()].split_inclusive('\n') {
            if let Some(idx) = line.find('>') {
                self.mark(offset + idx..offset + idx + 1, true);
            }
            offset += line.len();
        }
    }

    fn fenced_code(&mut self, range: Range<usize>, language: &str) {
        let source = self.source;
        let range = self.line_range(range);
        let block = &source[range.clone()];

        let open_end = block.find('\n').unwrap_or(block.len());
        let close_start = match block.rfind('\n') {
            Some(nl) if nl >= open_end && is_fence(&block[nl + 1..]) => nl + 1,
            _ => block.len(),
        };

        if !self.selected(&range) {
            let body_start = (open_end + 1).min(close_start);
            let content = block[body_start..close_start]
                .strip_suffix('\n')
                .unwrap_or(&block[body_start..close_start])
                .to_string();
            self.replace(
                range,
                BlockWidget::Code {
                    language: language.trim().to_string(),
                    content,
                },
            );
            return;
        }

        self.mark(range.start..range.start + open_end, true);
        if close_start < block.len() {
            self.mark(range.start + close_start..range.end, true);
        }
    }

    fn link(&mut self, range: Range<usize>) {
        let source = self.source;
        let text = &source[range.clone()];
        let Some((label, url)) = split_inline_link(text) else {
            return;
        };
        if !self.selected(&range) {
            let display = if label.is_empty() { url } else { label };
            self.replace(
                range,
                BlockWidget::InlineContent {
                    class: "cm-link-widget",
                    text: display.to_string(),
                },
            );
            return;
        }
        let label_end = range.start + 1 + label.len();
        self.mark(range.start..range.start + 1, true);
        self.mark(label_end..range.end, true);
    }

    fn image(&mut self, range: Range<usize>, dest_url: &str) {
        let source = self.source;
        let text = &source[range.clone()];
        let Some((alt, _)) = text.strip_prefix('!').and_then(split_inline_link) else {
            return;
        };
        if !self.selected(&range) {
            let widget = BlockWidget::Image {
                alt: alt.to_string(),
                src: dest_url.to_string(),
            };
            self.replace(range, widget);
            return;
        }
        self.mark(range.start..range.start + 2, true);
        self.mark(range.start + 2 + alt.len()..range.end, true);
    }

    fn inline_code(&mut self, range: Range<usize>, code: &str) {
        let ticks = self.source[range.clone()]
            .bytes()
            .take_while(|b| *b == b'`')
            .count();
        if ticks == 0 || range.len() < ticks * 2 {
            return;
        }
        if !self.selected(&range) {
            self.replace(
                range,
                BlockWidget::InlineContent {
                    class: "cm-inline-code-widget",
                    text: code.to_string(),
                },
            );
            return;
        }
        self.mark(range.start..range.start + ticks, true);
        self.mark(range.end - ticks..range.end, true);
    }

    /// Extend a range to whole lines, without the final newline.
    fn line_range(&self, range: Range<usize>) -> Range<usize> {
        let start = self.source[..range.start]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let end = self.source[..range.end.max(start)].trim_end_matches('\n').len();
        let end = match self.source[end..].find('\n') {
            Some(i) => end + i,
            None => self.source.len(),
        };
        start..end
    }
}

fn is_fence(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 3 && (line.bytes().all(|b| b == b'`') || line.bytes().all(|b| b == b'~'))
}

/// Split `[label](url)` into its parts. Reference links return `None`.
fn split_inline_link(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix('[')?;
    let close = rest.find("](")?;
    let url = rest[close + 2..].strip_suffix(')')?;
    Some((&rest[..close], url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden_text(source: &str, decorations: &[Decoration]) -> Vec<String> {
        decorations
            .iter()
            .filter_map(|d| match d {
                Decoration::Hidden(r) => Some(source[r.clone()].to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_strong_markers_hidden_away_from_selection() {
        let source = "x **bold** y";
        let decorations = syntax_decorations(source, 0..0);
        assert_eq!(hidden_text(source, &decorations), vec!["**", "**"]);
        assert_eq!(decorations[0], Decoration::Hidden(2..4));
    }

    #[test]
    fn test_markers_visible_when_selected() {
        let source = "x *it* y";
        let decorations = syntax_decorations(source, 4..4);
        assert_eq!(
            decorations,
            vec![Decoration::Visible(2..3), Decoration::Visible(5..6)]
        );
    }

    #[test]
    fn test_heading_marker() {
        let source = "## Title\n\nbody";
        assert_eq!(
            syntax_decorations(source, 12..12),
            vec![Decoration::Hidden(0..3)]
        );
        assert_eq!(
            syntax_decorations("#### Deep\n\nbody", 13..13),
            vec![Decoration::Hidden(0..5)]
        );
        assert_eq!(
            syntax_decorations("##### Deeper\n\nbody", 16..16),
            vec![Decoration::Hidden(0..6)]
        );
        assert!(syntax_decorations("###### Deepest\n\nbody", 18..18).is_empty());
    }

    #[test]
    fn test_strikethrough_marker_width() {
        let source = "a ~ab~ b ~~cd~~";
        let replaced = syntax_decorations(source, 0..0);
        assert_eq!(
            replaced,
            vec![
                Decoration::Replace {
                    range: 2..6,
                    widget: BlockWidget::InlineContent {
                        class: "cm-strikethrough-widget",
                        text: "ab".into(),
                    },
                },
                Decoration::Replace {
                    range: 9..15,
                    widget: BlockWidget::InlineContent {
                        class: "cm-strikethrough-widget",
                        text: "cd".into(),
                    },
                },
            ]
        );

        let shown = syntax_decorations("~ab~", 1..1);
        assert_eq!(
            shown,
            vec![Decoration::Visible(0..1), Decoration::Visible(3..4)]
        );
    }

    #[test]
    fn test_highlight() {
        let source = "a ==marked== b";
        assert_eq!(
            syntax_decorations(source, 0..0),
            vec![Decoration::Replace {
                range: 2..12,
                widget: BlockWidget::InlineContent {
                    class: "cm-highlight-widget",
                    text: "marked".into(),
                },
            }]
        );
        assert_eq!(
            syntax_decorations(source, 5..5),
            vec![Decoration::Visible(2..4), Decoration::Visible(10..12)]
        );
        assert!(syntax_decorations("a == b == c", 0..0).is_empty());

        let in_code = syntax_decorations("```\n==x==\n```", 5..5);
        let marked: Vec<&str> = in_code
            .iter()
            .map(|d| &"```\n==x==\n```"[d.range().clone()])
            .collect();
        assert_eq!(marked, vec!["```", "```"]);
    }

    #[test]
    fn test_inline_code_replaced() {
        let source = "a `code` b";
        let decorations = syntax_decorations(source, 0..0);
        assert_eq!(
            decorations,
            vec![Decoration::Replace {
                range: 2..8,
                widget: BlockWidget::InlineContent {
                    class: "cm-inline-code-widget",
                    text: "code".into(),
                },
            }]
        );
    }

    #[test]
    fn test_link_widget_and_markers() {
        let source = "see [docs](https://example.com) now";
        let replaced = syntax_decorations(source, 0..0);
        assert!(matches!(
            &replaced[0],
            Decoration::Replace {
                widget: BlockWidget::InlineContent { class: "cm-link-widget", text },
                ..
            } if text == "docs"
        ));

        let shown = syntax_decorations(source, 6..6);
        let marked: Vec<&str> = shown.iter().map(|d| &source[d.range().clone()]).collect();
        assert_eq!(marked, vec!["[", "](https://example.com)"]);
    }

    #[test]
    fn test_image_widget() {
        let source = "![cat](cat.png)";
        let decorations = syntax_decorations(source, 20..20);
        assert_eq!(
            decorations,
            vec![Decoration::Replace {
                range: 0..15,
                widget: BlockWidget::Image {
                    alt: "cat".into(),
                    src: "cat.png".into(),
                },
            }]
        );
    }

    #[test]
    fn test_fenced_code() {
        let source = "intro\n\n```rust\nfn main() {}\n```\n\nafter";
        let decorations = syntax_decorations(source, 0..0);
        assert_eq!(
            decorations,
            vec![Decoration::Replace {
                range: 7..31,
                widget: BlockWidget::Code {
                    language: "rust".into(),
                    content: "fn main() {}".into(),
                },
            }]
        );

        let shown = syntax_decorations(source, 20..20);
        let marked: Vec<&str> = shown.iter().map(|d| &source[d.range().clone()]).collect();
        assert_eq!(marked, vec!["```rust", "```"]);
    }

    #[test]
    fn test_blockquote() {
        let source = "> one **b**\n> two\n\nafter";
        let decorations = syntax_decorations(source, 24..24);
        assert_eq!(decorations.len(), 1);
        assert!(matches!(
            &decorations[0],
            Decoration::Replace { range, widget: BlockWidget::Blockquote { source } }
                if *range == (0..17) && source == "> one **b**\n> two"
        ));

        let shown = syntax_decorations(source, 3..3);
        let markers: Vec<_> = shown
            .iter()
            .filter(|d| &source[d.range().clone()] == ">")
            .collect();
        assert_eq!(markers.len(), 2);
    }

    #[test]
    fn test_render_widget_html() {
        assert_eq!(
            render_widget_html(&BlockWidget::InlineContent {
                class: "cm-link-widget",
                text: "a<b".into(),
            }),
            "<span class=\"cm-link-widget\">a&lt;b</span>"
        );
        assert_eq!(
            render_widget_html(&BlockWidget::Code {
                language: "rust".into(),
                content: "x < 1".into(),
            }),
            "<pre class=\"cm-blockcode-widget\"><code class=\"language-rust\">x &lt; 1</code></pre>"
        );
        assert_eq!(
            render_widget_html(&BlockWidget::Image {
                alt: "a \"b\"".into(),
                src: "x.png".into(),
            }),
            "<img class=\"cm-image-widget\" src=\"x.png\" alt=\"a &quot;b&quot;\">"
        );
    }
}
