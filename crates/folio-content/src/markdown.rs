//! Markdown body rendering.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::slug::slugify;

/// A rendered entry body.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBody {
    /// HTML with anchor ids on every heading
    pub html: String,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Render a markdown body to HTML.
///
/// Top-level `import`/`export` lines are dropped so MDX bodies render as
/// plain markdown. Headings get ids matching their TOC entries.
pub fn render_markdown(body: &str) -> RenderedBody {
    let source = strip_module_lines(body);
    let toc = collect_toc(&source);

    let mut headings = toc.iter();
    let events = Parser::new_ext(&source, options()).map(|event| match event {
        Event::Start(Tag::Heading {
            level,
            id: None,
            classes,
            attrs,
        }) => {
            let id = headings.next().map(|entry| CowStr::from(entry.id.clone()));
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            })
        }
        Event::Start(Tag::Heading { .. }) => {
            headings.next();
            event
        }
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events);

    RenderedBody { html: out, toc }
}

fn collect_toc(source: &str) -> Vec<TocEntry> {
    let mut toc = Vec::new();
    let mut current: Option<(u8, Option<String>, String)> = None;

    for event in Parser::new_ext(source, options()) {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                current = Some((level as u8, id.map(|i| i.to_string()), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, ref mut title)) = current {
                    title.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, explicit, title)) = current.take() {
                    let id = explicit.unwrap_or_else(|| slugify(&title));
                    toc.push(TocEntry { title, id, level });
                }
            }
            _ => {}
        }
    }

    toc
}

fn strip_module_lines(body: &str) -> String {
    let mut in_fence = false;
    body.lines()
        .filter(|line| {
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
                return true;
            }
            in_fence || !(line.starts_with("import ") || line.starts_with("export "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_headings_with_ids() {
        let rendered = render_markdown("# Shipping\n\nText.\n\n## The `build` step\n");

        assert!(rendered.html.contains(r#"<h1 id="shipping">Shipping</h1>"#));
        assert!(rendered.html.contains(r#"<h2 id="the-build-step">"#));
        assert_eq!(
            rendered.toc,
            vec![
                TocEntry {
                    title: "Shipping".to_string(),
                    id: "shipping".to_string(),
                    level: 1,
                },
                TocEntry {
                    title: "The build step".to_string(),
                    id: "the-build-step".to_string(),
                    level: 2,
                },
            ]
        );
    }

    #[test]
    fn drops_module_lines_outside_code() {
        let body = "import Chart from './chart'\n\nHello\n\n```js\nimport x from 'y'\n```\n";

        let rendered = render_markdown(body);

        assert!(!rendered.html.contains("./chart"));
        assert!(rendered.html.contains("import x from"));
        assert!(rendered.html.contains("<p>Hello</p>"));
    }

    #[test]
    fn renders_tables() {
        let rendered = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(rendered.html.contains("<table>"));
    }
}
