//! Markdown page parser.

use std::collections::HashMap;

use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};

use crate::codeblock::CodeBlock;
use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
use crate::links::LinkOptions;

/// A parsed and rendered page.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Rendered HTML body
    pub html: String,

    /// Text of the first level-1 heading
    pub title: Option<String>,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,

    /// Plain text of the page, without code blocks
    pub text: String,
}

impl ParsedDoc {
    /// Frontmatter title, then first heading.
    pub fn page_title(&self) -> Option<&str> {
        self.frontmatter
            .as_ref()
            .and_then(|f| f.title.as_deref())
            .or(self.title.as_deref())
    }
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing a page.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Parse and render a markdown page.
///
/// Headings get stable anchor ids, fenced code blocks are labelled and
/// internal links are rewritten under the base path.
pub fn parse_page(source: &str, links: &LinkOptions) -> Result<ParsedDoc, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;

    let events: Vec<Event> = Parser::new_ext(content, options).collect();

    let mut output: Vec<Event> = Vec::with_capacity(events.len());
    let mut toc = Vec::new();
    let mut title = None;
    let mut text = String::new();
    let mut slugs = SlugCounter::default();

    let mut i = 0;
    while i < events.len() {
        match &events[i] {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let heading_text = collect_text(&events[i + 1..]);
                let anchor = match id {
                    Some(id) => slugs.claim(id),
                    None => slugs.claim(&slugify(&heading_text)),
                };
                if *level == HeadingLevel::H1 && title.is_none() {
                    title = Some(heading_text.clone());
                }
                toc.push(TocEntry {
                    title: heading_text,
                    id: anchor.clone(),
                    level: *level as u8,
                });

                output.push(Event::Start(Tag::Heading {
                    level: *level,
                    id: Some(CowStr::from(anchor.clone())),
                    classes: classes.clone(),
                    attrs: attrs.clone(),
                }));
                output.push(Event::InlineHtml(CowStr::from(format!(
                    "<a class=\"header-anchor\" href=\"#{}\" aria-hidden=\"true\">#</a>",
                    anchor
                ))));
            }

            Event::Start(Tag::CodeBlock(kind)) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };

                let mut code = String::new();
                i += 1;
                while i < events.len() {
                    match &events[i] {
                        Event::End(TagEnd::CodeBlock) => break,
                        Event::Text(t) => code.push_str(t),
                        _ => {}
                    }
                    i += 1;
                }

                output.push(Event::Html(CowStr::from(CodeBlock::new(&info, code).to_html())));
            }

            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title: link_title,
                id,
            }) => {
                output.push(Event::Start(Tag::Link {
                    link_type: *link_type,
                    dest_url: CowStr::from(links.rewrite(dest_url)),
                    title: link_title.clone(),
                    id: id.clone(),
                }));
            }

            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title: image_title,
                id,
            }) => {
                output.push(Event::Start(Tag::Image {
                    link_type: *link_type,
                    dest_url: CowStr::from(links.rewrite(dest_url)),
                    title: image_title.clone(),
                    id: id.clone(),
                }));
            }

            Event::Text(t) | Event::Code(t) => {
                if !text.is_empty() && !text.ends_with(' ') {
                    text.push(' ');
                }
                text.push_str(t.trim());
                output.push(events[i].clone());
            }

            other => output.push(other.clone()),
        }
        i += 1;
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, output.into_iter());

    Ok(ParsedDoc {
        frontmatter,
        content: content.to_string(),
        html: html_output,
        title,
        toc,
        text,
    })
}

/// Text of the events up to the end of the current heading.
fn collect_text(events: &[Event]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text.trim().to_string()
}

/// Hands out unique anchor ids: `arrays`, `arrays-1`, `arrays-2`.
#[derive(Default)]
struct SlugCounter {
    seen: HashMap<String, usize>,
}

impl SlugCounter {
    fn claim(&mut self, slug: &str) -> String {
        let count = self.seen.entry(slug.to_string()).or_insert(0);
        let id = if *count == 0 {
            slug.to_string()
        } else {
            format!("{}-{}", slug, count)
        };
        *count += 1;
        id
    }
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParsedDoc {
        parse_page(source, &LinkOptions::new("/SwiftVsTypeScript/", true)).unwrap()
    }

    #[test]
    fn parses_complete_page() {
        let source = r#"---
title: Arrays
description: Working with arrays
---

# Arrays

Both languages have growable arrays.

```swift
var xs = [1, 2, 3]
```

## Appending

```ts [append.ts]
xs.push(4);
```
"#;

        let doc = parse(source);

        let fm = doc.frontmatter.as_ref().unwrap();
        assert_eq!(fm.title.as_deref(), Some("Arrays"));
        assert_eq!(doc.title.as_deref(), Some("Arrays"));
        assert_eq!(doc.page_title(), Some("Arrays"));

        assert_eq!(doc.toc.len(), 2);
        assert_eq!(doc.toc[0].id, "arrays");
        assert_eq!(doc.toc[0].level, 1);
        assert_eq!(doc.toc[1].title, "Appending");
        assert_eq!(doc.toc[1].level, 2);

        assert!(doc.html.contains("<h1 id=\"arrays\">"));
        assert!(doc.html.contains("<h2 id=\"appending\">"));
        assert!(doc.html.contains("<span class=\"lang\">Swift</span>"));
        assert!(doc.html.contains("<div class=\"code-title\">append.ts</div>"));
        assert!(doc.text.contains("Both languages have growable arrays."));
        assert!(!doc.text.contains("var xs"));
    }

    #[test]
    fn parses_without_frontmatter() {
        let doc = parse("# Just Markdown\n\nNo frontmatter.");

        assert!(doc.frontmatter.is_none());
        assert_eq!(doc.page_title(), Some("Just Markdown"));
        assert_eq!(doc.toc.len(), 1);
    }

    #[test]
    fn frontmatter_title_wins() {
        let doc = parse("---\ntitle: Objects\n---\n# Objects and Structs\n");

        assert_eq!(doc.page_title(), Some("Objects"));
        assert_eq!(doc.title.as_deref(), Some("Objects and Structs"));
    }

    #[test]
    fn deduplicates_anchor_ids() {
        let doc = parse("## Swift\n\n## TypeScript\n\n## Swift\n");

        let ids: Vec<_> = doc.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["swift", "typescript", "swift-1"]);
    }

    #[test]
    fn honors_custom_heading_ids() {
        let doc = parse("## Maps and Dictionaries {#maps}\n");

        assert_eq!(doc.toc[0].id, "maps");
        assert_eq!(doc.toc[0].title, "Maps and Dictionaries");
        assert!(doc.html.contains("id=\"maps\""));
    }

    #[test]
    fn rewrites_links_under_base() {
        let doc = parse("See [objects](/objects) and [Swift](https://swift.org) or [next](./arrays.md).");

        assert!(doc.html.contains("href=\"/SwiftVsTypeScript/objects\""));
        assert!(doc.html.contains("href=\"https://swift.org\""));
        assert!(doc.html.contains("href=\"./arrays\""));
    }

    #[test]
    fn rewrites_image_sources() {
        let doc = parse("![logo](/logo.svg)");

        assert!(doc.html.contains("src=\"/SwiftVsTypeScript/logo.svg\""));
    }

    #[test]
    fn reports_bad_frontmatter() {
        let result = parse_page("---\ntitle: [oops\n---\n", &LinkOptions::default());

        assert!(matches!(result, Err(ParseError::Frontmatter(_))));
    }

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Optional Chaining (?.)"), "optional-chaining");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }
}
