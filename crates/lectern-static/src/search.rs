//! Local search index.

use serde::Serialize;

use lectern_markdown::ParsedDoc;

/// Longest page text stored per entry, in characters.
const MAX_TEXT: usize = 2000;

/// One page in `search-index.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEntry {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub headings: Vec<String>,
    pub text: String,
}

impl SearchEntry {
    pub fn new(doc: &ParsedDoc, title: &str, url: String) -> Self {
        Self {
            title: title.to_string(),
            url,
            description: doc.frontmatter.as_ref().and_then(|f| f.description.clone()),
            headings: doc
                .toc
                .iter()
                .filter(|e| e.level > 1)
                .map(|e| e.title.clone())
                .collect(),
            text: doc.text.chars().take(MAX_TEXT).collect(),
        }
    }
}

/// Serialize the index.
pub fn render_index(entries: &[SearchEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string(entries)
}
