//! Frontmatter extraction and parsing.

use serde::Deserialize;

/// Parsed frontmatter from a markdown page.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Frontmatter {
    /// Page title; falls back to the first `#` heading
    pub title: Option<String>,

    /// Page description for the `description` meta tag
    pub description: Option<String>,

    /// Page layout
    pub layout: PageLayout,

    /// Show the sidebar
    pub sidebar: bool,

    /// Show the "on this page" outline
    pub outline: bool,

    /// Show the "edit this page" link
    pub edit_link: bool,
}

impl Default for Frontmatter {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            layout: PageLayout::Doc,
            sidebar: true,
            outline: true,
            edit_link: true,
        }
    }
}

/// How a page is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLayout {
    /// Sidebar, content, outline and doc footer
    #[default]
    Doc,
    /// Content only, no sidebar or outline
    Page,
    /// Landing page, no sidebar
    Home,
}

/// Extract frontmatter from a page.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    let frontmatter = if yaml_content.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}
