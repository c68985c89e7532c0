//! Fenced code block labelling and rendering.

/// Language of a fenced code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    Swift,
    TypeScript,
    JavaScript,
    Json,
    Shell,
    Html,
    Css,
    Toml,
    Rust,
    #[default]
    Unknown,
}

impl Language {
    /// Parse language from code fence info string.
    pub fn from_info(info: &str) -> Self {
        let lang = info.split_whitespace().next().unwrap_or("");
        match lang.to_lowercase().as_str() {
            "swift" => Self::Swift,
            "ts" | "typescript" | "tsx" => Self::TypeScript,
            "js" | "javascript" | "jsx" => Self::JavaScript,
            "json" => Self::Json,
            "bash" | "sh" | "shell" | "zsh" => Self::Shell,
            "html" => Self::Html,
            "css" => Self::Css,
            "toml" => Self::Toml,
            "rust" | "rs" => Self::Rust,
            _ => Self::Unknown,
        }
    }

    /// Label shown in the corner of the block.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Swift => Some("Swift"),
            Self::TypeScript => Some("TypeScript"),
            Self::JavaScript => Some("JavaScript"),
            Self::Json => Some("JSON"),
            Self::Shell => Some("Shell"),
            Self::Html => Some("HTML"),
            Self::Css => Some("CSS"),
            Self::Toml => Some("TOML"),
            Self::Rust => Some("Rust"),
            Self::Unknown => None,
        }
    }
}

/// A fenced code block from a page.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// First word of the info string, as written
    pub lang: String,

    pub language: Language,

    /// Title from a `[title]` suffix in the info string
    pub title: Option<String>,

    pub source: String,
}

impl CodeBlock {
    pub fn new(info: &str, source: String) -> Self {
        Self {
            lang: info.split_whitespace().next().unwrap_or("").to_lowercase(),
            language: Language::from_info(info),
            title: extract_title(info),
            source,
        }
    }

    /// Render the block as HTML.
    pub fn to_html(&self) -> String {
        let class_lang = if self.lang.is_empty() {
            "text"
        } else {
            self.lang.as_str()
        };
        let class_lang = html_escape::encode_double_quoted_attribute(class_lang);

        let mut html = format!("<div class=\"code-block language-{}\">", class_lang);

        if let Some(title) = &self.title {
            html.push_str(&format!(
                "<div class=\"code-title\">{}</div>",
                html_escape::encode_text(title)
            ));
        }

        if let Some(label) = self.language.label() {
            html.push_str(&format!("<span class=\"lang\">{}</span>", label));
        }

        html.push_str(&format!(
            "<pre><code class=\"language-{}\">{}</code></pre></div>\n",
            class_lang,
            html_escape::encode_text(&self.source)
        ));

        html
    }
}

/// Extract a title from a code fence info string.
///
/// Supports `swift [Arrays.swift]`.
pub fn extract_title(info: &str) -> Option<String> {
    let start = info.find('[')?;
    let rest = &info[start + 1..];
    let end = rest.find(']')?;
    let title = rest[..end].trim();

    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}
