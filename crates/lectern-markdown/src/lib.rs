//! Markdown page parser for lectern.
//!
//! Splits off YAML frontmatter, renders the body to HTML with labelled code
//! blocks and anchored headings, collects the outline and rewrites internal
//! links under the site base path.

pub mod codeblock;
pub mod frontmatter;
pub mod links;
pub mod parser;

pub use codeblock::{CodeBlock, Language};
pub use frontmatter::{Frontmatter, PageLayout};
pub use links::LinkOptions;
pub use parser::{parse_page, slugify, ParseError, ParsedDoc, TocEntry};
