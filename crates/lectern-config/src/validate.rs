//! Structural and filesystem checks for a site configuration.

use std::path::Path;

use crate::diagnostics::Diagnostics;
use crate::link::resolve_page;
use crate::schema::{EditLink, NavItem, SiteConfig};

impl SiteConfig {
    /// Check the configuration against the project tree rooted at `root`.
    ///
    /// Missing files and malformed values are errors. Links to pages that do
    /// not exist under `src_dir` are warnings.
    pub fn validate(&self, root: &Path) -> Diagnostics {
        let mut diag = Diagnostics::new();

        if self.title.trim().is_empty() {
            diag.error("site.title", "title is empty");
        }

        if !self.base.starts_with('/') || !self.base.ends_with('/') {
            diag.error(
                "site.base",
                format!("base '{}' must start and end with '/'", self.base),
            );
        }

        for (i, tag) in self.head.iter().enumerate() {
            if tag.tag.is_empty() || !tag.tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                diag.error(
                    format!("site.head[{}].tag", i),
                    format!("invalid element name '{}'", tag.tag),
                );
            }
        }

        let src_dir = root.join(&self.src_dir);
        let src_exists = src_dir.is_dir();
        if !src_exists {
            diag.error(
                "site.src_dir",
                format!("source directory not found: {}", self.src_dir.display()),
            );
        }

        let theme = &self.theme_config;
        if !root.join(&theme.logo).is_file() {
            diag.error(
                "site.theme_config.logo",
                format!("logo not found: {}", theme.logo.display()),
            );
        }

        let pages = src_exists.then_some(src_dir.as_path());

        for (i, item) in theme.nav.iter().enumerate() {
            check_item(item, &format!("site.theme_config.nav[{}]", i), pages, &mut diag);
        }

        for (i, group) in theme.sidebar.iter().enumerate() {
            let field = format!("site.theme_config.sidebar[{}]", i);
            if group.text.trim().is_empty() {
                diag.error(format!("{}.text", field), "section heading is empty");
            }
            if group.items.is_empty() {
                diag.error(
                    format!("{}.items", field),
                    format!("section '{}' has no items", group.text),
                );
            }
            for (j, item) in group.items.iter().enumerate() {
                check_item(item, &format!("{}.items[{}]", field, j), pages, &mut diag);
            }
        }

        for (i, social) in theme.social_links.iter().enumerate() {
            let field = format!("site.theme_config.social_links[{}].link", i);
            match url::Url::parse(&social.link) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => diag.error(field, format!("unsupported scheme '{}'", url.scheme())),
                Err(e) => diag.error(field, format!("invalid URL '{}': {}", social.link, e)),
            }
        }

        if let Some(edit) = &theme.edit_link {
            if !edit.pattern.contains(EditLink::PLACEHOLDER) {
                diag.error(
                    "site.theme_config.edit_link.pattern",
                    format!("pattern must contain '{}'", EditLink::PLACEHOLDER),
                );
            }
        }

        diag
    }
}

/// Check one nav or sidebar entry.
fn check_item(item: &NavItem, field: &str, pages: Option<&Path>, diag: &mut Diagnostics) {
    if item.text.trim().is_empty() {
        diag.error(format!("{}.text", field), "text is empty");
    }

    if item.link.is_empty() {
        diag.error(format!("{}.link", field), "link is empty");
        return;
    }

    if !item.link.starts_with('/') {
        diag.error(
            format!("{}.link", field),
            format!("link '{}' must start with '/'", item.link),
        );
        return;
    }

    if let Some(src_dir) = pages {
        if resolve_page(src_dir, &item.link).is_none() {
            diag.warn(
                format!("{}.link", field),
                format!("no page found for '{}'", item.link),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{EXTENDED, MINIMAL};
    use crate::project::ProjectConfig;
    use crate::schema::SidebarGroup;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    /// Project tree with the three cheatsheet pages, a logo and a layout.
    fn project_tree() -> TempDir {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("pages")).unwrap();
        fs::write(root.join("pages/index.md"), "# Swift vs TypeScript").unwrap();
        fs::write(root.join("pages/arrays.md"), "# Arrays").unwrap();
        fs::write(root.join("pages/objects.md"), "# Objects").unwrap();
        fs::write(root.join("logo.svg"), "<svg/>").unwrap();
        fs::create_dir_all(root.join("theme")).unwrap();
        fs::write(root.join("theme/layout.html"), "{{ content }}").unwrap();
        fs::write(root.join("theme/custom.css"), "body {}").unwrap();
        temp
    }

    #[test]
    fn accepts_both_variants() {
        let temp = project_tree();

        for source in [MINIMAL, EXTENDED] {
            let config = ProjectConfig::from_toml_str(source).unwrap();
            let diag = config.validate(temp.path());
            assert!(diag.is_empty(), "unexpected diagnostics:\n{}", diag);
        }
    }

    #[test]
    fn reports_missing_src_dir_and_logo() {
        let temp = tempdir().unwrap();
        let config = ProjectConfig::from_toml_str(MINIMAL).unwrap();

        let diag = config.validate(temp.path());

        let fields: Vec<_> = diag.errors().map(|d| d.field.as_str()).collect();
        assert!(fields.contains(&"site.src_dir"));
        assert!(fields.contains(&"site.theme_config.logo"));
    }

    #[test]
    fn links_must_start_with_slash() {
        let temp = project_tree();
        let mut config = ProjectConfig::from_toml_str(MINIMAL).unwrap();
        config.site.theme_config.nav.push(NavItem::new("Arrays", "arrays"));
        config.site.theme_config.sidebar[0]
            .items
            .push(NavItem::new("Empty", ""));

        let diag = config.validate(temp.path());

        let fields: Vec<_> = diag.errors().map(|d| d.field.clone()).collect();
        assert!(fields.contains(&"site.theme_config.nav[1].link".to_string()));
        assert!(fields.contains(&"site.theme_config.sidebar[0].items[2].link".to_string()));
    }

    #[test]
    fn sidebar_groups_need_items() {
        let temp = project_tree();
        let mut config = ProjectConfig::from_toml_str(MINIMAL).unwrap();
        config.site.theme_config.sidebar.push(SidebarGroup {
            text: "Generics".to_string(),
            items: vec![],
            collapsed: false,
        });

        let diag = config.validate(temp.path());

        assert_eq!(diag.errors().count(), 1);
        assert_eq!(
            diag.errors().next().map(|d| d.field.as_str()),
            Some("site.theme_config.sidebar[1].items")
        );
    }

    #[test]
    fn missing_pages_warn_unless_strict() {
        let temp = project_tree();
        let mut config = ProjectConfig::from_toml_str(MINIMAL).unwrap();
        config
            .site
            .theme_config
            .nav
            .push(NavItem::new("Generics", "/generics"));

        let diag = config.validate(temp.path());
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().count(), 1);

        config.build.strict_links = true;
        let diag = config.validate(temp.path());
        assert!(diag.has_errors());
    }

    #[test]
    fn base_must_be_slash_delimited() {
        let temp = project_tree();
        let mut config = ProjectConfig::from_toml_str(MINIMAL).unwrap();
        config.site.base = "SwiftVsTypeScript".to_string();

        let diag = config.validate(temp.path());

        assert!(diag.errors().any(|d| d.field == "site.base"));
    }

    #[test]
    fn base_must_match_deployment_url() {
        let temp = project_tree();
        let mut config = ProjectConfig::from_toml_str(EXTENDED).unwrap();
        config.build.site_url = Some("https://example.github.io/other/".to_string());

        let diag = config.validate(temp.path());

        assert!(diag.errors().any(|d| d.field == "build.site_url"));
    }

    #[test]
    fn social_links_must_be_urls() {
        let temp = project_tree();
        let mut config = ProjectConfig::from_toml_str(MINIMAL).unwrap();
        config.site.theme_config.social_links[0].link = "github.com/example".to_string();

        let diag = config.validate(temp.path());

        assert!(diag
            .errors()
            .any(|d| d.field == "site.theme_config.social_links[0].link"));
    }

    #[test]
    fn theme_override_files_must_exist() {
        let temp = project_tree();
        fs::remove_file(temp.path().join("theme/layout.html")).unwrap();
        let config = ProjectConfig::from_toml_str(EXTENDED).unwrap();

        let diag = config.validate(temp.path());

        assert!(diag.errors().any(|d| d.field == "theme.layout"));
    }

    #[test]
    fn validated_fails_with_diagnostics() {
        let temp = tempdir().unwrap();
        let config = ProjectConfig::from_toml_str(MINIMAL).unwrap();

        let err = config.validated(temp.path()).unwrap_err();

        assert!(err.to_string().contains("source directory not found"));
    }
}
