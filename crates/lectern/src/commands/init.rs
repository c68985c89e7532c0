//! Scaffold a documentation site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lectern_config::project_root;

/// Files written by `lectern init`, relative to the project root.
///
/// The config file itself is written to the path given on the command line.
const SCAFFOLD: &[(&str, &str)] = &[
    ("pages/index.md", DEFAULT_INDEX),
    ("pages/arrays.md", DEFAULT_ARRAYS),
    ("pages/objects.md", DEFAULT_OBJECTS),
    ("theme/layout.html", DEFAULT_LAYOUT),
    ("theme/custom.css", DEFAULT_CSS),
    ("logo.svg", DEFAULT_LOGO),
    (".gitignore", DEFAULT_GITIGNORE),
];

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing lectern...");

    let root = project_root(config_path);
    fs::create_dir_all(&root)
        .with_context(|| format!("Failed to create {}", root.display()))?;

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());

    for (relative, contents) in SCAFFOLD {
        let path = root.join(relative);
        if path.exists() && !yes {
            tracing::debug!("Keeping existing {}", relative);
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", relative))?;
        tracing::info!("Created {}", relative);
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'lectern dev' to start the development server.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Lectern configuration

[site]
title = "Swift vs TypeScript"
description = "Swift and TypeScript compared side by side"
src_dir = "./pages"
base = "/SwiftVsTypeScript/"
appearance = "dark"

# Social preview tags, added to every page head
[[site.head]]
tag = "meta"
attrs = { property = "og:title", content = "Swift vs TypeScript" }

[[site.head]]
tag = "meta"
attrs = { property = "og:description", content = "Swift and TypeScript compared side by side" }

[[site.head]]
tag = "meta"
attrs = { name = "twitter:card", content = "summary" }

[site.theme_config]
logo = "logo.svg"

[site.theme_config.search]
provider = "local"

[[site.theme_config.nav]]
text = "Home"
link = "/"

[[site.theme_config.nav]]
text = "Cheatsheet"
link = "/arrays"

[[site.theme_config.sidebar]]
text = "Cheatsheet"

[[site.theme_config.sidebar.items]]
text = "Arrays"
link = "/arrays"

[[site.theme_config.sidebar.items]]
text = "Objects"
link = "/objects"

[[site.theme_config.social_links]]
icon = "github"
link = "https://github.com/example/SwiftVsTypeScript"

[site.theme_config.footer]
message = "Released under the MIT License."

# Replace the default layout
[theme]
layout = "theme/layout.html"
styles = ["theme/custom.css"]

[build]
out_dir = "dist"
minify = true
clean_urls = true
"#;

const DEFAULT_INDEX: &str = r#"---
layout: home
title: Swift vs TypeScript
---

# Swift vs TypeScript

A side by side cheatsheet for developers who know one language and are
learning the other.

- [Arrays](./arrays.md)
- [Objects](./objects.md)
"#;

const DEFAULT_ARRAYS: &str = r#"---
title: Arrays
---

# Arrays

## Creating

```swift
let numbers = [1, 2, 3]
```

```typescript
const numbers = [1, 2, 3];
```

## Mapping

```swift
let doubled = numbers.map { $0 * 2 }
```

```typescript
const doubled = numbers.map((n) => n * 2);
```
"#;

const DEFAULT_OBJECTS: &str = r#"---
title: Objects
---

# Objects

## Declaring

```swift
struct Point {
    var x: Double
    var y: Double
}
```

```typescript
interface Point {
  x: number;
  y: number;
}
```

Next: back to [arrays](./arrays.md).
"#;

const DEFAULT_LAYOUT: &str = r#"{% extends "default/layout.html" %}
{% block nav %}<div class="banner">Swift and TypeScript, side by side</div>{{ super() }}{% endblock %}
"#;

const DEFAULT_CSS: &str = r#".banner {
  padding: 0.5rem 1rem;
  text-align: center;
  font-size: 0.875rem;
  background: var(--brand);
  color: #fff;
}
"#;

const DEFAULT_LOGO: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32"><rect width="32" height="32" rx="6" fill="#f05138"/><path d="M9 22l7-12 7 12z" fill="#fff"/></svg>
"##;

const DEFAULT_GITIGNORE: &str = "dist/\n.lectern/\n";
