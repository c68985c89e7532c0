//! The built-in theme.

use std::fmt::Write as _;

use minijinja::{escape_formatter, AutoEscape, Environment, ErrorKind, Output, State, Value};

use crate::context::PageContext;
use crate::traits::{LayoutContext, Slots, Theme, ThemeError};

/// Template name of the default layout, for layouts that extend it.
pub const LAYOUT_TEMPLATE: &str = "default/layout.html";

const HEAD_TEMPLATE_NAME: &str = "default/head.html";
const NAV_TEMPLATE_NAME: &str = "default/nav.html";
const SIDEBAR_TEMPLATE_NAME: &str = "default/sidebar.html";
const FOOTER_TEMPLATE_NAME: &str = "default/footer.html";

/// The default theme: minijinja templates for every slot plus a stylesheet.
pub struct DefaultTheme {
    env: Environment<'static>,
}

impl DefaultTheme {
    pub fn new() -> Self {
        let mut env = new_environment();

        env.add_template(LAYOUT_TEMPLATE, LAYOUT)
            .expect("Failed to add layout template");
        env.add_template(HEAD_TEMPLATE_NAME, HEAD)
            .expect("Failed to add head template");
        env.add_template(NAV_TEMPLATE_NAME, NAV)
            .expect("Failed to add nav template");
        env.add_template(SIDEBAR_TEMPLATE_NAME, SIDEBAR)
            .expect("Failed to add sidebar template");
        env.add_template(FOOTER_TEMPLATE_NAME, FOOTER)
            .expect("Failed to add footer template");

        Self { env }
    }

    fn render(&self, name: &str, page: &PageContext) -> Result<String, ThemeError> {
        Ok(self.env.get_template(name)?.render(page)?)
    }
}

impl Default for DefaultTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for DefaultTheme {
    fn name(&self) -> &str {
        "default"
    }

    fn render_head(&self, page: &PageContext) -> Result<String, ThemeError> {
        self.render(HEAD_TEMPLATE_NAME, page)
    }

    fn render_nav(&self, page: &PageContext) -> Result<String, ThemeError> {
        self.render(NAV_TEMPLATE_NAME, page)
    }

    fn render_sidebar(&self, page: &PageContext) -> Result<String, ThemeError> {
        self.render(SIDEBAR_TEMPLATE_NAME, page)
    }

    fn render_footer(&self, page: &PageContext) -> Result<String, ThemeError> {
        self.render(FOOTER_TEMPLATE_NAME, page)
    }

    fn render_layout(&self, page: &PageContext, slots: &Slots) -> Result<String, ThemeError> {
        let tmpl = self.env.get_template(LAYOUT_TEMPLATE)?;
        Ok(tmpl.render(LayoutContext { page, slots })?)
    }

    fn layout_template(&self) -> &str {
        LAYOUT
    }

    fn stylesheet(&self) -> &str {
        STYLESHEET
    }
}

/// Template environment shared by all themes.
///
/// HTML templates escape values for quoted attributes and text but leave
/// `/` alone so URLs stay readable in the output.
pub(crate) fn new_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_formatter(html_formatter);
    env
}

fn html_formatter(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &Value,
) -> Result<(), minijinja::Error> {
    if matches!(state.auto_escape(), AutoEscape::Html) && !value.is_safe() {
        if let Some(s) = value.as_str() {
            return write!(out, "{}", html_escape::encode_quoted_attribute(s))
                .map_err(|_| minijinja::Error::new(ErrorKind::WriteFailure, "failed to write output"));
        }
    }
    escape_formatter(out, state, value)
}

const LAYOUT: &str = r##"<!DOCTYPE html>
<html lang="en" data-appearance="{{ appearance }}"{% if dark %} class="dark"{% endif %}>
<head>
{% block head %}{{ slots.head | safe }}{% endblock %}
</head>
<body class="layout-{{ layout }}">
{% block nav %}<header class="navbar">
{{ slots.nav | safe }}
</header>{% endblock %}
<div class="container">
{% block sidebar %}{% if show_sidebar %}<aside class="sidebar">
{{ slots.sidebar | safe }}
</aside>{% endif %}{% endblock %}
<main class="main">
{% block content %}<article class="doc">
{{ content | safe }}
</article>{% endblock %}
{% block doc_footer %}{% if edit_link or prev or next %}<div class="doc-footer">
{%- if edit_link %}
<a class="edit-link" href="{{ edit_link.url }}">{{ edit_link.text }}</a>
{%- endif %}
{%- if prev or next %}
<nav class="prev-next">
{%- if prev %}
<a class="prev" href="{{ prev.url }}"><span>Previous page</span>{{ prev.text }}</a>
{%- endif %}
{%- if next %}
<a class="next" href="{{ next.url }}"><span>Next page</span>{{ next.text }}</a>
{%- endif %}
</nav>
{%- endif %}
</div>{% endif %}{% endblock %}
</main>
{% block aside %}{% if show_outline and toc %}<aside class="outline">
<h2>{{ outline_title }}</h2>
<ul>
{%- for entry in toc %}
<li class="outline-level-{{ entry.level }}"><a href="#{{ entry.id }}">{{ entry.title }}</a></li>
{%- endfor %}
</ul>
</aside>{% endif %}{% endblock %}
</div>
{% block footer %}{{ slots.footer | safe }}{% endblock %}
{%- for script in scripts %}
<script src="{{ script }}" defer></script>
{%- endfor %}
{%- if live_reload %}
<script>{{ live_reload | safe }}</script>
{%- endif %}
</body>
</html>
"##;

const HEAD: &str = r##"<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{ title }}</title>
<meta name="description" content="{{ description }}">
{%- for tag in head %}
<{{ tag.tag }}{% for attr in tag.attrs %} {{ attr.name }}="{{ attr.value }}"{% endfor %}>{% if not tag.void %}</{{ tag.tag }}>{% endif %}
{%- endfor %}
{%- if logo %}
<link rel="icon" href="{{ logo }}">
{%- endif %}
{%- for style in styles %}
<link rel="stylesheet" href="{{ style }}">
{%- endfor %}
{%- if appearance_toggle %}
<script>(function(){var d=document.documentElement,p=localStorage.getItem('lectern-appearance');if(p){d.classList.toggle('dark',p==='dark')}else if(d.dataset.appearance==='auto'){d.classList.toggle('dark',matchMedia('(prefers-color-scheme: dark)').matches)}})();</script>
{%- endif %}"##;

const NAV: &str = r##"<button class="menu-btn" type="button" aria-label="Menu"></button>
<a class="brand" href="{{ base }}">
{%- if logo %}<img class="logo" src="{{ logo }}" alt="">{% endif %}
<span class="site-title">{{ site_title }}</span></a>
{%- if search_index %}
<div class="search" data-index="{{ search_index }}">
<input type="search" placeholder="Search" aria-label="Search">
<ul class="search-results"></ul>
</div>
{%- endif %}
<nav class="nav-links">
{%- for item in nav %}
<a class="nav-link{% if item.active %} active{% endif %}" href="{{ item.url }}">{{ item.text }}</a>
{%- endfor %}
</nav>
{%- if social_links %}
<div class="social-links">
{%- for social in social_links %}
<a class="social-link social-{{ social.icon }}" href="{{ social.url }}" aria-label="{{ social.label }}" target="_blank" rel="noopener">{{ social.label }}</a>
{%- endfor %}
</div>
{%- endif %}
{%- if appearance_toggle %}
<button class="appearance-toggle" type="button" aria-label="Toggle dark mode"></button>
{%- endif %}"##;

const SIDEBAR: &str = r##"{%- for section in sidebar %}
<section class="sidebar-group">
<details{% if not section.collapsed %} open{% endif %}>
<summary>{{ section.text }}</summary>
<ul>
{%- for item in section.items %}
<li><a class="sidebar-link{% if item.active %} active{% endif %}" href="{{ item.url }}">{{ item.text }}</a></li>
{%- endfor %}
</ul>
</details>
</section>
{%- endfor %}"##;

const FOOTER: &str = r##"{%- if footer %}<footer class="footer">
<p class="message">{{ footer.message | safe }}</p>
{%- if footer.copyright %}
<p class="copyright">{{ footer.copyright }}</p>
{%- endif %}
</footer>{% endif %}"##;

const STYLESHEET: &str = r#"/* lectern default theme */

:root {
  --navbar-height: 64px;
  --sidebar-width: 272px;
  --outline-width: 224px;
  --content-max-width: 760px;

  --bg: #ffffff;
  --bg-soft: #f6f6f7;
  --bg-code: #f3f4f6;
  --text: #213547;
  --text-muted: #67676c;
  --border: #e2e2e3;
  --brand: #3451b2;
  --brand-soft: rgba(52, 81, 178, 0.12);
  --radius: 8px;
  --font-sans: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif;
  --font-mono: ui-monospace, SFMono-Regular, Menlo, monospace;
}

.dark {
  --bg: #1b1b1f;
  --bg-soft: #202127;
  --bg-code: #161618;
  --text: #dfdfd6;
  --text-muted: #98989f;
  --border: #2e2e32;
  --brand: #a8b1ff;
  --brand-soft: rgba(168, 177, 255, 0.16);
  color-scheme: dark;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: var(--font-sans);
  background: var(--bg);
  color: var(--text);
  line-height: 1.7;
}

a {
  color: inherit;
  text-decoration: none;
}

/* Navbar */
.navbar {
  position: sticky;
  top: 0;
  z-index: 20;
  display: flex;
  align-items: center;
  gap: 1.5rem;
  height: var(--navbar-height);
  padding: 0 1.5rem;
  background: var(--bg);
  border-bottom: 1px solid var(--border);
}

.brand {
  display: flex;
  align-items: center;
  gap: 0.5rem;
  font-weight: 600;
  font-size: 1.1rem;
}

.logo {
  height: 28px;
}

.nav-links {
  display: flex;
  gap: 1.25rem;
  margin-left: auto;
}

.nav-link {
  font-size: 0.9rem;
  font-weight: 500;
  color: var(--text-muted);
  transition: color 0.15s;
}

.nav-link:hover,
.nav-link.active {
  color: var(--brand);
}

.social-links {
  display: flex;
  gap: 0.75rem;
  font-size: 0.85rem;
  color: var(--text-muted);
}

.appearance-toggle,
.menu-btn {
  width: 36px;
  height: 22px;
  border: 1px solid var(--border);
  border-radius: 11px;
  background: var(--bg-soft);
  cursor: pointer;
}

.menu-btn {
  display: none;
}

/* Search */
.search {
  position: relative;
}

.search input {
  width: 200px;
  padding: 0.35rem 0.75rem;
  border: 1px solid var(--border);
  border-radius: var(--radius);
  background: var(--bg-soft);
  color: var(--text);
  font: inherit;
  font-size: 0.875rem;
}

.search-results {
  position: absolute;
  top: 2.5rem;
  left: 0;
  width: 320px;
  list-style: none;
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: var(--radius);
}

.search-results:empty {
  display: none;
}

.search-results a {
  display: block;
  padding: 0.5rem 0.75rem;
}

.search-results a:hover {
  background: var(--brand-soft);
}

/* Layout */
.container {
  display: flex;
  justify-content: center;
  gap: 2rem;
  padding: 0 1.5rem;
}

.sidebar {
  position: sticky;
  top: var(--navbar-height);
  flex: 0 0 var(--sidebar-width);
  height: calc(100vh - var(--navbar-height));
  padding: 1.5rem 1rem 1.5rem 0;
  overflow-y: auto;
  border-right: 1px solid var(--border);
}

.sidebar-group + .sidebar-group {
  margin-top: 1rem;
}

.sidebar-group summary {
  font-weight: 700;
  font-size: 0.9rem;
  cursor: pointer;
  list-style: none;
}

.sidebar-group ul {
  list-style: none;
  margin-top: 0.25rem;
}

.sidebar-link {
  display: block;
  padding: 0.2rem 0;
  font-size: 0.875rem;
  color: var(--text-muted);
}

.sidebar-link:hover,
.sidebar-link.active {
  color: var(--brand);
}

.main {
  flex: 1 1 auto;
  min-width: 0;
  max-width: var(--content-max-width);
  padding: 2rem 0 4rem;
}

.layout-page .main,
.layout-home .main {
  max-width: 1152px;
}

/* Content */
.doc h1 {
  font-size: 2.25rem;
  line-height: 1.25;
  margin-bottom: 1rem;
}

.doc h2 {
  font-size: 1.5rem;
  margin: 2.5rem 0 1rem;
  padding-top: 1.5rem;
  border-top: 1px solid var(--border);
}

.doc h3 {
  font-size: 1.2rem;
  margin: 2rem 0 0.75rem;
}

.doc p,
.doc ul,
.doc ol,
.doc table {
  margin-bottom: 1rem;
}

.doc ul,
.doc ol {
  padding-left: 1.25rem;
}

.doc a {
  color: var(--brand);
  text-decoration: underline;
  text-underline-offset: 2px;
}

.header-anchor {
  float: left;
  margin-left: -0.9em;
  padding-right: 0.2em;
  opacity: 0;
  text-decoration: none !important;
}

h1:hover .header-anchor,
h2:hover .header-anchor,
h3:hover .header-anchor {
  opacity: 1;
}

.doc table {
  border-collapse: collapse;
  display: block;
  overflow-x: auto;
}

.doc th,
.doc td {
  border: 1px solid var(--border);
  padding: 0.5rem 1rem;
}

.doc :not(pre) > code {
  font-family: var(--font-mono);
  font-size: 0.875em;
  background: var(--bg-code);
  padding: 0.15rem 0.4rem;
  border-radius: 4px;
}

/* Code blocks */
.code-block {
  position: relative;
  margin-bottom: 1rem;
  background: var(--bg-code);
  border-radius: var(--radius);
  overflow: hidden;
}

.code-title {
  padding: 0.4rem 1rem;
  font-size: 0.8rem;
  color: var(--text-muted);
  border-bottom: 1px solid var(--border);
}

.code-block .lang {
  position: absolute;
  top: 0.4rem;
  right: 0.75rem;
  font-size: 0.7rem;
  color: var(--text-muted);
}

.code-block pre {
  padding: 1rem 1.25rem;
  overflow-x: auto;
  font-family: var(--font-mono);
  font-size: 0.875rem;
  line-height: 1.6;
}

.copy-btn {
  position: absolute;
  right: 0.5rem;
  bottom: 0.5rem;
  padding: 0.15rem 0.6rem;
  font-size: 0.75rem;
  border: 1px solid var(--border);
  border-radius: 4px;
  background: var(--bg);
  color: var(--text-muted);
  cursor: pointer;
  opacity: 0;
  transition: opacity 0.15s;
}

.code-block:hover .copy-btn {
  opacity: 1;
}

/* Doc footer */
.doc-footer {
  margin-top: 3rem;
  padding-top: 1.5rem;
  border-top: 1px solid var(--border);
}

.edit-link {
  font-size: 0.875rem;
  color: var(--brand);
}

.prev-next {
  display: flex;
  gap: 1rem;
  margin-top: 1rem;
}

.prev-next a {
  flex: 1;
  padding: 0.75rem 1rem;
  border: 1px solid var(--border);
  border-radius: var(--radius);
  font-weight: 500;
  color: var(--brand);
}

.prev-next .next {
  text-align: right;
}

.prev-next span {
  display: block;
  font-size: 0.75rem;
  color: var(--text-muted);
}

/* Outline */
.outline {
  position: sticky;
  top: var(--navbar-height);
  flex: 0 0 var(--outline-width);
  align-self: flex-start;
  padding: 2rem 0;
}

.outline h2 {
  font-size: 0.8rem;
  font-weight: 600;
  margin-bottom: 0.5rem;
}

.outline ul {
  list-style: none;
  border-left: 1px solid var(--border);
}

.outline a {
  display: block;
  padding: 0.15rem 0 0.15rem 1rem;
  font-size: 0.825rem;
  color: var(--text-muted);
}

.outline a:hover {
  color: var(--brand);
}

.outline-level-3 a {
  padding-left: 2rem;
}

/* Footer */
.footer {
  padding: 2rem 1.5rem;
  text-align: center;
  font-size: 0.875rem;
  color: var(--text-muted);
  border-top: 1px solid var(--border);
}

.footer a {
  color: var(--brand);
}

/* Responsive */
@media (max-width: 1280px) {
  .outline {
    display: none;
  }
}

@media (max-width: 960px) {
  .menu-btn {
    display: block;
  }

  .nav-links,
  .search {
    display: none;
  }

  .sidebar {
    position: fixed;
    left: -100%;
    z-index: 30;
    width: var(--sidebar-width);
    padding-left: 1rem;
    background: var(--bg);
    transition: left 0.25s;
  }

  .sidebar.open {
    left: 0;
  }
}
"#;
