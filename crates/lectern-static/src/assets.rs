//! Asset pipeline for CSS, JavaScript and copied files.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the client script.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }

    /// Minify when asked, keeping the source if it does not parse.
    pub fn process_css(css: &str, minify: bool, name: &str) -> String {
        if !minify {
            return css.to_string();
        }

        match Self::minify_css(css) {
            Ok(minified) => minified,
            Err(e) => {
                tracing::warn!("Leaving {} unminified: {}", name, e);
                css.to_string()
            }
        }
    }

    /// Copy a directory tree, returning the number of files copied.
    pub fn copy_dir(from: &Path, to: &Path) -> io::Result<usize> {
        let mut count = 0;

        for entry in WalkDir::new(from)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            let Ok(relative) = path.strip_prefix(from) else {
                continue;
            };
            let target = to.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(path, &target)?;
                count += 1;
            }
        }

        Ok(count)
    }
}

const DEFAULT_JS: &str = r#"// lectern client
(function() {
  'use strict';

  const root = document.documentElement;

  // Mobile menu
  const menuBtn = document.querySelector('.menu-btn');
  const sidebar = document.querySelector('.sidebar');

  if (menuBtn && sidebar) {
    menuBtn.addEventListener('click', () => {
      sidebar.classList.toggle('open');
    });
  }

  // Appearance toggle
  const toggle = document.querySelector('.appearance-toggle');

  if (toggle) {
    toggle.addEventListener('click', () => {
      const dark = root.classList.toggle('dark');
      localStorage.setItem('lectern-appearance', dark ? 'dark' : 'light');
    });
  }

  // Copy buttons for code blocks
  document.querySelectorAll('.code-block').forEach(block => {
    if (block.querySelector('.copy-btn')) return;

    const btn = document.createElement('button');
    btn.className = 'copy-btn';
    btn.textContent = 'Copy';
    btn.setAttribute('type', 'button');

    btn.addEventListener('click', async () => {
      const code = block.querySelector('code');

      try {
        await navigator.clipboard.writeText(code ? code.textContent : '');
        btn.textContent = 'Copied!';
      } catch (err) {
        btn.textContent = 'Error';
      }
      setTimeout(() => { btn.textContent = 'Copy'; }, 2000);
    });

    block.appendChild(btn);
  });

  // Local search
  const search = document.querySelector('.search');

  if (search) {
    const input = search.querySelector('input');
    const results = search.querySelector('.search-results');
    let index = null;

    const load = async () => {
      if (index) return index;
      const res = await fetch(search.dataset.index);
      index = await res.json();
      return index;
    };

    input.addEventListener('input', async () => {
      const query = input.value.trim().toLowerCase();
      results.innerHTML = '';
      if (query.length < 2) return;

      const entries = await load();
      entries
        .filter(e => e.title.toLowerCase().includes(query) ||
                     e.headings.some(h => h.toLowerCase().includes(query)) ||
                     e.text.toLowerCase().includes(query))
        .slice(0, 10)
        .forEach(e => {
          const li = document.createElement('li');
          const a = document.createElement('a');
          a.href = e.url;
          a.textContent = e.title;
          li.appendChild(a);
          results.appendChild(li);
        });
    });
  }
})();
"#;
