//! `sitemap.xml` and `robots.txt`.

/// Render a sitemap for absolute page URLs.
pub fn render_sitemap(urls: &[String]) -> String {
    let entries: Vec<String> = urls
        .iter()
        .map(|url| format!("  <url>\n    <loc>{}</loc>\n  </url>", xml_escape(url)))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>
"#,
        entries.join("\n")
    )
}

/// Render `robots.txt` pointing at the sitemap.
pub fn render_robots(sitemap_url: &str) -> String {
    format!("User-agent: *\nAllow: /\nSitemap: {}\n", sitemap_url)
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
