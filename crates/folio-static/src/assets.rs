//! Stylesheet and public file handling.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// The site stylesheet.
    pub fn generate_css() -> String {
        SITE_CSS.to_string()
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

    /// Copy every file under `public` into `output`, keeping relative paths.
    ///
    /// Returns the number of files copied. A missing `public` directory copies nothing.
    pub fn copy_public(public: &Path, output: &Path) -> io::Result<usize> {
        if !public.is_dir() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(public).follow_links(true) {
            let entry = entry.map_err(io::Error::other)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(public).unwrap_or(path);
            let target = output.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &target)?;
            copied += 1;
        }

        Ok(copied)
    }
}

const SITE_CSS: &str = r#"/* Site theme */

:root {
  --background: #0a0a0a;
  --foreground: #ededed;
  --muted: #a3a3a3;
  --border: #262626;
  --accent: #fafafa;
  --content-max-width: 720px;
  --font-sans: Inter, system-ui, -apple-system, sans-serif;
  --font-mono: ui-monospace, SFMono-Regular, Menlo, monospace;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: var(--font-sans);
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

a {
  color: var(--accent);
  text-underline-offset: 3px;
}

.site-header,
.main,
.site-footer {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 1.5rem;
}

.site-header {
  display: flex;
  justify-content: space-between;
  align-items: center;
  gap: 1rem;
  flex-wrap: wrap;
}

.logo {
  font-weight: 700;
  text-decoration: none;
}

.nav {
  display: flex;
  gap: 1rem;
}

.nav a {
  color: var(--muted);
  text-decoration: none;
}

.nav a.active,
.nav a:hover {
  color: var(--foreground);
}

.hero h1,
.page-header h1,
.article h1,
.project h1,
.rant h1 {
  font-size: 2.25rem;
  letter-spacing: -0.025em;
  line-height: 1.2;
}

.subtitle,
.intro,
.dateline,
time {
  color: var(--muted);
}

section,
.page-header {
  margin-bottom: 2.5rem;
}

h2 {
  margin: 2rem 0 0.75rem;
  font-size: 1.25rem;
}

.list {
  list-style: none;
}

.list li {
  padding: 1rem 0;
  border-bottom: 1px solid var(--border);
}

.list p {
  color: var(--muted);
}

.tag {
  display: inline-block;
  margin-right: 0.5rem;
  padding: 0 0.5rem;
  font-size: 0.8rem;
  border: 1px solid var(--border);
  border-radius: 999px;
}

.toc {
  margin: 1.5rem 0;
  padding: 1rem;
  border: 1px solid var(--border);
  border-radius: 0.5rem;
}

.toc ul {
  list-style: none;
}

.toc-level-3 {
  padding-left: 1rem;
}

.content p,
.content ul,
.content ol,
.content pre,
.content blockquote {
  margin: 1rem 0;
}

.content ul,
.content ol {
  padding-left: 1.5rem;
}

.content pre {
  padding: 1rem;
  overflow-x: auto;
  background: #171717;
  border-radius: 0.5rem;
  font-family: var(--font-mono);
}

.content blockquote {
  padding-left: 1rem;
  border-left: 3px solid var(--border);
  color: var(--muted);
}

.metrics {
  display: grid;
  grid-template-columns: max-content 1fr;
  gap: 0.25rem 1rem;
}

.site-footer {
  display: flex;
  gap: 1rem;
  color: var(--muted);
  border-top: 1px solid var(--border);
}
"#;
