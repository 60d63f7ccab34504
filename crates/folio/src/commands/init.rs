//! Scaffold a new site in the current directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Files written by `init`, relative to the project root.
const SCAFFOLD: [(&str, &str); 8] = [
    ("site.toml", DEFAULT_CONFIG),
    (".env.example", DEFAULT_ENV),
    ("content/writing/hello-world.md", DEFAULT_WRITING),
    ("content/projects/this-site.md", DEFAULT_PROJECT),
    ("content/rants/yaml-dates.md", DEFAULT_RANT),
    ("content/notes/first-note.md", DEFAULT_NOTE),
    ("content/uses/tools.md", DEFAULT_USES),
    ("public/.gitkeep", ""),
];

/// Run the init command.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing site...");

    let written = scaffold(Path::new("."), yes)?;

    tracing::info!("Created {} files", written);
    tracing::info!(
        "Add public/favicon-192x192.png and src/assets/base-og.png, then run 'folio build'."
    );

    Ok(())
}

/// Write the scaffold below `root`. Existing files are kept unless `overwrite`.
fn scaffold(root: &Path, overwrite: bool) -> Result<usize> {
    let mut written = 0;

    for (relative, contents) in SCAFFOLD {
        let path = root.join(relative);
        if path.exists() && !overwrite {
            tracing::warn!("{} already exists. Use --yes to overwrite.", relative);
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", relative))?;
        tracing::info!("Created {}", relative);
        written += 1;
    }

    Ok(written)
}

const DEFAULT_CONFIG: &str = r#"# folio configuration

[site]
# Content collections (writing, projects, rants, notes, uses)
content_dir = "content"

# Copied verbatim into the output
public_dir = "public"

# Output directory for the built site
output_dir = "dist"

# Minify the stylesheet
minify = true

[og]
font_regular = "https://cdn.jsdelivr.net/fontsource/fonts/inter@latest/latin-400-normal.ttf"
font_bold = "https://cdn.jsdelivr.net/fontsource/fonts/inter@latest/latin-700-normal.ttf"
favicon = "public/favicon-192x192.png"
background = "src/assets/base-og.png"

# Images rendered at once during a build
concurrency = 4

# Seconds before a font request is abandoned (unset waits indefinitely)
# timeout_secs = 10

# Keep fetched fonts between builds
# cache_dir = ".cache/fonts"

[og.retry]
# 1 means no retries; only network errors and 5xx responses are retried
max_attempts = 1
base_delay_ms = 250
"#;

const DEFAULT_ENV: &str = r#"SITE_URL=https://example.com
SITE_LANGUAGE=en
SITE_TITLE=Your Name - Software Engineer
SITE_DESCRIPTION=Software engineer writing about what I build.
SITE_AUTHOR_NAME=Your Name
SITE_AUTHOR_TITLE=Software Engineer
SITE_AUTHOR_BIO=I build things and write about them.
SITE_AUTHOR_EMAIL=you@example.com
SITE_AUTHOR_LOCATION=
SOCIAL_GITHUB=
SOCIAL_LINKEDIN=
SOCIAL_INSTAGRAM=
SOCIAL_TWITTER=
"#;

const DEFAULT_WRITING: &str = r#"---
title: Hello, world
description: Why this site exists and what will end up on it.
publishDate: 2024-01-01
tags: [meta]
---

## Why

Every project I finish gets a write-up here.

## What's next

Projects, rants and notes, in roughly that order of effort.
"#;

const DEFAULT_PROJECT: &str = r#"---
title: This site
role: Everything
year: 2024
outcomeSummary: A fast personal site with generated preview images.
overview: A static site built from markdown collections.
problem: Hosted blogging platforms were slow and hard to customize.
constraints:
  - No client-side JavaScript
approach: Render everything at build time.
keyDecisions:
  - decision: Generate preview images at build time
    reasoning: They never change after publishing.
    alternatives: [On-demand rendering]
techStack: [Rust]
impact:
  qualitative: Publishing is one command.
learnings:
  - Keep the content format boring.
featured: true
order: 1
---
"#;

const DEFAULT_RANT: &str = r#"---
title: YAML dates are a trap
date: 2024-01-02
context: Frontmatter dates parse differently everywhere.
rant: Quote your dates or pick a format and enforce it.
reasoning: Silent timezone shifts move posts to the wrong day.
tags: [yaml]
---
"#;

const DEFAULT_NOTE: &str = r#"---
date: 2024-01-03
title: First note
description: Notes are for things that don't need a full article.
---

Short and useful.
"#;

const DEFAULT_USES: &str = r#"---
category: tools
order: 1
items:
  - name: Git
    description: Version control
    url: https://git-scm.com
---
"#;
