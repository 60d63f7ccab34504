//! Slugs for entries and heading anchors.

use std::path::Path;

/// Convert text to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' || c == '.' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Slug for a content file, relative to its collection directory.
///
/// Each path segment is slugified and the extension dropped, so
/// `2024/Hello World.md` becomes `2024/hello-world`.
pub fn entry_slug(relative: &Path) -> String {
    let stem = relative.with_extension("");
    stem.components()
        .map(|c| slugify(&c.as_os_str().to_string_lossy()))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("API Reference"), "api-reference");
        assert_eq!(slugify("Button (Primary)"), "button-primary");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }

    #[test]
    fn entry_slugs_keep_directories() {
        assert_eq!(entry_slug(Path::new("shipping.md")), "shipping");
        assert_eq!(entry_slug(Path::new("2024/Hello World.mdx")), "2024/hello-world");
        assert_eq!(entry_slug(Path::new("v1.2 notes.md")), "v1-2-notes");
    }
}
