//! Frontmatter extraction and parsing.

use serde::de::DeserializeOwned;

/// Split a document into its raw YAML frontmatter and the remaining body.
///
/// Returns `None` for the YAML when the document has no frontmatter block.
pub fn split_frontmatter(source: &str) -> Result<(Option<&str>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    Ok((Some(yaml), remaining.trim_start()))
}

/// Extract and deserialize frontmatter into `T`.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter<T: DeserializeOwned>(
    source: &str,
) -> Result<(Option<T>, &str), FrontmatterError> {
    let (yaml, body) = split_frontmatter(source)?;

    let Some(yaml) = yaml else {
        return Ok((None, body));
    };

    let frontmatter: T =
        serde_yaml::from_str(yaml).map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?;

    Ok((Some(frontmatter), body))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}
