use std::path::PathBuf;

use crate::frontmatter::FrontmatterError;

/// Errors raised while loading the content store.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Content directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("Missing frontmatter in {0}")]
    MissingFrontmatter(PathBuf),

    #[error("Invalid frontmatter in {path}: {source}")]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },

    #[error("Duplicate slug `{slug}` in {collection}")]
    DuplicateSlug { collection: String, slug: String },
}
