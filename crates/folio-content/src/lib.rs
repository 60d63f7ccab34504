//! Content collections for the site.
//!
//! Loads markdown files with YAML frontmatter from `content/<collection>/`,
//! validates them against per-collection schemas, and answers ordered queries
//! for listings, the feed and preview image targets.

pub mod error;
pub mod frontmatter;
pub mod markdown;
pub mod order;
pub mod schema;
pub mod slug;
pub mod store;

pub use error::ContentError;
pub use frontmatter::{extract_frontmatter, split_frontmatter, FrontmatterError};
pub use markdown::{render_markdown, RenderedBody, TocEntry};
pub use order::{sort_newest_first, sort_projects, sort_uses, Dated};
pub use schema::{
    parse_date, Impact, KeyDecision, Metric, Note, Project, ProjectStatus, Rant, Uses,
    UsesCategory, UsesItem, Writing,
};
pub use slug::{entry_slug, slugify};
pub use store::{Collection, ContentStore, Entry, Schema};
