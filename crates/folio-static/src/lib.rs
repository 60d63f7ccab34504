//! Static site generator for the personal site.
//!
//! Renders content collections to HTML pages, writes the RSS feed, sitemap and
//! search index, and generates a preview image for every published article.

pub mod assets;
pub mod builder;
pub mod feed;
pub mod og;
pub mod site;
pub mod sitemap;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use og::{og_image_path, og_target, og_targets};
pub use site::{SiteConfig, StaticPage};
