//! Preview image targets derived from content.

use folio_content::{ContentStore, Entry, Writing};
use folio_og::RenderTarget;

/// The image parameters for one writing entry.
pub fn og_target(entry: &Entry<Writing>) -> RenderTarget {
    RenderTarget {
        slug: entry.slug.clone(),
        title: entry.data.title.clone(),
        description: entry.data.description.clone(),
        publish_date: entry.data.publish_date,
    }
}

/// One target per published writing entry, newest first.
pub fn og_targets(store: &ContentStore) -> Vec<RenderTarget> {
    store
        .published_writing()
        .into_iter()
        .map(og_target)
        .collect()
}

/// Site path of an entry's preview image.
pub fn og_image_path(slug: &str) -> String {
    format!("/og/{slug}.png")
}
