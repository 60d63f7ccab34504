//! Open Graph preview images.
//!
//! Loads fonts and images, composes a fixed 1200x630 layout from an entry's
//! title, description, and date, rasterizes it to PNG, and wraps the result in
//! a cacheable HTTP response.

pub mod assets;
pub mod compose;
pub mod emit;
pub mod error;
pub mod generator;
pub mod node;
pub mod raster;

/// Font and image fixtures, also used by dependent crates' tests.
#[cfg(any(test, feature = "test-util"))]
pub mod testutil;

pub use assets::{
    AssetConfig, AssetLoader, FontSource, OgAssets, RetryPolicy, INTER_BOLD, INTER_REGULAR,
};
pub use compose::{compose, format_date, title_font_size, truncate_description, ImageSources};
pub use emit::{etag_matches, not_modified, png_response};
pub use error::OgError;
pub use generator::{BatchReport, OgGenerator, OgImage, PreparedImage, RenderTarget};
pub use node::{Node, CANVAS_HEIGHT, CANVAS_WIDTH};
pub use raster::{Font, RasterError, Rasterizer};
