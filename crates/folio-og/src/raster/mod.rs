//! Layout tree to PNG.
//!
//! The tree is placed, serialized to SVG, parsed by `usvg` with only the
//! supplied fonts visible, and rendered by `resvg` scaled to a fixed width.

pub mod flow;
pub mod metrics;
pub mod svg;

use std::sync::Arc;

use resvg::tiny_skia;
use resvg::usvg;
use resvg::usvg::fontdb::{Database, Language, Source, Weight};

use crate::node::{Node, CANVAS_HEIGHT, CANVAS_WIDTH};

use self::metrics::Metrics;

/// A named, weighted font buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub name: String,
    pub weight: u16,
    pub data: Vec<u8>,
}

impl Font {
    pub fn new(name: impl Into<String>, weight: u16, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            weight,
            data,
        }
    }
}

/// Errors raised while turning a layout tree into pixels.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("invalid font {name} ({weight}): {reason}")]
    InvalidFont {
        name: String,
        weight: u16,
        reason: String,
    },

    #[error("no font supplied for weight {weight}")]
    MissingFont { weight: u16 },

    #[error("invalid vector document: {0}")]
    Svg(String),

    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("render task failed: {0}")]
    Task(String),
}

/// Renders layout trees at a fixed canvas size and output width.
#[derive(Debug, Clone, Copy)]
pub struct Rasterizer {
    canvas_width: u32,
    canvas_height: u32,
    fit_width: u32,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            fit_width: CANVAS_WIDTH,
        }
    }
}

impl Rasterizer {
    pub fn new(canvas_width: u32, canvas_height: u32, fit_width: u32) -> Self {
        Self {
            canvas_width,
            canvas_height,
            fit_width,
        }
    }

    /// Produce the SVG document for a tree.
    pub fn to_svg(&self, root: &Node, fonts: &[Font]) -> Result<String, RasterError> {
        let metrics = Metrics::new(fonts)?;
        let placed = flow::resolve(
            root,
            self.canvas_width as f32,
            self.canvas_height as f32,
            &metrics,
        );
        svg::write_svg(&placed, self.canvas_width, self.canvas_height, &metrics)
    }

    /// Render a tree to PNG bytes.
    pub fn render(&self, root: &Node, fonts: &[Font]) -> Result<Vec<u8>, RasterError> {
        let svg = self.to_svg(root, fonts)?;
        self.rasterize_svg(&svg, fonts)
    }

    /// Rasterize an SVG document, scaled so its width is the fit width.
    ///
    /// `font-family` and `font-weight` in the document match the supplied
    /// names and weights, not the names stored inside the font files.
    pub fn rasterize_svg(&self, svg: &str, fonts: &[Font]) -> Result<Vec<u8>, RasterError> {
        let mut options = usvg::Options::default();
        if let Some(first) = fonts.first() {
            options.font_family = first.name.clone();
        }
        options.fontdb = Arc::new(font_database(fonts)?);

        let tree =
            usvg::Tree::from_str(svg, &options).map_err(|e| RasterError::Svg(e.to_string()))?;

        let size = tree.size();
        let scale = self.fit_width as f32 / size.width();
        let width = self.fit_width;
        let height = (size.height() * scale).ceil() as u32;

        let mut pixmap =
            tiny_skia::Pixmap::new(width, height).ok_or(RasterError::Canvas { width, height })?;
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        pixmap
            .encode_png()
            .map_err(|e| RasterError::Encode(e.to_string()))
    }
}

/// Register every face under its supplied name and weight.
fn font_database(fonts: &[Font]) -> Result<Database, RasterError> {
    let mut db = Database::new();

    for font in fonts {
        let ids = db.load_font_source(Source::Binary(Arc::new(font.data.clone())));
        if ids.is_empty() {
            return Err(RasterError::InvalidFont {
                name: font.name.clone(),
                weight: font.weight,
                reason: "no usable face".to_string(),
            });
        }

        for id in ids {
            let Some(mut info) = db.face(id).cloned() else {
                continue;
            };
            db.remove_face(id);
            info.families = vec![(font.name.clone(), Language::English_UnitedStates)];
            info.weight = Weight(font.weight);
            db.push_face_info(info);
        }
    }

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{compose, ImageSources};
    use crate::testutil::{fixture_font, tiny_png_data_uri, FIXTURE_FAMILY};
    use chrono::NaiveDate;

    fn tree(title: &str, description: &str) -> Node {
        let images = ImageSources {
            background: tiny_png_data_uri(),
            favicon: tiny_png_data_uri(),
        };
        compose(
            title,
            description,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            &images,
        )
    }

    fn sample_tree() -> Node {
        tree(
            "Building a blog in Rust",
            "Notes from rewriting a personal site.",
        )
    }

    /// Regular and bold under a name that differs from the one inside the file.
    fn inter() -> Vec<Font> {
        vec![
            Font::new("Inter", 400, fixture_font()),
            Font::new("Inter", 700, fixture_font()),
        ]
    }

    fn png_size(png: &[u8]) -> (u32, u32) {
        let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
        let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
        (width, height)
    }

    #[test]
    fn renders_fixed_width_png() {
        let png = Rasterizer::default().render(&sample_tree(), &inter()).unwrap();

        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(png_size(&png), (1200, 630));
    }

    #[test]
    fn rendering_is_deterministic() {
        let rasterizer = Rasterizer::default();

        let first = rasterizer.render(&sample_tree(), &inter()).unwrap();
        let second = rasterizer.render(&sample_tree(), &inter()).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, rasterizer.render(&tree("", ""), &inter()).unwrap());
    }

    #[test]
    fn text_is_drawn_under_the_supplied_name() {
        let rasterizer = Rasterizer::default();
        let blank = tree("", "");
        let titled = tree("Hello world title", "Some description");

        for name in ["Inter", FIXTURE_FAMILY] {
            let fonts = vec![Font::new(name, 400, fixture_font())];
            let without = rasterizer.render(&blank, &fonts).unwrap();
            let with = rasterizer.render(&titled, &fonts).unwrap();

            assert_ne!(without, with, "text missing when named {name}");
        }
    }

    #[test]
    fn text_without_fonts_fails() {
        let result = Rasterizer::default().render(&sample_tree(), &[]);

        assert!(matches!(result, Err(RasterError::MissingFont { .. })));
    }

    #[test]
    fn registers_faces_under_supplied_names() {
        let db = font_database(&inter()).unwrap();

        let mut faces: Vec<(String, u16)> = db
            .faces()
            .map(|f| (f.families[0].0.clone(), f.weight.0))
            .collect();
        faces.sort();
        assert_eq!(
            faces,
            vec![("Inter".to_string(), 400), ("Inter".to_string(), 700)]
        );
    }

    #[test]
    fn fit_width_scales_height() {
        let png = Rasterizer::new(1200, 630, 600)
            .render(&sample_tree(), &inter())
            .unwrap();

        assert_eq!(png_size(&png), (600, 315));
    }

    #[test]
    fn malformed_font_fails_whole_render() {
        let fonts = vec![Font::new("Inter", 700, vec![0u8; 12])];

        let result = Rasterizer::default().render(&sample_tree(), &fonts);

        assert!(matches!(result, Err(RasterError::InvalidFont { .. })));
    }

    #[test]
    fn rejects_unparsable_svg() {
        let result = Rasterizer::default().rasterize_svg("<svg", &[]);

        assert!(matches!(result, Err(RasterError::Svg(_))));
    }
}
