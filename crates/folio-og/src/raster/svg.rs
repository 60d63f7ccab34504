//! SVG serialization of a placed tree.

use quick_xml::escape::escape;

use crate::node::{Color, Node, ObjectFit, ObjectPosition, TextStyle};
use crate::raster::flow::{Placed, Rect};
use crate::raster::metrics::Metrics;
use crate::raster::RasterError;

/// Serialize a placed tree into a standalone SVG document.
///
/// Text names the supplied font closest to its weight. Text with no font to
/// draw it is an error.
pub fn write_svg(
    root: &Placed,
    width: u32,
    height: u32,
    metrics: &Metrics,
) -> Result<String, RasterError> {
    let mut writer = SvgWriter {
        out: String::new(),
        metrics,
        next_clip: 0,
    };

    writer.out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    ));
    writer.node(root)?;
    writer.out.push_str("</svg>");
    Ok(writer.out)
}

struct SvgWriter<'m, 'f> {
    out: String,
    metrics: &'m Metrics<'f>,
    next_clip: usize,
}

impl SvgWriter<'_, '_> {
    fn node(&mut self, placed: &Placed) -> Result<(), RasterError> {
        let style = placed.node.style();
        let rect = placed.rect;

        match placed.node {
            Node::Container { .. } => {
                if let Some(color) = style.background {
                    self.out.push_str(&format!(
                        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}"{}/>"#,
                        num(rect.x),
                        num(rect.y),
                        num(rect.w),
                        num(rect.h),
                        num(style.border_radius),
                        fill(color)
                    ));
                }

                if style.clip {
                    let id = self.clip(rect, style.border_radius);
                    self.out
                        .push_str(&format!(r#"<g clip-path="url(#{id})">"#));
                    for child in &placed.children {
                        self.node(child)?;
                    }
                    self.out.push_str("</g>");
                } else {
                    for child in &placed.children {
                        self.node(child)?;
                    }
                }
            }
            Node::Image {
                src, fit, position, ..
            } => {
                let aspect = match (fit, position) {
                    (ObjectFit::Fill, _) => "none",
                    (ObjectFit::Cover, ObjectPosition::Top) => "xMidYMin slice",
                    (ObjectFit::Cover, ObjectPosition::Center) => "xMidYMid slice",
                };
                let clip = if style.border_radius > 0.0 {
                    let id = self.clip(rect, style.border_radius);
                    format!(r#" clip-path="url(#{id})""#)
                } else {
                    String::new()
                };
                self.out.push_str(&format!(
                    r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="{aspect}" xlink:href="{}"{clip}/>"#,
                    num(rect.x),
                    num(rect.y),
                    num(rect.w),
                    num(rect.h),
                    escape(src.as_str())
                ));
            }
            Node::Text { text_style, .. } => self.text(placed, text_style)?,
        }
        Ok(())
    }

    fn text(&mut self, placed: &Placed, style: &TextStyle) -> Result<(), RasterError> {
        if placed.lines.is_empty() {
            return Ok(());
        }
        let family = self
            .metrics
            .family_for(style.font_weight)
            .ok_or(RasterError::MissingFont {
                weight: style.font_weight,
            })?;

        let padding = placed.node.style().padding;
        let (ascent, descent) = self.metrics.vertical(style.font_weight);
        let line_box = style.font_size * style.line_height;
        let content = (ascent - descent) * style.font_size;
        let x = placed.rect.x + padding;

        for (i, line) in placed.lines.iter().enumerate() {
            let top = placed.rect.y + padding + i as f32 * line_box;
            let baseline = top + (line_box - content) / 2.0 + ascent * style.font_size;
            self.out.push_str(&format!(
                r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" letter-spacing="{}" xml:space="preserve"{}>{}</text>"#,
                num(x),
                num(baseline),
                escape(family),
                num(style.font_size),
                style.font_weight,
                num(style.letter_spacing * style.font_size),
                fill(style.color),
                escape(line.text.as_str())
            ));
        }
        Ok(())
    }

    /// Emit a clip path for `rect` and return its id.
    fn clip(&mut self, rect: Rect, radius: f32) -> String {
        let id = format!("clip{}", self.next_clip);
        self.next_clip += 1;
        self.out.push_str(&format!(
            r#"<clipPath id="{id}"><rect x="{}" y="{}" width="{}" height="{}" rx="{}"/></clipPath>"#,
            num(rect.x),
            num(rect.y),
            num(rect.w),
            num(rect.h),
            num(radius)
        ));
        id
    }
}

fn fill(color: Color) -> String {
    if color.a >= 1.0 {
        format!(r#" fill="{}""#, color.hex())
    } else {
        format!(r#" fill="{}" fill-opacity="{}""#, color.hex(), num(color.a))
    }
}

/// Fixed-precision number without trailing zeros.
fn num(value: f32) -> String {
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{BoxStyle, Inset};
    use crate::raster::flow::resolve;
    use crate::raster::Font;
    use crate::testutil::fixture_font;

    #[test]
    fn formats_numbers_compactly() {
        assert_eq!(num(60.0), "60");
        assert_eq!(num(0.65), "0.65");
        assert_eq!(num(-1.4), "-1.4");
        assert_eq!(num(-0.0001), "0");
    }

    #[test]
    fn writes_overlay_and_text() {
        let tree = Node::container(
            BoxStyle::default(),
            vec![
                Node::container(
                    BoxStyle {
                        absolute: Some(Inset::fill()),
                        background: Some(Color::rgba(0, 0, 0, 0.65)),
                        ..BoxStyle::default()
                    },
                    vec![],
                ),
                Node::text(TextStyle::default(), "Fish & <Chips>"),
            ],
        );
        let fonts = vec![Font::new("Inter", 400, fixture_font())];
        let metrics = Metrics::new(&fonts).unwrap();
        let placed = resolve(&tree, 1200.0, 630.0, &metrics);

        let svg = write_svg(&placed, 1200, 630, &metrics).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="1200" height="630""#));
        assert!(svg.contains(r##"fill="#000000" fill-opacity="0.65""##));
        assert!(svg.contains("Fish &amp; &lt;Chips&gt;"));
        assert!(svg.contains(r#"font-family="Inter""#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn rounded_images_get_a_clip_path() {
        let tree = Node::container(
            BoxStyle::default(),
            vec![Node::image(
                BoxStyle {
                    border_radius: 10.0,
                    ..BoxStyle::sized(56.0, 56.0)
                },
                "data:image/png;base64,AAAA",
            )],
        );
        let metrics = Metrics::new(&[]).unwrap();
        let placed = resolve(&tree, 100.0, 100.0, &metrics);

        let svg = write_svg(&placed, 100, 100, &metrics).unwrap();

        assert!(svg.contains(r#"<clipPath id="clip0">"#));
        assert!(svg.contains(r#"clip-path="url(#clip0)""#));
        assert!(svg.contains(r#"preserveAspectRatio="none""#));
    }

    #[test]
    fn text_without_fonts_is_an_error() {
        let tree = Node::container(
            BoxStyle::default(),
            vec![Node::text(
                TextStyle {
                    font_weight: 700,
                    ..TextStyle::default()
                },
                "Title",
            )],
        );
        let metrics = Metrics::new(&[]).unwrap();
        let placed = resolve(&tree, 100.0, 100.0, &metrics);

        let result = write_svg(&placed, 100, 100, &metrics);

        assert!(matches!(result, Err(RasterError::MissingFont { weight: 700 })));
    }

    #[test]
    fn empty_text_needs_no_font() {
        let tree = Node::container(BoxStyle::default(), vec![Node::text(TextStyle::default(), "")]);
        let metrics = Metrics::new(&[]).unwrap();
        let placed = resolve(&tree, 100.0, 100.0, &metrics);

        assert!(write_svg(&placed, 100, 100, &metrics).is_ok());
    }
}
