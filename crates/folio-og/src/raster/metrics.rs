//! Glyph metrics used for line breaking.

use ttf_parser::Face;

use crate::node::TextStyle;
use crate::raster::{Font, RasterError};

// Used when no supplied face matches.
const FALLBACK_ADVANCE: f32 = 0.55;
const FALLBACK_ASCENT: f32 = 0.8;
const FALLBACK_DESCENT: f32 = -0.2;

struct LoadedFace<'a> {
    name: &'a str,
    weight: u16,
    face: Face<'a>,
}

/// Parsed faces for the fonts of one render call.
pub struct Metrics<'a> {
    faces: Vec<LoadedFace<'a>>,
}

impl<'a> Metrics<'a> {
    /// Parse every font; any malformed buffer fails the call.
    pub fn new(fonts: &'a [Font]) -> Result<Self, RasterError> {
        let faces = fonts
            .iter()
            .map(|font| {
                Face::parse(&font.data, 0)
                    .map(|face| LoadedFace {
                        name: font.name.as_str(),
                        weight: font.weight,
                        face,
                    })
                    .map_err(|e| RasterError::InvalidFont {
                        name: font.name.clone(),
                        weight: font.weight,
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { faces })
    }

    fn loaded_for(&self, weight: u16) -> Option<&LoadedFace<'a>> {
        self.faces.iter().min_by_key(|f| f.weight.abs_diff(weight))
    }

    fn face_for(&self, weight: u16) -> Option<&Face<'a>> {
        self.loaded_for(weight).map(|f| &f.face)
    }

    /// Supplied name of the font closest to `weight`.
    pub fn family_for(&self, weight: u16) -> Option<&'a str> {
        self.loaded_for(weight).map(|f| f.name)
    }

    /// Rendered width of `text` on one line.
    pub fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
        let spacing = style.letter_spacing * style.font_size;
        let face = self.face_for(style.font_weight);

        text.chars()
            .map(|c| {
                let advance = face
                    .and_then(|face| {
                        let glyph = face.glyph_index(c)?;
                        let advance = face.glyph_hor_advance(glyph)?;
                        Some(advance as f32 / face.units_per_em() as f32)
                    })
                    .unwrap_or(FALLBACK_ADVANCE);
                advance * style.font_size + spacing
            })
            .sum()
    }

    /// Ascender and descender as fractions of the em (descender is negative).
    pub fn vertical(&self, weight: u16) -> (f32, f32) {
        match self.face_for(weight) {
            Some(face) => {
                let upm = face.units_per_em() as f32;
                (face.ascender() as f32 / upm, face.descender() as f32 / upm)
            }
            None => (FALLBACK_ASCENT, FALLBACK_DESCENT),
        }
    }
}

/// One wrapped line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub width: f32,
}

/// Greedy word wrap. A word wider than `max_width` gets a line of its own.
pub fn wrap(text: &str, max_width: f32, style: &TextStyle, metrics: &Metrics) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if metrics.text_width(&candidate, style) > max_width {
            let width = metrics.text_width(&current, style);
            lines.push(Line {
                text: std::mem::take(&mut current),
                width,
            });
            current.push_str(word);
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        let width = metrics.text_width(&current, style);
        lines.push(Line {
            text: current,
            width,
        });
    }

    lines
}
