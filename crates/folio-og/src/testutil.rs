//! Fixtures shared by the unit tests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use resvg::tiny_skia;

/// Family name stored inside [`fixture_font`].
pub const FIXTURE_FAMILY: &str = "Fixture Sans";

const UNITS_PER_EM: u16 = 1000;
const FIRST_CHAR: u16 = 0x20;
const LAST_CHAR: u16 = 0x7E;
// .notdef, space, then one box per printable ASCII char
const NUM_GLYPHS: u16 = 2 + (LAST_CHAR - FIRST_CHAR);

/// A small TrueType font that draws a solid box for every printable ASCII
/// character.
///
/// Units per em 1000, ascender 800, descender -200. Its internal family is
/// [`FIXTURE_FAMILY`], so tests that name it anything else check that the
/// supplied name wins.
pub fn fixture_font() -> Vec<u8> {
    let mut head = Vec::with_capacity(54);
    head.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // version
    head.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // revision
    head.extend_from_slice(&0u32.to_be_bytes()); // checksum adjustment
    head.extend_from_slice(&0x5F0F_3CF5u32.to_be_bytes()); // magic
    head.extend_from_slice(&0u16.to_be_bytes()); // flags
    head.extend_from_slice(&UNITS_PER_EM.to_be_bytes());
    head.extend_from_slice(&[0u8; 16]); // created, modified
    for v in [0i16, -200, 600, 800] {
        head.extend_from_slice(&v.to_be_bytes()); // bbox
    }
    head.extend_from_slice(&0u16.to_be_bytes()); // mac style
    head.extend_from_slice(&8u16.to_be_bytes()); // lowest ppem
    head.extend_from_slice(&2i16.to_be_bytes()); // direction hint
    head.extend_from_slice(&0i16.to_be_bytes()); // short loca offsets
    head.extend_from_slice(&0i16.to_be_bytes()); // glyph data format
    assert_eq!(head.len(), 54);

    let mut hhea = Vec::with_capacity(36);
    hhea.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    hhea.extend_from_slice(&800i16.to_be_bytes());
    hhea.extend_from_slice(&(-200i16).to_be_bytes());
    hhea.extend_from_slice(&0i16.to_be_bytes()); // line gap
    hhea.extend_from_slice(&600u16.to_be_bytes()); // advance width max
    hhea.extend_from_slice(&[0u8; 22]);
    hhea.extend_from_slice(&NUM_GLYPHS.to_be_bytes()); // number of h metrics
    assert_eq!(hhea.len(), 36);

    let mut maxp = Vec::with_capacity(6);
    maxp.extend_from_slice(&0x0000_5000u32.to_be_bytes());
    maxp.extend_from_slice(&NUM_GLYPHS.to_be_bytes());

    let mut hmtx = Vec::new();
    for glyph in 0..NUM_GLYPHS {
        let advance: u16 = match glyph {
            0 => 500,
            1 => 250,
            _ => 600,
        };
        hmtx.extend_from_slice(&advance.to_be_bytes());
        hmtx.extend_from_slice(&50i16.to_be_bytes());
    }

    let square = box_glyph();
    let mut glyf = Vec::new();
    let mut loca = Vec::new();
    for glyph in 0..NUM_GLYPHS {
        loca.extend_from_slice(&((glyf.len() / 2) as u16).to_be_bytes());
        if glyph >= 2 {
            glyf.extend_from_slice(&square);
        }
    }
    loca.extend_from_slice(&((glyf.len() / 2) as u16).to_be_bytes());

    // Records must be sorted by tag.
    let cmap = cmap();
    let name = name_table();
    let tables: [(&[u8; 4], &[u8]); 8] = [
        (b"cmap", cmap.as_slice()),
        (b"glyf", glyf.as_slice()),
        (b"head", head.as_slice()),
        (b"hhea", hhea.as_slice()),
        (b"hmtx", hmtx.as_slice()),
        (b"loca", loca.as_slice()),
        (b"maxp", maxp.as_slice()),
        (b"name", name.as_slice()),
    ];

    assemble(&tables)
}

/// One closed contour: a 500x700 box on the baseline.
fn box_glyph() -> Vec<u8> {
    let mut glyph = Vec::new();
    glyph.extend_from_slice(&1i16.to_be_bytes()); // contours
    for v in [50i16, 0, 550, 700] {
        glyph.extend_from_slice(&v.to_be_bytes());
    }
    glyph.extend_from_slice(&3u16.to_be_bytes()); // last point of contour 0
    glyph.extend_from_slice(&0u16.to_be_bytes()); // no instructions
    glyph.extend_from_slice(&[0x01; 4]); // on-curve, full-width deltas
    for dx in [50i16, 0, 500, 0] {
        glyph.extend_from_slice(&dx.to_be_bytes());
    }
    for dy in [0i16, 700, 0, -700] {
        glyph.extend_from_slice(&dy.to_be_bytes());
    }
    glyph
}

/// Format 4 cmap: U+0020..U+007E map to glyphs 1..=95.
fn cmap() -> Vec<u8> {
    let delta = 1i16 - FIRST_CHAR as i16;

    let mut sub = Vec::new();
    sub.extend_from_slice(&4u16.to_be_bytes()); // format
    sub.extend_from_slice(&32u16.to_be_bytes()); // length
    sub.extend_from_slice(&0u16.to_be_bytes()); // language
    sub.extend_from_slice(&4u16.to_be_bytes()); // seg count x2
    sub.extend_from_slice(&4u16.to_be_bytes()); // search range
    sub.extend_from_slice(&1u16.to_be_bytes()); // entry selector
    sub.extend_from_slice(&0u16.to_be_bytes()); // range shift
    for end in [LAST_CHAR, 0xFFFF] {
        sub.extend_from_slice(&end.to_be_bytes());
    }
    sub.extend_from_slice(&0u16.to_be_bytes()); // reserved
    for start in [FIRST_CHAR, 0xFFFF] {
        sub.extend_from_slice(&start.to_be_bytes());
    }
    for d in [delta, 1] {
        sub.extend_from_slice(&d.to_be_bytes());
    }
    sub.extend_from_slice(&[0u8; 4]); // range offsets
    assert_eq!(sub.len(), 32);

    let mut cmap = Vec::new();
    cmap.extend_from_slice(&0u16.to_be_bytes()); // version
    cmap.extend_from_slice(&1u16.to_be_bytes()); // tables
    cmap.extend_from_slice(&3u16.to_be_bytes()); // Windows
    cmap.extend_from_slice(&1u16.to_be_bytes()); // Unicode BMP
    cmap.extend_from_slice(&12u32.to_be_bytes());
    cmap.extend_from_slice(&sub);
    cmap
}

/// Family (1), subfamily (2) and PostScript (6) names, Windows English.
fn name_table() -> Vec<u8> {
    let names = [(1u16, FIXTURE_FAMILY), (2, "Regular"), (6, "FixtureSans")];

    let mut strings = Vec::new();
    let mut records = Vec::new();
    for (id, text) in names {
        let encoded: Vec<u8> = text.encode_utf16().flat_map(u16::to_be_bytes).collect();
        for v in [3u16, 1, 0x0409, id, encoded.len() as u16, strings.len() as u16] {
            records.extend_from_slice(&v.to_be_bytes());
        }
        strings.extend_from_slice(&encoded);
    }

    let mut table = Vec::new();
    table.extend_from_slice(&0u16.to_be_bytes()); // format
    table.extend_from_slice(&(names.len() as u16).to_be_bytes());
    table.extend_from_slice(&(6 + records.len() as u16).to_be_bytes());
    table.extend_from_slice(&records);
    table.extend_from_slice(&strings);
    table
}

fn assemble(tables: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let mut font = Vec::new();
    font.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    font.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    font.extend_from_slice(&[0u8; 6]); // search range, entry selector, range shift

    let header = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in tables {
        font.extend_from_slice(*tag);
        font.extend_from_slice(&0u32.to_be_bytes()); // checksum
        font.extend_from_slice(&((header + body.len()) as u32).to_be_bytes());
        font.extend_from_slice(&(data.len() as u32).to_be_bytes());

        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
    }
    font.extend_from_slice(&body);
    font
}

/// A 4x4 opaque PNG.
pub fn tiny_png() -> Vec<u8> {
    let mut pixmap = tiny_skia::Pixmap::new(4, 4).unwrap();
    pixmap.fill(tiny_skia::Color::from_rgba8(40, 80, 120, 255));
    pixmap.encode_png().unwrap()
}

pub fn tiny_png_data_uri() -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(tiny_png()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttf_parser::{name_id, Face};

    #[test]
    fn fixture_font_has_outlines_and_names() {
        let data = fixture_font();
        let face = Face::parse(&data, 0).unwrap();

        let glyph = face.glyph_index('A').unwrap();
        assert_eq!(face.glyph_hor_advance(glyph), Some(600));
        assert_eq!(face.glyph_bounding_box(glyph).map(|b| b.height()), Some(700));
        assert_eq!(face.glyph_index(' ').map(|g| g.0), Some(1));
        assert_eq!(face.number_of_glyphs(), NUM_GLYPHS);

        let family = face
            .names()
            .into_iter()
            .find(|n| n.name_id == name_id::FAMILY)
            .and_then(|n| n.to_string());
        assert_eq!(family.as_deref(), Some(FIXTURE_FAMILY));
    }
}
