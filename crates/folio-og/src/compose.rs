//! Social preview composition.
//!
//! Turns an entry's title, description, and publish date into the layout tree
//! rendered for `og/<slug>.png`.

use chrono::NaiveDate;

use crate::node::{
    Align, BoxStyle, Color, Direction, Inset, Justify, Node, ObjectFit, ObjectPosition, TextStyle,
    CANVAS_HEIGHT, CANVAS_WIDTH,
};

/// Titles longer than this many characters use the smaller font size.
pub const TITLE_BREAKPOINT: usize = 45;

/// Descriptions longer than this many characters are cut.
pub const DESCRIPTION_LIMIT: usize = 150;

const TITLE_SIZE: f32 = 56.0;
const TITLE_SIZE_LONG: f32 = 48.0;
const MUTED: Color = Color::rgb(0xd4, 0xd4, 0xd4);

/// Background layer height; taller than the canvas so the bottom is cropped.
pub const BACKGROUND_HEIGHT: f32 = 900.0;

/// Encoded images embedded in the composition.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSources {
    /// Data URI of the background image.
    pub background: String,
    /// Data URI of the site favicon.
    pub favicon: String,
}

/// Title font size in pixels.
pub fn title_font_size(title: &str) -> f32 {
    if title.chars().count() > TITLE_BREAKPOINT {
        TITLE_SIZE_LONG
    } else {
        TITLE_SIZE
    }
}

/// Cut a description to [`DESCRIPTION_LIMIT`] characters plus `...`.
///
/// The cut counts characters, not words, so it may split a word.
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() > DESCRIPTION_LIMIT {
        let mut cut: String = description.chars().take(DESCRIPTION_LIMIT).collect();
        cut.push_str("...");
        cut
    } else {
        description.to_string()
    }
}

/// Long US-style date, e.g. `March 5, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Build the preview layout for one entry.
pub fn compose(title: &str, description: &str, date: NaiveDate, images: &ImageSources) -> Node {
    let background = Node::Image {
        style: BoxStyle {
            width: Some(CANVAS_WIDTH as f32),
            height: Some(BACKGROUND_HEIGHT),
            absolute: Some(Inset::top_left()),
            ..BoxStyle::default()
        },
        src: images.background.clone(),
        fit: ObjectFit::Cover,
        position: ObjectPosition::Top,
    };

    let overlay = Node::container(
        BoxStyle {
            absolute: Some(Inset::fill()),
            background: Some(Color::rgba(0, 0, 0, 0.65)),
            ..BoxStyle::default()
        },
        Vec::new(),
    );

    let favicon = Node::image(
        BoxStyle {
            border_radius: 10.0,
            ..BoxStyle::sized(56.0, 56.0)
        },
        images.favicon.clone(),
    );

    let heading = Node::text(
        TextStyle {
            font_size: title_font_size(title),
            font_weight: 700,
            color: Color::WHITE,
            line_height: 1.2,
            letter_spacing: -0.025,
        },
        title,
    );

    let summary = Node::text(
        TextStyle {
            font_size: 22.0,
            font_weight: 400,
            color: MUTED,
            line_height: 1.5,
            letter_spacing: 0.0,
        },
        truncate_description(description),
    );

    let body = Node::container(
        BoxStyle {
            flex_grow: 1.0,
            direction: Direction::Column,
            justify: Justify::Center,
            gap: 20.0,
            max_width: Some(850.0),
            ..BoxStyle::default()
        },
        vec![heading, summary],
    );

    let footer = Node::container(
        BoxStyle {
            direction: Direction::Row,
            align: Align::Center,
            ..BoxStyle::default()
        },
        vec![Node::text(
            TextStyle {
                font_size: 18.0,
                font_weight: 400,
                color: MUTED,
                line_height: 1.2,
                letter_spacing: 0.0,
            },
            format_date(date),
        )],
    );

    Node::container(
        BoxStyle {
            width: Some(CANVAS_WIDTH as f32),
            height: Some(CANVAS_HEIGHT as f32),
            direction: Direction::Column,
            padding: 60.0,
            clip: true,
            ..BoxStyle::default()
        },
        vec![background, overlay, favicon, body, footer],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images() -> ImageSources {
        ImageSources {
            background: "data:image/png;base64,AAAA".to_string(),
            favicon: "data:image/png;base64,BBBB".to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn title_size_steps_after_breakpoint() {
        assert_eq!(title_font_size(&"a".repeat(44)), 56.0);
        assert_eq!(title_font_size(&"a".repeat(45)), 56.0);
        assert_eq!(title_font_size(&"a".repeat(46)), 48.0);
        assert_eq!(title_font_size(""), 56.0);
    }

    #[test]
    fn title_size_counts_characters() {
        // 45 multi-byte characters stay in the large bucket.
        assert_eq!(title_font_size(&"é".repeat(45)), 56.0);
    }

    #[test]
    fn short_description_is_untouched() {
        let exact = "x".repeat(150);
        assert_eq!(truncate_description(&exact), exact);
        assert_eq!(truncate_description("short"), "short");
    }

    #[test]
    fn long_description_is_cut_mid_word() {
        let long = "word ".repeat(40);
        let cut = truncate_description(&long);

        assert_eq!(cut.chars().count(), 153);
        assert_eq!(cut, format!("{}...", &long[..150]));
    }

    #[test]
    fn formats_dates_without_padding() {
        assert_eq!(format_date(date(2024, 3, 5)), "March 5, 2024");
        assert_eq!(format_date(date(2023, 12, 25)), "December 25, 2023");
    }

    #[test]
    fn composes_fixed_canvas() {
        let tree = compose("Hello", "World", date(2024, 3, 5), &images());
        let style = tree.style();

        assert_eq!(style.width, Some(1200.0));
        assert_eq!(style.height, Some(630.0));
        assert!(style.clip);
    }

    #[test]
    fn background_overflows_canvas_from_top() {
        let tree = compose("Hello", "World", date(2024, 3, 5), &images());

        match &tree.children()[0] {
            Node::Image {
                style,
                src,
                fit,
                position,
            } => {
                assert_eq!(style.width, Some(1200.0));
                assert_eq!(style.height, Some(900.0));
                assert_eq!(*fit, ObjectFit::Cover);
                assert_eq!(*position, ObjectPosition::Top);
                assert_eq!(src, "data:image/png;base64,AAAA");
            }
            other => panic!("expected background image, got {other:?}"),
        }
    }

    #[test]
    fn texts_carry_title_description_and_date() {
        let title = "A title that is definitely longer than forty-five chars";
        let tree = compose(title, &"d".repeat(200), date(2024, 3, 5), &images());
        let texts = tree.texts();

        assert_eq!(texts.len(), 3);
        assert_eq!(texts[0].0, title);
        assert_eq!(texts[0].1.font_size, 48.0);
        assert_eq!(texts[0].1.font_weight, 700);
        assert_eq!(texts[1].0.chars().count(), 153);
        assert_eq!(texts[2].0, "March 5, 2024");
    }

    #[test]
    fn empty_title_yields_empty_text_box() {
        let tree = compose("", "", date(2024, 1, 1), &images());
        let texts = tree.texts();

        assert_eq!(texts[0].0, "");
        assert_eq!(texts[1].0, "");
    }
}
