//! Declarative layout tree handed to the rasterizer.

/// Canvas width of every social preview image.
pub const CANVAS_WIDTH: u32 = 1200;

/// Canvas height of every social preview image.
pub const CANVAS_HEIGHT: u32 = 630;

/// An sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Hex notation without alpha (`#rrggbb`).
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Main axis of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Column,
    Row,
}

/// Placement of in-flow children along the main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Start,
    Center,
}

/// Placement of in-flow children along the cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Stretch,
    Start,
    Center,
}

/// How an image fills its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectFit {
    #[default]
    Fill,
    Cover,
}

/// Anchor used when an image is cropped by [`ObjectFit::Cover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectPosition {
    #[default]
    Center,
    Top,
}

/// Offsets of an absolutely positioned box, relative to its parent's border box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Inset {
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub left: Option<f32>,
}

impl Inset {
    /// Pin all four edges to the parent.
    pub fn fill() -> Self {
        Self {
            top: Some(0.0),
            right: Some(0.0),
            bottom: Some(0.0),
            left: Some(0.0),
        }
    }

    /// Pin the top-left corner to the parent.
    pub fn top_left() -> Self {
        Self {
            top: Some(0.0),
            left: Some(0.0),
            ..Self::default()
        }
    }
}

/// Box model attributes shared by every node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxStyle {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub max_width: Option<f32>,
    pub padding: f32,
    pub gap: f32,
    pub flex_grow: f32,
    pub direction: Direction,
    pub justify: Justify,
    pub align: Align,
    /// `Some` takes the box out of flow.
    pub absolute: Option<Inset>,
    pub background: Option<Color>,
    pub border_radius: f32,
    /// Clip descendants to this box.
    pub clip: bool,
}

impl BoxStyle {
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }
}

/// Typography of a text node.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub font_weight: u16,
    pub color: Color,
    /// Multiple of `font_size`.
    pub line_height: f32,
    /// In em.
    pub letter_spacing: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            font_weight: 400,
            color: Color::WHITE,
            line_height: 1.2,
            letter_spacing: 0.0,
        }
    }
}

/// One box in the composition tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Container {
        style: BoxStyle,
        children: Vec<Node>,
    },
    Image {
        style: BoxStyle,
        /// Data URI of the encoded image.
        src: String,
        fit: ObjectFit,
        position: ObjectPosition,
    },
    Text {
        style: BoxStyle,
        text_style: TextStyle,
        content: String,
    },
}

impl Node {
    pub fn container(style: BoxStyle, children: Vec<Node>) -> Self {
        Node::Container { style, children }
    }

    pub fn image(style: BoxStyle, src: impl Into<String>) -> Self {
        Node::Image {
            style,
            src: src.into(),
            fit: ObjectFit::Fill,
            position: ObjectPosition::Center,
        }
    }

    pub fn text(text_style: TextStyle, content: impl Into<String>) -> Self {
        Node::Text {
            style: BoxStyle::default(),
            text_style,
            content: content.into(),
        }
    }

    pub fn style(&self) -> &BoxStyle {
        match self {
            Node::Container { style, .. } | Node::Image { style, .. } | Node::Text { style, .. } => {
                style
            }
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Container { children, .. } => children,
            _ => &[],
        }
    }

    pub fn is_absolute(&self) -> bool {
        self.style().absolute.is_some()
    }

    /// Text nodes in paint order.
    pub fn texts(&self) -> Vec<(&str, &TextStyle)> {
        let mut out = Vec::new();
        self.collect_texts(&mut out);
        out
    }

    fn collect_texts<'a>(&'a self, out: &mut Vec<(&'a str, &'a TextStyle)>) {
        match self {
            Node::Text {
                text_style,
                content,
                ..
            } => out.push((content.as_str(), text_style)),
            Node::Container { children, .. } => {
                for child in children {
                    child.collect_texts(out);
                }
            }
            Node::Image { .. } => {}
        }
    }
}
