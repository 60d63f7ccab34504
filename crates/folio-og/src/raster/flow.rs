//! Box placement for the layout tree.
//!
//! Covers the flexbox subset the composer uses: a single main axis, padding,
//! gap, `flex-grow`, start/center justification, stretch/start/center
//! alignment, `max-width`, and absolutely positioned children.

use crate::node::{Align, BoxStyle, Direction, Justify, Node};
use crate::raster::metrics::{wrap, Line, Metrics};

/// A resolved rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    fn inset(&self, by: f32) -> Rect {
        Rect {
            x: self.x + by,
            y: self.y + by,
            w: (self.w - 2.0 * by).max(0.0),
            h: (self.h - 2.0 * by).max(0.0),
        }
    }
}

/// A node with its resolved geometry.
#[derive(Debug)]
pub struct Placed<'a> {
    pub node: &'a Node,
    pub rect: Rect,
    /// Wrapped lines; empty unless the node is text.
    pub lines: Vec<Line>,
    pub children: Vec<Placed<'a>>,
}

/// Resolve the whole tree against a canvas.
pub fn resolve<'a>(root: &'a Node, width: f32, height: f32, metrics: &Metrics) -> Placed<'a> {
    place(root, Rect::new(0.0, 0.0, width, height), metrics)
}

fn place<'a>(node: &'a Node, rect: Rect, metrics: &Metrics) -> Placed<'a> {
    match node {
        Node::Text {
            style,
            text_style,
            content,
        } => {
            let inner = rect.inset(style.padding);
            Placed {
                node,
                rect,
                lines: wrap(content, inner.w, text_style, metrics),
                children: Vec::new(),
            }
        }
        Node::Image { .. } => Placed {
            node,
            rect,
            lines: Vec::new(),
            children: Vec::new(),
        },
        Node::Container { style, children } => {
            let inner = rect.inset(style.padding);
            let flow: Vec<&Node> = children.iter().filter(|c| !c.is_absolute()).collect();
            let mut flow_rects = layout_flow(&flow, style, inner, metrics).into_iter();

            let placed = children
                .iter()
                .map(|child| {
                    let child_rect = if child.is_absolute() {
                        absolute_rect(child, rect, metrics)
                    } else {
                        flow_rects.next().unwrap_or_default()
                    };
                    place(child, child_rect, metrics)
                })
                .collect();

            Placed {
                node,
                rect,
                lines: Vec::new(),
                children: placed,
            }
        }
    }
}

/// Position in-flow children inside `inner`, in order.
fn layout_flow(
    flow: &[&Node],
    style: &BoxStyle,
    inner: Rect,
    metrics: &Metrics,
) -> Vec<Rect> {
    if flow.is_empty() {
        return Vec::new();
    }

    let (main_avail, cross_avail) = match style.direction {
        Direction::Column => (inner.h, inner.w),
        Direction::Row => (inner.w, inner.h),
    };

    // (main, cross) per child
    let mut sizes: Vec<(f32, f32)> = flow
        .iter()
        .map(|child| child_size(child, style.direction, style.align, cross_avail, metrics))
        .collect();

    let gaps = style.gap * (flow.len() - 1) as f32;
    let used: f32 = sizes.iter().map(|(main, _)| main).sum::<f32>() + gaps;
    let free = (main_avail - used).max(0.0);

    let grow_total: f32 = flow.iter().map(|c| c.style().flex_grow).sum();
    let mut cursor = 0.0;
    if grow_total > 0.0 {
        for (child, size) in flow.iter().zip(sizes.iter_mut()) {
            size.0 += free * child.style().flex_grow / grow_total;
        }
    } else if style.justify == Justify::Center {
        cursor = free / 2.0;
    }

    let mut rects = Vec::with_capacity(flow.len());
    for (main, cross) in sizes {
        let cross_offset = match style.align {
            Align::Center => (cross_avail - cross) / 2.0,
            Align::Stretch | Align::Start => 0.0,
        };

        let rect = match style.direction {
            Direction::Column => Rect::new(inner.x + cross_offset, inner.y + cursor, cross, main),
            Direction::Row => Rect::new(inner.x + cursor, inner.y + cross_offset, main, cross),
        };
        rects.push(rect);
        cursor += main + style.gap;
    }

    rects
}

/// Main and cross size of an in-flow child before growing.
fn child_size(
    child: &Node,
    direction: Direction,
    align: Align,
    cross_avail: f32,
    metrics: &Metrics,
) -> (f32, f32) {
    let style = child.style();
    match direction {
        Direction::Column => {
            let width = style.width.unwrap_or_else(|| {
                let limit = cap(cross_avail, style.max_width);
                match align {
                    Align::Stretch => limit,
                    Align::Start | Align::Center => intrinsic_width(child, metrics).min(limit),
                }
            });
            let height = style
                .height
                .unwrap_or_else(|| intrinsic_height(child, width, metrics));
            (height, width)
        }
        Direction::Row => {
            let width = style
                .width
                .unwrap_or_else(|| intrinsic_width(child, metrics))
                .min(cap(f32::INFINITY, style.max_width));
            let height = style.height.unwrap_or_else(|| match align {
                Align::Stretch => cross_avail,
                Align::Start | Align::Center => intrinsic_height(child, width, metrics),
            });
            (width, height)
        }
    }
}

fn absolute_rect(child: &Node, parent: Rect, metrics: &Metrics) -> Rect {
    let style = child.style();
    let inset = style.absolute.unwrap_or_default();

    let left = inset.left.unwrap_or(0.0);
    let top = inset.top.unwrap_or(0.0);

    let width = style.width.unwrap_or_else(|| match inset.right {
        Some(right) if inset.left.is_some() => (parent.w - left - right).max(0.0),
        _ => intrinsic_width(child, metrics),
    });
    let height = style.height.unwrap_or_else(|| match inset.bottom {
        Some(bottom) if inset.top.is_some() => (parent.h - top - bottom).max(0.0),
        _ => intrinsic_height(child, width, metrics),
    });

    let x = match (inset.left, inset.right) {
        (None, Some(right)) => parent.x + parent.w - right - width,
        _ => parent.x + left,
    };
    let y = match (inset.top, inset.bottom) {
        (None, Some(bottom)) => parent.y + parent.h - bottom - height,
        _ => parent.y + top,
    };

    Rect::new(x, y, width, height)
}

fn cap(value: f32, max: Option<f32>) -> f32 {
    match max {
        Some(max) => value.min(max),
        None => value,
    }
}

/// Width a node wants when nothing constrains it.
fn intrinsic_width(node: &Node, metrics: &Metrics) -> f32 {
    let style = node.style();
    if let Some(width) = style.width {
        return width;
    }

    let content = match node {
        Node::Text {
            text_style,
            content,
            ..
        } => {
            let single_line = content.split_whitespace().collect::<Vec<_>>().join(" ");
            metrics.text_width(&single_line, text_style)
        }
        Node::Image { .. } => 0.0,
        Node::Container { children, .. } => {
            let flow = children.iter().filter(|c| !c.is_absolute());
            match style.direction {
                Direction::Row => {
                    let count = flow.clone().count();
                    let gaps = style.gap * count.saturating_sub(1) as f32;
                    flow.map(|c| intrinsic_width(c, metrics)).sum::<f32>() + gaps
                }
                Direction::Column => flow
                    .map(|c| intrinsic_width(c, metrics))
                    .fold(0.0, f32::max),
            }
        }
    };

    cap(content + 2.0 * style.padding, style.max_width)
}

/// Height a node needs at a given width.
fn intrinsic_height(node: &Node, width: f32, metrics: &Metrics) -> f32 {
    let style = node.style();
    if let Some(height) = style.height {
        return height;
    }

    let inner_w = (width - 2.0 * style.padding).max(0.0);
    let content = match node {
        Node::Text {
            text_style,
            content,
            ..
        } => {
            let lines = wrap(content, inner_w, text_style, metrics).len();
            lines as f32 * text_style.font_size * text_style.line_height
        }
        Node::Image { .. } => 0.0,
        Node::Container { children, .. } => {
            let flow: Vec<&Node> = children.iter().filter(|c| !c.is_absolute()).collect();
            match style.direction {
                Direction::Column => {
                    let gaps = style.gap * flow.len().saturating_sub(1) as f32;
                    flow.iter()
                        .map(|c| {
                            let (main, _) =
                                child_size(c, Direction::Column, style.align, inner_w, metrics);
                            main
                        })
                        .sum::<f32>()
                        + gaps
                }
                Direction::Row => flow
                    .iter()
                    .map(|c| {
                        let w = c.style().width.unwrap_or_else(|| intrinsic_width(c, metrics));
                        intrinsic_height(c, w, metrics)
                    })
                    .fold(0.0, f32::max),
            }
        }
    };

    content + 2.0 * style.padding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Inset, TextStyle};

    fn text(size: f32, content: &str) -> Node {
        Node::text(
            TextStyle {
                font_size: size,
                line_height: 1.0,
                ..TextStyle::default()
            },
            content,
        )
    }

    #[test]
    fn column_stacks_with_padding_and_gap() {
        let tree = Node::container(
            BoxStyle {
                padding: 10.0,
                gap: 5.0,
                ..BoxStyle::default()
            },
            vec![
                Node::image(BoxStyle::sized(20.0, 20.0), ""),
                Node::image(BoxStyle::sized(30.0, 30.0), ""),
            ],
        );
        let metrics = Metrics::new(&[]).unwrap();

        let placed = resolve(&tree, 200.0, 100.0, &metrics);

        assert_eq!(placed.children[0].rect, Rect::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(placed.children[1].rect, Rect::new(10.0, 35.0, 30.0, 30.0));
    }

    #[test]
    fn grow_takes_remaining_space() {
        let tree = Node::container(
            BoxStyle::default(),
            vec![
                Node::image(BoxStyle::sized(10.0, 10.0), ""),
                Node::container(
                    BoxStyle {
                        flex_grow: 1.0,
                        ..BoxStyle::default()
                    },
                    vec![],
                ),
                Node::image(BoxStyle::sized(10.0, 20.0), ""),
            ],
        );
        let metrics = Metrics::new(&[]).unwrap();

        let placed = resolve(&tree, 100.0, 100.0, &metrics);

        assert_eq!(placed.children[1].rect, Rect::new(0.0, 10.0, 100.0, 70.0));
        assert_eq!(placed.children[2].rect.y, 80.0);
    }

    #[test]
    fn justify_center_splits_free_space() {
        let tree = Node::container(
            BoxStyle {
                justify: Justify::Center,
                ..BoxStyle::default()
            },
            vec![Node::image(BoxStyle::sized(10.0, 40.0), "")],
        );
        let metrics = Metrics::new(&[]).unwrap();

        let placed = resolve(&tree, 100.0, 100.0, &metrics);

        assert_eq!(placed.children[0].rect.y, 30.0);
    }

    #[test]
    fn max_width_limits_stretched_children() {
        let tree = Node::container(
            BoxStyle::default(),
            vec![Node::container(
                BoxStyle {
                    max_width: Some(50.0),
                    ..BoxStyle::default()
                },
                vec![],
            )],
        );
        let metrics = Metrics::new(&[]).unwrap();

        let placed = resolve(&tree, 100.0, 100.0, &metrics);

        assert_eq!(placed.children[0].rect.w, 50.0);
    }

    #[test]
    fn absolute_children_leave_the_flow() {
        let tree = Node::container(
            BoxStyle {
                padding: 10.0,
                ..BoxStyle::default()
            },
            vec![
                Node::container(
                    BoxStyle {
                        absolute: Some(Inset::fill()),
                        ..BoxStyle::default()
                    },
                    vec![],
                ),
                Node::image(BoxStyle::sized(10.0, 10.0), ""),
            ],
        );
        let metrics = Metrics::new(&[]).unwrap();

        let placed = resolve(&tree, 100.0, 80.0, &metrics);

        assert_eq!(placed.children[0].rect, Rect::new(0.0, 0.0, 100.0, 80.0));
        assert_eq!(placed.children[1].rect, Rect::new(10.0, 10.0, 10.0, 10.0));
    }

    #[test]
    fn text_height_follows_wrapped_lines() {
        let tree = Node::container(BoxStyle::default(), vec![text(10.0, "aaaa bbbb cccc")]);
        let metrics = Metrics::new(&[]).unwrap();

        let placed = resolve(&tree, 50.0, 100.0, &metrics);
        let label = &placed.children[0];

        assert_eq!(label.lines.len(), 2);
        assert_eq!(label.rect.h, 20.0);
    }

    #[test]
    fn row_centers_cross_axis() {
        let tree = Node::container(
            BoxStyle::default(),
            vec![Node::container(
                BoxStyle {
                    direction: Direction::Row,
                    align: Align::Center,
                    height: Some(40.0),
                    ..BoxStyle::default()
                },
                vec![text(10.0, "ab")],
            )],
        );
        let metrics = Metrics::new(&[]).unwrap();

        let placed = resolve(&tree, 100.0, 100.0, &metrics);
        let label = &placed.children[0].children[0];

        assert_eq!(label.rect, Rect::new(0.0, 15.0, 11.0, 10.0));
    }
}
