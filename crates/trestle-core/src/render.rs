//! Railroad layout and SVG output.
//!
//! Layout is a single recursive pass. Every [`Element`] is first measured into
//! an [`Extent`] (width along the track, reach above and below it) and then
//! drawn with its track entering at a given point on the left. Sizes are
//! derived from character counts, so the output does not depend on the fonts
//! installed on the rendering machine.
//!
//! | Element       | Drawing                                                   |
//! |---------------|-----------------------------------------------------------|
//! | Terminal      | rounded box                                               |
//! | NonTerminal   | square box                                                |
//! | Choice        | default branch on the track, the others above and below   |
//! | Optional      | the item on the track with a bypass above it              |
//! | OneOrMore     | a loop below the item, carrying the comment if present    |
//! | ZeroOrMore    | a OneOrMore loop with a bypass above it                   |
//! | Group         | a dashed frame with its caption above                     |
//! | Comment       | italic text                                               |

mod layer;
mod path;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use path::{PathData, Turn};

use log::trace;
use svg::node::{Text as SvgText, element as svg_element};

use crate::{
    diagram::{Diagram, DiagramKind, Element, Label, Start},
    geometry::{Extent, Point, Size},
};

/// Radius of every turn in the track.
pub const ARC_RADIUS: f32 = 10.0;
/// Minimum vertical gap between stacked branches.
pub const VERTICAL_SEPARATION: f32 = 8.0;
/// Horizontal advance of one character of box text.
pub const CHAR_WIDTH: f32 = 8.5;
/// Horizontal advance of one character of comment text.
pub const COMMENT_CHAR_WIDTH: f32 = 7.0;
/// Blank space around the whole diagram.
pub const DIAGRAM_PADDING: f32 = 20.0;

const BOX_HALF_HEIGHT: f32 = 11.0;
const BOX_TEXT_PADDING: f32 = 20.0;
const COMMENT_HALF_HEIGHT: f32 = 8.0;
const COMMENT_TEXT_PADDING: f32 = 10.0;
const SEQUENCE_GAP: f32 = 10.0;
const MARKER_WIDTH: f32 = 20.0;
const MARKER_HALF_HEIGHT: f32 = 10.0;
const CAPTION_HEIGHT: f32 = 14.0;
const TEXT_BASELINE_SHIFT: f32 = 4.0;

fn text_width(text: &str, char_width: f32) -> f32 {
    text.chars().count() as f32 * char_width
}

fn leaf_extent(label: &Label) -> Extent {
    Extent::new(
        text_width(label.text(), CHAR_WIDTH) + BOX_TEXT_PADDING,
        BOX_HALF_HEIGHT,
        BOX_HALF_HEIGHT,
    )
}

fn comment_extent(text: &str) -> Extent {
    Extent::new(
        text_width(text, COMMENT_CHAR_WIDTH) + COMMENT_TEXT_PADDING,
        COMMENT_HALF_HEIGHT,
        COMMENT_HALF_HEIGHT,
    )
}

/// Vertical distance between two stacked tracks: far enough apart for both
/// turns and for the elements not to touch.
fn track_distance(upper_down: f32, lower_up: f32) -> f32 {
    (2.0 * ARC_RADIUS).max(upper_down + VERTICAL_SEPARATION + lower_up)
}

/// Track offsets of each choice branch relative to the main track.
/// The default branch sits at 0, earlier branches above, later ones below.
fn choice_offsets(extents: &[Extent], default: usize) -> Vec<f32> {
    let default = default.min(extents.len().saturating_sub(1));
    let mut offsets = vec![0.0; extents.len()];
    for i in default + 1..extents.len() {
        offsets[i] = offsets[i - 1] + track_distance(extents[i - 1].down(), extents[i].up());
    }
    for i in (0..default).rev() {
        offsets[i] = offsets[i + 1] - track_distance(extents[i].down(), extents[i + 1].up());
    }
    offsets
}

fn choice_extent(extents: &[Extent], offsets: &[f32]) -> Extent {
    let inner = extents.iter().map(|e| e.width()).fold(0.0, f32::max);
    let up = extents
        .iter()
        .zip(offsets)
        .map(|(e, offset)| e.up() - offset)
        .fold(0.0, f32::max);
    let down = extents
        .iter()
        .zip(offsets)
        .map(|(e, offset)| e.down() + offset)
        .fold(0.0, f32::max);
    Extent::new(inner + 4.0 * ARC_RADIUS, up, down)
}

/// Offset of the bypass track above an optional item.
fn bypass_offset(inner: Extent) -> f32 {
    track_distance(0.0, 0.0).max(inner.up() + VERTICAL_SEPARATION)
}

fn optional_extent(inner: Extent) -> Extent {
    Extent::new(
        inner.width() + 4.0 * ARC_RADIUS,
        inner.up().max(bypass_offset(inner)),
        inner.down(),
    )
}

/// Offset of the loop-back track below a repeated item.
fn loop_offset(item: Extent, repeat: Extent) -> f32 {
    track_distance(item.down(), repeat.up())
}

fn loop_extent(item: Extent, repeat: Extent) -> Extent {
    Extent::new(
        item.width().max(repeat.width()) + 2.0 * ARC_RADIUS,
        item.up(),
        item.down().max(loop_offset(item, repeat) + repeat.down()),
    )
}

fn repeat_extent(comment: Option<&str>) -> Extent {
    comment.map_or(Extent::default(), comment_extent)
}

fn group_extent(item: Extent, label: &str) -> Extent {
    let caption = comment_extent(label);
    Extent::new(
        item.width().max(caption.width()) + 2.0 * ARC_RADIUS,
        item.up() + ARC_RADIUS + CAPTION_HEIGHT,
        item.down() + ARC_RADIUS,
    )
}

fn start_extent(start: &Start) -> Extent {
    match start.label() {
        Some(label) => Extent::new(
            MARKER_WIDTH.max(text_width(label, COMMENT_CHAR_WIDTH) + COMMENT_TEXT_PADDING),
            MARKER_HALF_HEIGHT + CAPTION_HEIGHT,
            MARKER_HALF_HEIGHT,
        ),
        None => Extent::new(MARKER_WIDTH, MARKER_HALF_HEIGHT, MARKER_HALF_HEIGHT),
    }
}

fn end_extent() -> Extent {
    Extent::new(MARKER_WIDTH, MARKER_HALF_HEIGHT, MARKER_HALF_HEIGHT)
}

/// Measure an element.
pub fn measure(element: &Element) -> Extent {
    match element {
        Element::Terminal(label) | Element::NonTerminal(label) => leaf_extent(label),
        Element::Comment(text) => comment_extent(text),
        Element::Sequence(items) => {
            let mut extent = Extent::default();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    extent = extent.then(Extent::new(SEQUENCE_GAP, 0.0, 0.0));
                }
                extent = extent.then(measure(item));
            }
            extent
        }
        Element::Choice { default, items } => {
            if items.is_empty() {
                return Extent::default();
            }
            let extents: Vec<_> = items.iter().map(measure).collect();
            choice_extent(&extents, &choice_offsets(&extents, *default))
        }
        Element::Optional(item) => optional_extent(measure(item)),
        Element::OneOrMore { item, comment } => {
            loop_extent(measure(item), repeat_extent(comment.as_deref()))
        }
        Element::ZeroOrMore { item, comment } => optional_extent(loop_extent(
            measure(item),
            repeat_extent(comment.as_deref()),
        )),
        Element::Group { item, label } => group_extent(measure(item), label),
    }
}

/// Draws elements into a [`LayeredOutput`].
#[derive(Debug, Default)]
struct Railroad {
    output: LayeredOutput,
}

impl Railroad {
    fn track(&mut self, path: PathData) {
        let node = svg_element::Path::new().set("d", path.finish());
        self.output.add_to_layer(RenderLayer::Track, Box::new(node));
    }

    /// Straight track from `from` to `from + dx`.
    fn line(&mut self, from: Point, dx: f32) {
        if dx > 0.0 {
            self.track(PathData::start(from).h(dx));
        }
    }

    fn caption(&mut self, at: Point, text: &str, class: &str) {
        let node = svg_element::Text::new("")
            .set("x", at.x())
            .set("y", at.y())
            .set("class", class)
            .add(SvgText::new(text));
        self.output.add_to_layer(RenderLayer::Caption, Box::new(node));
    }

    fn draw(&mut self, element: &Element, at: Point) {
        match element {
            Element::Terminal(label) => self.draw_leaf(label, at, "terminal", ARC_RADIUS),
            Element::NonTerminal(label) => self.draw_leaf(label, at, "non-terminal", 0.0),
            Element::Comment(text) => {
                let width = comment_extent(text).width();
                self.caption(
                    at.right(width / 2.0).down(TEXT_BASELINE_SHIFT),
                    text,
                    "comment",
                );
            }
            Element::Sequence(items) => {
                let mut cursor = at;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.line(cursor, SEQUENCE_GAP);
                        cursor = cursor.right(SEQUENCE_GAP);
                    }
                    self.draw(item, cursor);
                    cursor = cursor.right(measure(item).width());
                }
            }
            Element::Choice { default, items } => self.draw_choice(items, *default, at),
            Element::Optional(item) => {
                let inner = measure(item);
                self.draw_optional(inner, at, |railroad, inner_at| railroad.draw(item, inner_at));
            }
            Element::OneOrMore { item, comment } => {
                self.draw_loop(item, comment.as_deref(), at);
            }
            Element::ZeroOrMore { item, comment } => {
                let comment = comment.as_deref();
                let inner = loop_extent(measure(item), repeat_extent(comment));
                self.draw_optional(inner, at, |railroad, inner_at| {
                    railroad.draw_loop(item, comment, inner_at);
                });
            }
            Element::Group { item, label } => self.draw_group(item, label, at),
        }
    }

    fn draw_leaf(&mut self, label: &Label, at: Point, class: &str, corner_radius: f32) {
        let extent = leaf_extent(label);
        let rect = svg_element::Rectangle::new()
            .set("x", at.x())
            .set("y", at.y() - extent.up())
            .set("width", extent.width())
            .set("height", extent.height())
            .set("rx", corner_radius)
            .set("ry", corner_radius);
        let text = svg_element::Text::new("")
            .set("x", at.x() + extent.width() / 2.0)
            .set("y", at.y() + TEXT_BASELINE_SHIFT)
            .add(SvgText::new(label.text()));

        let group = svg_element::Group::new().set("class", class).add(rect).add(text);
        let node: SvgNode = match label.href() {
            Some(href) => Box::new(svg_element::Anchor::new().set("href", href).add(group)),
            None => Box::new(group),
        };
        self.output.add_to_layer(RenderLayer::Node, node);
    }

    /// Draw branches stacked around the main track and join them at both ends.
    fn draw_choice(&mut self, items: &[Element], default: usize, at: Point) {
        if items.is_empty() {
            return;
        }
        let extents: Vec<_> = items.iter().map(measure).collect();
        let offsets = choice_offsets(&extents, default);
        let width = choice_extent(&extents, &offsets).width();
        let inner_width = width - 4.0 * ARC_RADIUS;
        let r = ARC_RADIUS;

        for ((item, extent), offset) in items.iter().zip(&extents).zip(&offsets) {
            let branch_at = at.right(2.0 * r).down(*offset);
            let fill = inner_width - extent.width();

            if *offset == 0.0 {
                self.line(at, 2.0 * r);
                self.line(branch_at.right(extent.width()), fill + 2.0 * r);
            } else if *offset > 0.0 {
                let run = offset - 2.0 * r;
                self.track(
                    PathData::start(at)
                        .arc(r, r, Turn::Right)
                        .v(run)
                        .arc(r, r, Turn::Left),
                );
                self.track(
                    PathData::start(branch_at.right(extent.width()))
                        .h(fill)
                        .arc(r, -r, Turn::Left)
                        .v(-run)
                        .arc(r, -r, Turn::Right),
                );
            } else {
                let run = -offset - 2.0 * r;
                self.track(
                    PathData::start(at)
                        .arc(r, -r, Turn::Left)
                        .v(-run)
                        .arc(r, -r, Turn::Right),
                );
                self.track(
                    PathData::start(branch_at.right(extent.width()))
                        .h(fill)
                        .arc(r, r, Turn::Right)
                        .v(run)
                        .arc(r, r, Turn::Left),
                );
            }

            self.draw(item, branch_at);
        }
    }

    /// Draw `inner` on the main track with an empty bypass above it.
    fn draw_optional<F>(&mut self, inner: Extent, at: Point, draw_inner: F)
    where
        F: FnOnce(&mut Self, Point),
    {
        let r = ARC_RADIUS;
        let offset = bypass_offset(inner);
        let run = offset - 2.0 * r;

        self.track(
            PathData::start(at)
                .arc(r, -r, Turn::Left)
                .v(-run)
                .arc(r, -r, Turn::Right)
                .h(inner.width())
                .arc(r, r, Turn::Right)
                .v(run)
                .arc(r, r, Turn::Left),
        );

        self.line(at, 2.0 * r);
        draw_inner(self, at.right(2.0 * r));
        self.line(at.right(2.0 * r + inner.width()), 2.0 * r);
    }

    /// Draw `item` on the main track with a loop back below it.
    fn draw_loop(&mut self, item: &Element, comment: Option<&str>, at: Point) {
        let r = ARC_RADIUS;
        let item_extent = measure(item);
        let repeat = repeat_extent(comment);
        let extent = loop_extent(item_extent, repeat);
        let inner_width = extent.width() - 2.0 * r;
        let offset = loop_offset(item_extent, repeat);
        let run = offset - 2.0 * r;

        self.line(at, r);
        self.draw(item, at.right(r));
        self.line(at.right(r + item_extent.width()), inner_width - item_extent.width() + r);

        // Back track: down on the right, leftwards under the item, up on the left.
        let repeat_start = (inner_width - repeat.width()) / 2.0;
        let right = at.right(extent.width() - r);
        self.track(
            PathData::start(right)
                .arc(r, r, Turn::Right)
                .v(run)
                .arc(-r, r, Turn::Right)
                .h(-(inner_width - repeat_start - repeat.width())),
        );
        self.track(
            PathData::start(at.right(r + repeat_start).down(offset))
                .h(-repeat_start)
                .arc(-r, -r, Turn::Right)
                .v(-run)
                .arc(r, -r, Turn::Right),
        );

        if let Some(text) = comment {
            self.draw(&Element::comment(text), at.right(r + repeat_start).down(offset));
        }
    }

    fn draw_group(&mut self, item: &Element, label: &str, at: Point) {
        let r = ARC_RADIUS;
        let item_extent = measure(item);
        let extent = group_extent(item_extent, label);
        let item_at = at.right((extent.width() - item_extent.width()) / 2.0);

        let frame = svg_element::Rectangle::new()
            .set("x", at.x())
            .set("y", at.y() - item_extent.up() - r)
            .set("width", extent.width())
            .set("height", item_extent.height() + 2.0 * r)
            .set("rx", r)
            .set("ry", r)
            .set("class", "group-box");
        self.output.add_to_layer(RenderLayer::Frame, Box::new(frame));

        self.caption(
            at.down(-(item_extent.up() + r + TEXT_BASELINE_SHIFT)),
            label,
            "group-label",
        );

        self.line(at, item_at.x() - at.x());
        self.draw(item, item_at);
        let item_end = item_at.right(item_extent.width());
        self.line(item_end, at.x() + extent.width() - item_end.x());
    }

    fn draw_start(&mut self, start: &Start, at: Point) {
        let width = start_extent(start).width();
        let top = at.down(-MARKER_HALF_HEIGHT);
        let mut data = PathData::start(top).v(2.0 * MARKER_HALF_HEIGHT).finish();
        if start.kind() == DiagramKind::Complex {
            data.push_str(&format!(
                " M{} {} v{}",
                top.x() + SEQUENCE_GAP,
                top.y(),
                2.0 * MARKER_HALF_HEIGHT
            ));
        }
        data.push_str(&format!(" M{} {} h{}", at.x(), at.y(), width));
        self.output.add_to_layer(
            RenderLayer::Track,
            Box::new(svg_element::Path::new().set("d", data)),
        );

        if let Some(label) = start.label() {
            self.caption(
                at.down(-(MARKER_HALF_HEIGHT + TEXT_BASELINE_SHIFT)),
                label,
                "label",
            );
        }
    }

    fn draw_end(&mut self, kind: DiagramKind, at: Point) {
        let mut data = PathData::start(at).h(MARKER_WIDTH).finish();
        let bar_x = at.x() + MARKER_WIDTH - SEQUENCE_GAP;
        let top = at.y() - MARKER_HALF_HEIGHT;
        data.push_str(&format!(" M{} {} v{}", bar_x, top, 2.0 * MARKER_HALF_HEIGHT));
        if kind == DiagramKind::Complex {
            data.push_str(&format!(
                " M{} {} v{}",
                at.x() + MARKER_WIDTH,
                top,
                2.0 * MARKER_HALF_HEIGHT
            ));
        }
        self.output.add_to_layer(
            RenderLayer::Track,
            Box::new(svg_element::Path::new().set("d", data)),
        );
    }
}

impl Diagram {
    /// Total extent of the diagram track: start marker, body and end marker.
    pub fn extent(&self) -> Extent {
        let gap = Extent::new(SEQUENCE_GAP, 0.0, 0.0);
        start_extent(self.start())
            .then(gap)
            .then(measure(self.body()))
            .then(gap)
            .then(end_extent())
    }

    /// Size of the rendered SVG, padding included.
    pub fn size(&self) -> Size {
        let extent = self.extent();
        Size::new(
            extent.width() + 2.0 * DIAGRAM_PADDING,
            extent.height() + 2.0 * DIAGRAM_PADDING,
        )
    }

    /// Lay out and draw the diagram as an SVG document.
    pub fn to_svg(&self) -> svg::Document {
        let extent = self.extent();
        let size = self.size();
        let origin = Point::new(DIAGRAM_PADDING, DIAGRAM_PADDING + extent.up());

        let mut railroad = Railroad::default();
        railroad.draw_start(self.start(), origin);

        let body_at = origin.right(start_extent(self.start()).width());
        railroad.line(body_at, SEQUENCE_GAP);
        let body_at = body_at.right(SEQUENCE_GAP);
        railroad.draw(self.body(), body_at);

        let end_at = body_at.right(measure(self.body()).width());
        railroad.line(end_at, SEQUENCE_GAP);
        railroad.draw_end(self.kind(), end_at.right(SEQUENCE_GAP));

        trace!(
            kind = self.kind().as_str(),
            width = size.width(),
            height = size.height();
            "Laid out railroad diagram"
        );

        let mut doc = svg::Document::new()
            .set("xmlns", "http://www.w3.org/2000/svg")
            .set("class", format!("railroad-diagram {}", self.kind()))
            .set("width", size.width())
            .set("height", size.height())
            .set("viewBox", format!("0 0 {} {}", size.width(), size.height()));

        if let Some(css) = self.css() {
            doc = doc.add(svg_element::Style::new(css));
        }

        let mut content = svg_element::Group::new().set("transform", "translate(.5 .5)");
        for node in railroad.output.render() {
            content = content.add(node);
        }
        doc.add(content)
    }

    /// Render the diagram to SVG markup.
    pub fn render(&self) -> String {
        self.to_svg().to_string()
    }
}
