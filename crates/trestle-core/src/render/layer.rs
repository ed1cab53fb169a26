//! Z-ordered collection of SVG nodes.
//!
//! Railroad drawing visits elements left to right, but group frames must sit
//! behind the tracks and boxes they surround. Drawing code therefore tags
//! every node with a [`RenderLayer`] and [`LayeredOutput::render`] emits the
//! nodes one `<g>` per layer, bottom layer first.

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers, bottom to top in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Dashed group frames
    Frame,
    /// Track lines, arcs and start/end markers
    Track,
    /// Terminal and non-terminal boxes with their text
    Node,
    /// Comments, group captions and the diagram caption
    Caption,
}

impl RenderLayer {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Frame => "frame",
            Self::Track => "track",
            Self::Node => "node",
            Self::Caption => "caption",
        }
    }
}

/// SVG nodes tagged with the layer they belong to.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    /// Append a node to `layer`. Order within a layer is preserved.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Consume the output and return one group per non-empty layer, bottom
    /// layer first. Each group carries a `data-layer` attribute.
    pub fn render(mut self) -> Vec<SvgNode> {
        if self.items.is_empty() {
            return Vec::new();
        }

        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current_layer = self.items[0].0;
        let mut current_group = svg_element::Group::new().set("data-layer", current_layer.name());

        for (layer, node) in self.items {
            if layer != current_layer {
                result.push(Box::new(current_group) as SvgNode);
                current_layer = layer;
                current_group = svg_element::Group::new().set("data-layer", layer.name());
            }
            current_group = current_group.add(node);
        }

        result.push(Box::new(current_group) as SvgNode);
        result
    }
}

#[cfg(test)]
mod tests {
    use svg::node::element::{Path, Rectangle};

    use super::*;

    #[test]
    fn test_empty_output_renders_nothing() {
        assert!(LayeredOutput::default().render().is_empty());
    }

    #[test]
    fn test_one_group_per_layer() {
        let mut output = LayeredOutput::default();
        output.add_to_layer(RenderLayer::Node, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Track, Box::new(Path::new()));
        output.add_to_layer(RenderLayer::Node, Box::new(Rectangle::new()));

        assert_eq!(output.render().len(), 2);
    }

    #[test]
    fn test_layers_render_bottom_first() {
        let mut output = LayeredOutput::default();
        output.add_to_layer(RenderLayer::Caption, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Frame, Box::new(Rectangle::new()));

        let rendered: Vec<String> = output.render().iter().map(|node| node.to_string()).collect();
        assert!(rendered[0].contains(r#"data-layer="frame""#));
        assert!(rendered[1].contains(r#"data-layer="caption""#));
    }
}
