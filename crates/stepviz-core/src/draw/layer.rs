//! Z-ordered collection of SVG nodes.
//!
//! Workflow graphs nest: a container draws its own outline, then the states of
//! its branches inside it, then the edges between them. Emitting each element
//! straight into the document would let a container outline cover the edges of
//! a sibling. Instead, every drawable pushes its nodes into a
//! [`LayeredOutput`] tagged with a [`RenderLayer`], and the output is flattened
//! into one `<g data-layer="...">` group per layer at the end.
//!
//! ```
//! # use stepviz_core::draw::{LayeredOutput, RenderLayer};
//! # use svg::node::element::{Path, Rectangle};
//! let mut output = LayeredOutput::new();
//! output.add_to_layer(RenderLayer::Edge, Box::new(Path::new()));
//! output.add_to_layer(RenderLayer::Container, Box::new(Rectangle::new()));
//!
//! // Container group first, then the edge group
//! assert_eq!(output.render().len(), 2);
//! ```

use svg::node::element as svg_element;

/// Boxed SVG node as stored in a layer.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers, bottom to top in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Canvas fills and label backgrounds
    Background,
    /// Parallel and map container outlines
    Container,
    /// State and anchor shapes
    Node,
    /// Edge paths, feeder arrows and timeline connectors
    Edge,
    /// Labels
    Text,
    /// Hints drawn above everything else
    Overlay,
}

impl RenderLayer {
    /// Value of the `data-layer` attribute for this layer.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Container => "container",
            Self::Node => "node",
            Self::Edge => "edge",
            Self::Text => "text",
            Self::Overlay => "overlay",
        }
    }
}

/// SVG nodes tagged with the layer they belong to.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `node` to `layer`. Nodes keep insertion order within a layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Moves every node of `other` into this output.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of nodes across all layers.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Flattens the output into one group per non-empty layer, bottom first.
    ///
    /// The sort is stable, so nodes pushed earlier into a layer are drawn
    /// below nodes pushed later.
    pub fn render(mut self) -> Vec<SvgNode> {
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut groups: Vec<SvgNode> = Vec::new();
        let mut current: Option<(RenderLayer, svg_element::Group)> = None;

        for (layer, node) in self.items {
            current = match current {
                Some((current_layer, group)) if current_layer == layer => {
                    Some((current_layer, group.add(node)))
                }
                previous => {
                    if let Some((_, group)) = previous {
                        groups.push(Box::new(group));
                    }
                    let group = svg_element::Group::new()
                        .set("data-layer", layer.name())
                        .add(node);
                    Some((layer, group))
                }
            };
        }

        if let Some((_, group)) = current {
            groups.push(Box::new(group));
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use svg::node::element::{Circle, Rectangle};

    use super::*;

    fn render_to_string(output: LayeredOutput) -> String {
        output
            .render()
            .into_iter()
            .map(|node| node.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_layered_output_empty() {
        let output = LayeredOutput::new();
        assert!(output.is_empty());
        assert!(output.render().is_empty());
    }

    #[test]
    fn test_layered_output_groups_per_layer() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Node, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Text, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Node, Box::new(Circle::new()));

        assert_eq!(output.len(), 3);
        assert_eq!(output.render().len(), 2);
    }

    #[test]
    fn test_layered_output_layer_order() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Overlay, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Background, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Edge, Box::new(Rectangle::new()));

        let rendered = render_to_string(output);
        let background = rendered.find("data-layer=\"background\"").unwrap();
        let edge = rendered.find("data-layer=\"edge\"").unwrap();
        let overlay = rendered.find("data-layer=\"overlay\"").unwrap();
        assert!(background < edge);
        assert!(edge < overlay);
    }

    #[test]
    fn test_layered_output_stable_within_layer() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Node, Box::new(Rectangle::new().set("id", "first")));
        output.add_to_layer(RenderLayer::Container, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Node, Box::new(Rectangle::new().set("id", "second")));

        let rendered = render_to_string(output);
        assert!(rendered.find("first").unwrap() < rendered.find("second").unwrap());
    }

    #[test]
    fn test_layered_output_merge() {
        let mut first = LayeredOutput::new();
        first.add_to_layer(RenderLayer::Node, Box::new(Rectangle::new()));

        let mut second = LayeredOutput::new();
        second.add_to_layer(RenderLayer::Node, Box::new(Rectangle::new()));
        second.add_to_layer(RenderLayer::Edge, Box::new(Rectangle::new()));

        first.merge(second);
        assert_eq!(first.len(), 3);
        assert_eq!(first.render().len(), 2);
    }
}
