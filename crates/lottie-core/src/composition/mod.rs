//! Layers of a composition and the animator nodes that drive them.

mod builder;
mod scene;
mod text_layout;

pub(crate) use builder::CompositionBuilder;
pub(crate) use scene::SceneAssembler;

use glam::Vec4;
use lottie_data::model as data;

use crate::animator::{AnimatorGraph, NodeClock, NodeId, NodeKind};

/// A built composition: the top level document or one precomposition
/// instance. All node ids refer to the graph owned by the animation.
#[derive(Debug)]
pub struct Composition {
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) layers: Vec<CompositionLayer>,
}

impl Composition {
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn layers(&self) -> &[CompositionLayer] {
        &self.layers
    }

    /// Runs both update phases for every node of every layer, then
    /// descends into precompositions with their own frame.
    pub(crate) fn update(&self, graph: &mut AnimatorGraph, frame: f32, force: bool) {
        for layer in &self.layers {
            graph.update(&layer.nodes, frame, force);
        }
        for layer in &self.layers {
            if let LayerContent::Precomp { composition, time_remap, .. } = &layer.content {
                let child_frame = layer.child_frame(graph, *time_remap, frame);
                composition.update(graph, child_frame, force);
            }
        }
    }
}

#[derive(Debug)]
pub struct CompositionLayer {
    pub(crate) name: String,
    /// Dotted keypath of the layer, including enclosing precomp layers.
    pub(crate) keypath: String,
    pub(crate) index: Option<u32>,
    pub(crate) in_point: f32,
    pub(crate) out_point: f32,
    pub(crate) clock: NodeClock,
    /// Set by the document's `hd` flag.
    pub(crate) hidden: bool,
    pub(crate) transform: NodeId,
    pub(crate) content: LayerContent,
    pub(crate) masks: Vec<NodeId>,
    /// Index of the matte source layer and whether the matte is inverted.
    pub(crate) matte: Option<(usize, bool)>,
    pub(crate) is_matte_source: bool,
    /// Every node owned by this layer, parents before children.
    pub(crate) nodes: Vec<NodeId>,
}

impl CompositionLayer {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keypath(&self) -> &str {
        &self.keypath
    }

    pub fn index(&self) -> Option<u32> {
        self.index
    }

    pub fn content(&self) -> &LayerContent {
        &self.content
    }

    /// Whether the layer shows at `frame`, in its composition's time.
    pub fn is_visible(&self, graph: &AnimatorGraph, frame: f32) -> bool {
        !self.hidden
            && self.in_point <= frame
            && frame < self.out_point
            && graph.node(self.transform).is_enabled()
    }

    pub(crate) fn child_frame(&self, graph: &AnimatorGraph, time_remap: Option<NodeId>, frame: f32) -> f32 {
        match time_remap.map(|id| graph.node(id)) {
            Some(node) if node.is_enabled() => match node.kind() {
                NodeKind::TimeRemap(remap) => remap.output(),
                _ => self.clock.local(frame),
            },
            _ => self.clock.local(frame),
        }
    }
}

#[derive(Debug)]
pub enum LayerContent {
    Null,
    Solid {
        color: Vec4,
        width: f32,
        height: f32,
    },
    Image {
        asset: data::Asset,
    },
    Shape(ShapeGroup),
    Text {
        document: NodeId,
        animators: Vec<NodeId>,
    },
    Precomp {
        composition: Box<Composition>,
        width: f32,
        height: f32,
        time_remap: Option<NodeId>,
    },
}

/// One level of shape items: the layer's top level or a group.
#[derive(Debug, Default)]
pub struct ShapeGroup {
    pub(crate) name: Option<String>,
    /// Group transform; `None` at the layer's top level.
    pub(crate) transform: Option<NodeId>,
    pub(crate) items: Vec<ShapeItem>,
}

#[derive(Debug)]
pub enum ShapeItem {
    Path(NodeId),
    Group(ShapeGroup),
    Shading(NodeId),
    Trim(NodeId),
}

/// Parses a solid layer color such as `#ff8000`. Malformed channels read
/// as zero.
pub(crate) fn parse_hex_color(hex: &str) -> Vec4 {
    let digits = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .map_or(0.0, |v| v as f32 / 255.0)
    };
    Vec4::new(channel(0..2), channel(2..4), channel(4..6), 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#ff0000"), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(parse_hex_color("00ff00"), Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(parse_hex_color("#zz"), Vec4::new(0.0, 0.0, 0.0, 1.0));
    }
}
