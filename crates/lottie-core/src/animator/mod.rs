//! The animator node graph.
//!
//! Nodes live in an arena and refer to their parent by index; children are
//! owned by the arena and the parent link is only followed upward. Every
//! frame runs two phases over a node and its ancestors:
//!
//! 1. [`AnimatorGraph::update_contents`] pulls fresh values into the node's
//!    property cells and reports whether anything downstream must react.
//! 2. [`AnimatorGraph::update_outputs`] rebuilds the derived output (matrix,
//!    path, paint) of every node whose contents or ancestors changed.
//!
//! Both phases are no-ops when repeated for the same frame without force.

pub mod layer;
pub mod path;
pub mod shading;
pub mod text;
pub mod transform;

pub use layer::{MaskNode, MaskOutput, TimeRemapNode};
pub use path::{PathNode, PathSource, TrimNode, TrimOutput};
pub use shading::{Shading, ShadingNode, ShadingSource};
pub use text::{TextAnimatorNode, TextNode, TextRange, TextStyle};
pub use transform::{affine_2d, transform_matrix, TransformNode, TransformOutput};

use tracing::trace;

use crate::property::{AnyCell, PropertyMap};

/// Index of a node in an [`AnimatorGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Maps the frame a node is updated with onto the time its keyframes use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeClock {
    pub start: f32,
    pub stretch: f32,
}

impl Default for NodeClock {
    fn default() -> Self {
        Self { start: 0.0, stretch: 1.0 }
    }
}

impl NodeClock {
    /// Layer clock; a non-positive stretch counts as 1.
    pub fn new(start: f32, stretch: f32) -> Self {
        let stretch = if stretch > 0.0 { stretch } else { 1.0 };
        Self { start, stretch }
    }

    pub fn local(&self, frame: f32) -> f32 {
        (frame - self.start) / self.stretch
    }
}

#[derive(Debug)]
pub enum NodeKind {
    /// Anchor of a composition's node tree. Never changes.
    Root,
    Transform(TransformNode),
    Path(PathNode),
    Shading(ShadingNode),
    Trim(TrimNode),
    Text(TextNode),
    TextAnimator(TextAnimatorNode),
    Mask(MaskNode),
    TimeRemap(TimeRemapNode),
}

impl NodeKind {
    /// Whether local changes are reported to descendants.
    pub fn permeates(&self) -> bool {
        matches!(
            self,
            NodeKind::Root | NodeKind::Transform(_) | NodeKind::Text(_) | NodeKind::TextAnimator(_)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Transform(_) => "transform",
            NodeKind::Path(_) => "path",
            NodeKind::Shading(_) => "shading",
            NodeKind::Trim(_) => "trim",
            NodeKind::Text(_) => "text",
            NodeKind::TextAnimator(_) => "text animator",
            NodeKind::Mask(_) => "mask",
            NodeKind::TimeRemap(_) => "time remap",
        }
    }

    fn rebuild(&mut self, parent: Option<&NodeKind>) {
        match self {
            NodeKind::Root => {}
            NodeKind::Transform(node) => node.rebuild(match parent {
                Some(NodeKind::Transform(p)) => Some(p.output()),
                _ => None,
            }),
            NodeKind::Path(node) => node.rebuild(),
            NodeKind::Shading(node) => node.rebuild(),
            NodeKind::Trim(node) => node.rebuild(),
            NodeKind::Text(node) => node.rebuild(),
            NodeKind::TextAnimator(node) => node.rebuild(match parent {
                Some(NodeKind::TextAnimator(p)) => Some(p.output()),
                _ => None,
            }),
            NodeKind::Mask(node) => node.rebuild(),
            NodeKind::TimeRemap(node) => node.rebuild(),
        }
    }
}

impl PropertyMap for NodeKind {
    fn visit_cells(&mut self, f: &mut dyn FnMut(&'static str, &mut dyn AnyCell)) {
        match self {
            NodeKind::Root => {}
            NodeKind::Transform(node) => node.visit_cells(f),
            NodeKind::Path(node) => node.visit_cells(f),
            NodeKind::Shading(node) => node.visit_cells(f),
            NodeKind::Trim(node) => node.visit_cells(f),
            NodeKind::Text(node) => node.visit_cells(f),
            NodeKind::TextAnimator(node) => node.visit_cells(f),
            NodeKind::Mask(node) => node.visit_cells(f),
            NodeKind::TimeRemap(node) => node.visit_cells(f),
        }
    }
}

/// Per-node bookkeeping of the two update phases.
#[derive(Debug, Clone, Default)]
struct UpdateState {
    contents_frame: Option<f32>,
    outputs_frame: Option<f32>,
    has_local_updates: bool,
    has_upstream_updates: bool,
    /// What `update_contents` returned for `contents_frame`.
    reported: bool,
}

#[derive(Debug)]
pub struct AnimatorNode {
    parent: Option<NodeId>,
    kind: NodeKind,
    enabled: bool,
    clock: NodeClock,
    /// Keypath segments naming this node, e.g. `["Layer", "Group 1", "Fill 1"]`.
    keypath: Vec<String>,
    /// Segment inserted between the node keypath and its property names.
    property_prefix: Option<&'static str>,
    state: UpdateState,
}

impl AnimatorNode {
    pub fn new(parent: Option<NodeId>, kind: NodeKind) -> Self {
        Self {
            parent,
            kind,
            enabled: true,
            clock: NodeClock::default(),
            keypath: Vec::new(),
            property_prefix: None,
            state: UpdateState::default(),
        }
    }

    pub fn with_clock(mut self, clock: NodeClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_keypath(mut self, keypath: Vec<String>, property_prefix: Option<&'static str>) -> Self {
        self.keypath = keypath;
        self.property_prefix = property_prefix;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn clock(&self) -> NodeClock {
        self.clock
    }

    pub fn keypath(&self) -> &[String] {
        &self.keypath
    }

    pub fn property_prefix(&self) -> Option<&'static str> {
        self.property_prefix
    }

    pub fn has_local_updates(&self) -> bool {
        self.state.has_local_updates
    }

    pub fn has_upstream_updates(&self) -> bool {
        self.state.has_upstream_updates
    }

    /// Frame of the last completed output phase.
    pub fn last_update_frame(&self) -> Option<f32> {
        self.state.outputs_frame
    }
}

/// Arena of animator nodes. A parent is always added before its children.
#[derive(Debug, Default)]
pub struct AnimatorGraph {
    nodes: Vec<AnimatorNode>,
}

impl AnimatorGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: AnimatorNode) -> NodeId {
        if let Some(parent) = node.parent {
            assert!(parent.0 < self.nodes.len(), "parent {parent:?} is not allocated yet");
        }
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &AnimatorNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut AnimatorNode {
        &mut self.nodes[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) {
        self.nodes[id.0].enabled = enabled;
    }

    /// Nearest enabled node at or above `id`.
    pub fn enabled_ancestor(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.0];
            if node.enabled {
                return Some(node_id);
            }
            current = node.parent;
        }
        None
    }

    /// Phase one. Returns whether this node or an ancestor changed in a way
    /// that descendants must observe.
    pub fn update_contents(&mut self, id: NodeId, frame: f32, force_local: bool) -> bool {
        let (parent, enabled) = {
            let node = &self.nodes[id.0];
            (node.parent, node.enabled)
        };
        if !enabled {
            return parent.is_some_and(|p| self.update_contents(p, frame, force_local));
        }
        {
            let state = &self.nodes[id.0].state;
            if !force_local && state.contents_frame == Some(frame) {
                return state.reported;
            }
        }

        let upstream = parent.is_some_and(|p| self.update_contents(p, frame, force_local));

        let node = &mut self.nodes[id.0];
        let local_frame = node.clock.local(frame);
        let local = force_local || node.kind.any_needs_update(local_frame);
        if local {
            node.kind.update_all(local_frame);
            trace!(node = id.0, kind = node.kind.name(), frame, "contents updated");
        }
        let reported = if node.kind.permeates() { local || upstream } else { upstream };
        node.state.has_local_updates = local;
        node.state.has_upstream_updates = upstream;
        node.state.contents_frame = Some(frame);
        node.state.reported = reported;
        reported
    }

    /// Phase two. Rebuilds outputs from the cells pulled in phase one.
    pub fn update_outputs(&mut self, id: NodeId, frame: f32, force_output: bool) {
        let (parent, enabled) = {
            let node = &self.nodes[id.0];
            (node.parent, node.enabled)
        };
        if !enabled {
            if let Some(parent) = parent {
                self.update_outputs(parent, frame, force_output);
            }
            return;
        }
        if !force_output && self.nodes[id.0].state.outputs_frame == Some(frame) {
            return;
        }
        if let Some(parent) = parent {
            self.update_outputs(parent, frame, force_output);
        }

        // Upstream changes count too: a composed transform or a text animator
        // style is derived from the parent's output, which may have moved
        // while this node's own cells stayed put.
        let state = &self.nodes[id.0].state;
        if force_output || state.has_local_updates || state.has_upstream_updates {
            let source = parent.and_then(|p| self.enabled_ancestor(p));
            let (before, rest) = self.nodes.split_at_mut(id.0);
            let parent_kind = source.map(|p| &before[p.0].kind);
            rest[0].kind.rebuild(parent_kind);
        }
        self.nodes[id.0].state.outputs_frame = Some(frame);
    }

    /// Both phases for `ids`, in order.
    pub fn update(&mut self, ids: &[NodeId], frame: f32, force: bool) {
        for &id in ids {
            self.update_contents(id, frame, force);
        }
        for &id in ids {
            self.update_outputs(id, frame, force);
        }
    }

    pub fn transform(&self, id: NodeId) -> Option<&TransformOutput> {
        match &self.nodes[self.enabled_ancestor(id)?.0].kind {
            NodeKind::Transform(node) => Some(node.output()),
            _ => None,
        }
    }

    pub fn path(&self, id: NodeId) -> Option<&crate::geometry::BezierPath> {
        match &self.nodes[id.0] {
            AnimatorNode { enabled: true, kind: NodeKind::Path(node), .. } => Some(node.output()),
            _ => None,
        }
    }

    pub fn shading(&self, id: NodeId) -> Option<&Shading> {
        match &self.nodes[id.0] {
            AnimatorNode { enabled: true, kind: NodeKind::Shading(node), .. } => Some(node.output()),
            _ => None,
        }
    }

    pub fn trim(&self, id: NodeId) -> Option<&TrimOutput> {
        match &self.nodes[id.0] {
            AnimatorNode { enabled: true, kind: NodeKind::Trim(node), .. } => Some(node.output()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PathDirection;
    use crate::property::PropertyCell;
    use glam::Vec2;
    use lottie_data::model as data;

    fn animated_opacity_transform() -> TransformNode {
        let mut transform = data::Transform::default();
        transform.o = data::Property::animated(vec![data::Keyframe::at(0.0, 0.0), data::Keyframe::at(10.0, 100.0)]);
        TransformNode::from_data(&transform, false, 10)
    }

    fn constant_rect() -> PathNode {
        let source = PathSource::Rectangle {
            position: PropertyCell::constant(Vec2::ZERO),
            size: PropertyCell::constant(Vec2::splat(10.0)),
            radius: PropertyCell::constant(0.0),
            round_corners: None,
            direction: PathDirection::Clockwise,
        };
        PathNode::new(source, Default::default())
    }

    fn chain(middle_enabled: bool) -> (AnimatorGraph, NodeId, NodeId, NodeId) {
        let mut graph = AnimatorGraph::new();
        let root = graph.add(AnimatorNode::new(None, NodeKind::Transform(animated_opacity_transform())));
        let middle = graph.add(
            AnimatorNode::new(Some(root), NodeKind::Transform(animated_opacity_transform())).with_enabled(middle_enabled),
        );
        let leaf = graph.add(AnimatorNode::new(Some(middle), NodeKind::Path(constant_rect())));
        (graph, root, middle, leaf)
    }

    #[test]
    fn disabled_node_forwards_root_changes_only() {
        let (mut graph, root, _, leaf) = chain(false);
        for frame in [0.0, 5.0, 20.0, 30.0, 40.0] {
            let leaf_changed = graph.update_contents(leaf, frame, false);
            let root_changed = graph.update_contents(root, frame, false);
            assert_eq!(leaf_changed, root_changed, "frame {frame}");
        }
        assert!(!graph.node(leaf).has_local_updates());
    }

    #[test]
    fn disabled_middle_is_skipped_not_queried() {
        let (mut graph, _, middle, leaf) = chain(false);
        graph.update_contents(leaf, 0.0, false);
        graph.update_contents(leaf, 30.0, false);
        graph.update_contents(leaf, 31.0, false);
        // Past its last keyframe the root is quiet, so the leaf is too.
        assert!(!graph.update_contents(leaf, 32.0, false));
        assert_eq!(graph.node(middle).state.contents_frame, None);
    }

    #[test]
    fn repeated_update_is_idempotent() {
        let (mut graph, root, middle, leaf) = chain(true);
        graph.update(&[leaf], 5.0, false);
        let snapshot = |g: &AnimatorGraph| {
            [root, middle, leaf].map(|id| {
                let n = g.node(id);
                (n.has_local_updates(), n.has_upstream_updates(), n.state.reported, n.last_update_frame())
            })
        };
        let before = snapshot(&graph);
        let matrix = graph.transform(middle).copied();

        assert!(graph.update_contents(leaf, 5.0, false));
        graph.update_outputs(leaf, 5.0, false);
        assert_eq!(snapshot(&graph), before);
        assert_eq!(graph.transform(middle).copied(), matrix);
    }

    #[test]
    fn outputs_compose_through_enabled_ancestors() {
        let mut graph = AnimatorGraph::new();
        let mut parent = data::Transform::default();
        parent.p = data::PositionProperty::Unified(data::Property::fixed(data::Vec3DefaultZero([10.0, 0.0, 0.0])));
        let root = graph.add(AnimatorNode::new(None, NodeKind::Transform(TransformNode::from_data(&parent, false, 10))));
        let hidden = graph.add(
            AnimatorNode::new(Some(root), NodeKind::Transform(TransformNode::from_data(&parent, false, 10))).with_enabled(false),
        );
        let child = graph.add(AnimatorNode::new(Some(hidden), NodeKind::Transform(TransformNode::from_data(&parent, false, 10))));
        graph.update(&[child], 0.0, false);
        let composed = graph.transform(child).map(|t| t.composed).unwrap_or_default();
        assert_eq!(composed.transform_point3(glam::Vec3::ZERO), glam::Vec3::new(20.0, 0.0, 0.0));
        // A disabled transform reads as its nearest enabled ancestor.
        assert_eq!(graph.transform(hidden).map(|t| t.composed), graph.transform(root).map(|t| t.composed));
    }

    #[test]
    fn static_child_follows_moving_parent() {
        let mut graph = AnimatorGraph::new();
        let mut moving = data::Transform::default();
        moving.p = data::PositionProperty::Unified(data::Property::animated(vec![
            data::Keyframe::at(0.0, data::Vec3DefaultZero([0.0, 0.0, 0.0])),
            data::Keyframe::at(10.0, data::Vec3DefaultZero([40.0, 0.0, 0.0])),
        ]));
        let parent = graph.add(AnimatorNode::new(None, NodeKind::Transform(TransformNode::from_data(&moving, false, 10))));
        let child = graph.add(AnimatorNode::new(Some(parent), NodeKind::Transform(TransformNode::identity())));

        let origin = |g: &AnimatorGraph| g.transform(child).map(|t| t.composed.transform_point3(glam::Vec3::ZERO));
        graph.update(&[child], 0.0, false);
        assert_eq!(origin(&graph), Some(glam::Vec3::ZERO));

        graph.update(&[child], 5.0, false);
        assert!(!graph.node(child).has_local_updates());
        assert!(graph.node(child).has_upstream_updates());
        assert_eq!(origin(&graph), Some(glam::Vec3::new(20.0, 0.0, 0.0)));
    }

    #[test]
    fn clock_maps_layer_time() {
        let mut graph = AnimatorGraph::new();
        let trim = data::TrimShape {
            nm: None,
            hd: false,
            s: data::Property::fixed(0.0),
            e: data::Property::animated(vec![data::Keyframe::at(0.0, 0.0), data::Keyframe::at(10.0, 100.0)]),
            o: data::Property::default(),
            m: 1,
        };
        let id = graph.add(
            AnimatorNode::new(None, NodeKind::Trim(TrimNode::from_data(&trim, 10))).with_clock(NodeClock::new(10.0, 2.0)),
        );
        graph.update(&[id], 20.0, false);
        assert_eq!(graph.trim(id).map(|t| t.end), Some(0.5));
    }

    #[test]
    #[should_panic(expected = "not allocated")]
    fn parent_must_exist() {
        let mut graph = AnimatorGraph::new();
        graph.add(AnimatorNode::new(Some(NodeId(3)), NodeKind::Root));
    }
}
