use glam::{Mat3, Vec2};
use kurbo::{BezPath, Rect};

use super::text_layout::layout_text;
use super::{Composition, CompositionLayer, LayerContent, ShapeGroup, ShapeItem};
use crate::animator::{affine_2d, AnimatorGraph, NodeId, NodeKind, Shading, TrimOutput};
use crate::assets::Providers;
use crate::geometry::{rectangle_path, trim_compound_tagged, BezierPath, BoundingBoxScratch, PathDirection};
use crate::render::{Fill, FillRule, Image, Mask, NodeContent, Paint, RenderNode, Shape};

/// Reads the settled node graph and emits the render tree of one frame.
pub(crate) struct SceneAssembler<'a> {
    graph: &'a AnimatorGraph,
    providers: &'a Providers,
    scratch: &'a mut BoundingBoxScratch,
}

impl<'a> SceneAssembler<'a> {
    pub(crate) fn new(graph: &'a AnimatorGraph, providers: &'a Providers, scratch: &'a mut BoundingBoxScratch) -> Self {
        Self { graph, providers, scratch }
    }

    /// Container of the composition's layers, bottom layer first.
    pub(crate) fn composition(&mut self, composition: &Composition, frame: f32) -> RenderNode {
        let mut root = RenderNode::container(None);
        root.bounds = Rect::new(0.0, 0.0, composition.width as f64, composition.height as f64);
        for layer in composition.layers.iter().rev() {
            if layer.is_matte_source {
                continue;
            }
            let mut node = self.layer(layer, frame);
            if let Some((source, inverted)) = layer.matte {
                let matte = self.layer(&composition.layers[source], frame);
                node.mask = Some(Box::new(matte));
                node.invert_mask = inverted;
            }
            root.subnodes.push(node);
        }
        root
    }

    fn layer(&mut self, layer: &CompositionLayer, frame: f32) -> RenderNode {
        let mut node = RenderNode::container(Some(layer.name.clone()));
        let transform = self.graph.transform(layer.transform).copied().unwrap_or_default();
        node.transform = transform.composed;
        node.alpha = transform.opacity;
        if !layer.is_visible(self.graph, frame) {
            node.is_hidden = true;
            return node;
        }

        match &layer.content {
            LayerContent::Null => {}
            LayerContent::Solid { color, width, height } => {
                let size = Vec2::new(*width, *height);
                let path = rectangle_path(size / 2.0, size, 0.0, PathDirection::Clockwise, Default::default());
                let mut solid = RenderNode::with_content(NodeContent::Shape(Shape {
                    geometry: path.to_kurbo(),
                    fill: Some(Fill { paint: Paint::Solid(*color), opacity: 1.0, rule: FillRule::NonZero }),
                    stroke: None,
                }));
                solid.bounds = Rect::new(0.0, 0.0, *width as f64, *height as f64);
                node.subnodes.push(solid);
            }
            LayerContent::Image { asset } => {
                let resolved = self.providers.images.image(asset).unwrap_or_default();
                let (width, height) = (asset.w.unwrap_or(0), asset.h.unwrap_or(0));
                node.content = Some(NodeContent::Image(Image {
                    data: resolved.data,
                    path: resolved.path,
                    width,
                    height,
                    id: asset.id.clone(),
                }));
                node.bounds = Rect::new(0.0, 0.0, width as f64, height as f64);
            }
            LayerContent::Shape(group) => {
                node.subnodes = self.shapes(group);
            }
            LayerContent::Text { document, animators } => {
                if let Some(text) = self.text(layer, *document, animators) {
                    node.content = Some(NodeContent::Text(text));
                }
            }
            LayerContent::Precomp { composition, width, height, time_remap } => {
                let child_frame = layer.child_frame(self.graph, *time_remap, frame);
                node.subnodes = self.composition(composition, child_frame).subnodes;
                node.masks_to_bounds = true;
                node.bounds = Rect::new(0.0, 0.0, *width as f64, *height as f64);
            }
        }

        if node.bounds == Rect::ZERO {
            node.bounds = node
                .subnodes
                .iter()
                .filter(|child| !child.is_hidden)
                .map(|child| child.bounds)
                .reduce(|a, b| a.union(b))
                .unwrap_or(Rect::ZERO);
        }
        node.masks = self.masks(&layer.masks);
        node
    }

    fn masks(&self, ids: &[NodeId]) -> Vec<Mask> {
        ids.iter()
            .filter_map(|id| {
                let node = self.graph.node(*id);
                match node.kind() {
                    NodeKind::Mask(mask) if node.is_enabled() => Some(Mask {
                        mode: mask.mode(),
                        geometry: mask.output().path.to_kurbo(),
                        opacity: mask.output().opacity,
                        expansion: mask.output().expansion,
                        inverted: mask.inverted(),
                    }),
                    _ => None,
                }
            })
            .collect()
    }

    fn text(&self, layer: &CompositionLayer, document: NodeId, animators: &[NodeId]) -> Option<crate::render::Text> {
        let node = self.graph.node(document);
        let NodeKind::Text(text) = node.kind() else {
            return None;
        };
        if !node.is_enabled() {
            return None;
        }
        let doc = text.output();
        let source = self.providers.text.text(&layer.keypath, &doc.t);
        let style = animators.iter().rev().find_map(|id| {
            let node = self.graph.node(*id);
            match node.kind() {
                NodeKind::TextAnimator(animator) if node.is_enabled() => Some(animator.output()),
                _ => None,
            }
        });
        Some(layout_text(doc, &source, style, self.providers.measurer.as_ref()))
    }

    /// Draws of a shape layer, bottom first.
    fn shapes(&mut self, group: &ShapeGroup) -> Vec<RenderNode> {
        let mut items = self.work_items(&group.items);
        apply_trims(&mut items);
        let mut draws = Vec::new();
        self.collect_draws(&items, Mat3::IDENTITY, 1.0, None, &mut draws);
        draws.reverse();
        draws
    }

    fn work_items(&self, items: &[ShapeItem]) -> Vec<WorkItem<'a>> {
        let graph = self.graph;
        items
            .iter()
            .filter_map(|item| match item {
                ShapeItem::Path(id) => graph.path(*id).map(|path| WorkItem::Paths(vec![path.clone()])),
                ShapeItem::Shading(id) => graph.shading(*id).map(WorkItem::Shading),
                ShapeItem::Trim(id) => graph.trim(*id).filter(|t| !t.is_identity()).map(|t| WorkItem::Trim(*t)),
                ShapeItem::Group(group) => {
                    let id = group.transform?;
                    if !graph.node(id).is_enabled() {
                        return None;
                    }
                    let transform = graph.transform(id)?;
                    Some(WorkItem::Group(WorkGroup {
                        name: group.name.clone(),
                        matrix: affine_2d(&transform.local),
                        opacity: transform.opacity,
                        items: self.work_items(&group.items),
                    }))
                }
            })
            .collect()
    }

    /// Each draw is named after the innermost group holding its shading.
    fn collect_draws(
        &mut self,
        items: &[WorkItem<'a>],
        to_layer: Mat3,
        opacity: f32,
        group_name: Option<&str>,
        draws: &mut Vec<RenderNode>,
    ) {
        for (k, item) in items.iter().enumerate() {
            match item {
                WorkItem::Group(group) => {
                    let name = group.name.as_deref().or(group_name);
                    self.collect_draws(&group.items, to_layer * group.matrix, opacity * group.opacity, name, draws);
                }
                WorkItem::Shading(shading) => {
                    let mut paths = Vec::new();
                    gather_paths(&items[..k], to_layer, &mut paths);
                    if paths.is_empty() {
                        continue;
                    }
                    let mut geometry = BezPath::new();
                    for path in &paths {
                        path.append_to(&mut geometry);
                    }
                    let mut bounds = self.scratch.bounds(paths.iter());
                    let shape = match shading {
                        Shading::Fill(fill) => Shape {
                            geometry,
                            fill: Some(Fill { paint: map_paint(&fill.paint, &to_layer), ..fill.clone() }),
                            stroke: None,
                        },
                        Shading::Stroke(stroke) => {
                            bounds = bounds.inflate(stroke.width as f64 / 2.0, stroke.width as f64 / 2.0);
                            let mut stroke = stroke.clone();
                            stroke.paint = map_paint(&stroke.paint, &to_layer);
                            Shape { geometry, fill: None, stroke: Some(stroke) }
                        }
                    };
                    let mut node = RenderNode::with_content(NodeContent::Shape(shape));
                    node.name = group_name.map(str::to_string);
                    node.alpha = opacity;
                    node.bounds = bounds;
                    draws.push(node);
                }
                WorkItem::Paths(_) | WorkItem::Trim(_) => {}
            }
        }
    }
}

/// Shape items resolved for one frame. Paths hold the pieces left after
/// trimming, in the coordinates of their own group.
enum WorkItem<'g> {
    Paths(Vec<BezierPath>),
    Group(WorkGroup<'g>),
    Shading(&'g Shading),
    Trim(TrimOutput),
}

struct WorkGroup<'g> {
    name: Option<String>,
    /// Group space to enclosing group space.
    matrix: Mat3,
    opacity: f32,
    items: Vec<WorkItem<'g>>,
}

/// Applies every trim to the paths before it, innermost groups first.
fn apply_trims(items: &mut [WorkItem<'_>]) {
    for k in 0..items.len() {
        let (before, rest) = items.split_at_mut(k);
        match &mut rest[0] {
            WorkItem::Group(group) => apply_trims(&mut group.items),
            WorkItem::Trim(trim) => trim_paths(before, *trim),
            _ => {}
        }
    }
}

/// Trims in the trimming group's space, so lengths of nested paths are
/// measured the way they appear there.
fn trim_paths(items: &mut [WorkItem<'_>], trim: TrimOutput) {
    let mut targets = Vec::new();
    collect_targets(items, Mat3::IDENTITY, &mut targets);

    let mut flat = Vec::new();
    let mut owners = Vec::new();
    for (owner, (paths, matrix)) in targets.iter().enumerate() {
        for path in paths.iter() {
            flat.push(path.transformed(matrix));
            owners.push(owner);
        }
    }
    let pieces = trim_compound_tagged(&flat, trim.start, trim.end, trim.offset, trim.mode);

    for (paths, _) in targets.iter_mut() {
        paths.clear();
    }
    for (source, piece) in pieces {
        let (paths, matrix) = &mut targets[owners[source]];
        let piece = match inverse(matrix) {
            Some(back) => piece.transformed(&back),
            None => piece,
        };
        paths.push(piece);
    }
}

fn collect_targets<'w>(items: &'w mut [WorkItem<'_>], matrix: Mat3, out: &mut Vec<(&'w mut Vec<BezierPath>, Mat3)>) {
    for item in items {
        match item {
            WorkItem::Paths(paths) => out.push((paths, matrix)),
            WorkItem::Group(group) => collect_targets(&mut group.items, matrix * group.matrix, out),
            _ => {}
        }
    }
}

fn gather_paths(items: &[WorkItem<'_>], matrix: Mat3, out: &mut Vec<BezierPath>) {
    for item in items {
        match item {
            WorkItem::Paths(paths) => out.extend(paths.iter().map(|p| p.transformed(&matrix))),
            WorkItem::Group(group) => gather_paths(&group.items, matrix * group.matrix, out),
            _ => {}
        }
    }
}

fn inverse(matrix: &Mat3) -> Option<Mat3> {
    if *matrix == Mat3::IDENTITY {
        return Some(Mat3::IDENTITY);
    }
    (matrix.determinant().abs() > f32::EPSILON).then(|| matrix.inverse())
}

/// Gradient points live in the shading's group space.
fn map_paint(paint: &Paint, matrix: &Mat3) -> Paint {
    match paint {
        Paint::Gradient(gradient) if *matrix != Mat3::IDENTITY => {
            let mut gradient = gradient.clone();
            gradient.start = matrix.transform_point2(gradient.start);
            gradient.end = matrix.transform_point2(gradient.end);
            Paint::Gradient(gradient)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CurvePrecision;
    use crate::geometry::{CurveVertex, TrimMode};

    fn line(to: f32) -> BezierPath {
        BezierPath::from_vertices(
            [CurveVertex::corner(Vec2::ZERO), CurveVertex::corner(Vec2::new(to, 0.0))],
            false,
            CurvePrecision::default(),
        )
    }

    fn end_x(path: &BezierPath) -> f32 {
        path.elements().last().map_or(0.0, |e| e.vertex.point.x)
    }

    #[test]
    fn trim_measures_nested_paths_in_trimming_space() {
        let mut items = vec![
            WorkItem::Group(WorkGroup {
                name: None,
                matrix: Mat3::from_scale(Vec2::splat(2.0)),
                opacity: 1.0,
                items: vec![WorkItem::Paths(vec![line(10.0)])],
            }),
            WorkItem::Paths(vec![line(10.0)]),
            WorkItem::Trim(TrimOutput { start: 0.0, end: 0.5, offset: 0.0, mode: TrimMode::Individually }),
        ];
        apply_trims(&mut items);

        let WorkItem::Group(group) = &items[0] else {
            panic!("expected a group");
        };
        let WorkItem::Paths(nested) = &group.items[0] else {
            panic!("expected paths");
        };
        assert_eq!(nested.len(), 1);
        assert!((end_x(&nested[0]) - 7.5).abs() < 0.05);
        let WorkItem::Paths(outer) = &items[1] else {
            panic!("expected paths");
        };
        assert!(outer.is_empty());
    }

    #[test]
    fn later_paths_escape_earlier_trims() {
        let mut items = vec![
            WorkItem::Paths(vec![line(10.0)]),
            WorkItem::Trim(TrimOutput { start: 0.0, end: 0.5, offset: 0.0, mode: TrimMode::Simultaneously }),
            WorkItem::Paths(vec![line(10.0)]),
        ];
        apply_trims(&mut items);
        let ends: Vec<f32> = items
            .iter()
            .filter_map(|item| match item {
                WorkItem::Paths(paths) => paths.first().map(end_x),
                _ => None,
            })
            .collect();
        assert!((ends[0] - 5.0).abs() < 0.05);
        assert_eq!(ends[1], 10.0);
    }
}
