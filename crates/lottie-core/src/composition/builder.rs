use std::collections::HashMap;

use lottie_data::model::{self as data, LottieJson};
use tracing::{debug, warn};

use super::{parse_hex_color, Composition, CompositionLayer, LayerContent, ShapeGroup, ShapeItem};
use crate::animator::{
    AnimatorGraph, AnimatorNode, MaskNode, NodeClock, NodeId, NodeKind, PathNode, PathSource, ShadingNode,
    ShadingSource, TextAnimatorNode, TextNode, TimeRemapNode, TransformNode, TrimNode,
};
use crate::config::{CurvePrecision, EngineConfig};
use crate::error::{LottieError, LottieResult};
use crate::render::MaskMode;

/// Settings shared by every node of the layer being built.
struct LayerScope {
    clock: NodeClock,
    keypath: Vec<String>,
}

/// Turns the parsed document into compositions of animator nodes.
pub(crate) struct CompositionBuilder<'a, 'g> {
    document: &'a LottieJson,
    assets: HashMap<&'a str, &'a data::Asset>,
    graph: &'g mut AnimatorGraph,
    strict: bool,
    spatial_samples: u32,
    precision: CurvePrecision,
    unsupported: Vec<String>,
    /// Precomposition ids currently being expanded.
    precomp_stack: Vec<&'a str>,
}

impl<'a, 'g> CompositionBuilder<'a, 'g> {
    pub(crate) fn new(document: &'a LottieJson, config: &EngineConfig, graph: &'g mut AnimatorGraph) -> Self {
        let assets = document.assets.iter().map(|asset| (asset.id.as_str(), asset)).collect();
        Self {
            document,
            assets,
            graph,
            strict: config.strict_unsupported,
            spatial_samples: config.spatial_samples,
            precision: config.curve_precision(),
            unsupported: Vec::new(),
            precomp_stack: Vec::new(),
        }
    }

    /// Builds the top level composition. Returns it with the unsupported
    /// features met on the way.
    pub(crate) fn build(mut self) -> LottieResult<(Composition, Vec<String>)> {
        let document = self.document;
        let composition =
            self.composition(&document.layers, document.w as f32, document.h as f32, &[])?;
        Ok((composition, self.unsupported))
    }

    fn report(&mut self, feature: String) -> LottieResult<()> {
        if self.strict {
            return Err(LottieError::UnsupportedFeature(feature));
        }
        if !self.unsupported.contains(&feature) {
            warn!(%feature, "unsupported feature, skipped");
            self.unsupported.push(feature);
        }
        Ok(())
    }

    fn add(&mut self, parent: NodeId, kind: NodeKind, scope: &LayerScope, name: Option<&str>) -> NodeId {
        let mut keypath = scope.keypath.clone();
        keypath.extend(name.map(str::to_string));
        let node = AnimatorNode::new(Some(parent), kind).with_clock(scope.clock).with_keypath(keypath, None);
        self.graph.add(node)
    }

    fn composition(
        &mut self,
        layers: &'a [data::Layer],
        width: f32,
        height: f32,
        prefix: &[String],
    ) -> LottieResult<Composition> {
        let root = self.graph.add(AnimatorNode::new(None, NodeKind::Root));

        let by_index: HashMap<u32, usize> =
            layers.iter().enumerate().filter_map(|(i, layer)| layer.ind.map(|ind| (ind, i))).collect();
        let names: Vec<String> = layers
            .iter()
            .enumerate()
            .map(|(i, layer)| match &layer.nm {
                Some(name) => name.clone(),
                None => format!("Layer {}", layer.ind.unwrap_or(i as u32 + 1)),
            })
            .collect();

        let mut transforms = vec![None; layers.len()];
        for i in 0..layers.len() {
            let mut visiting = Vec::new();
            self.layer_transform(i, layers, &names, prefix, &by_index, root, &mut transforms, &mut visiting)?;
        }

        let mut built = Vec::with_capacity(layers.len());
        // Document index of every built layer.
        let mut built_from = HashMap::new();
        for (i, layer) in layers.iter().enumerate() {
            let Some(transform) = transforms[i] else {
                continue;
            };
            if let Some(built_layer) = self.layer(layer, &names[i], prefix, transform)? {
                built_from.insert(i, built.len());
                built.push(built_layer);
            }
        }

        // A track matte takes the layer listed right before it as source.
        for (i, layer) in layers.iter().enumerate() {
            let Some(tt) = layer.tt.filter(|tt| *tt > 0) else {
                continue;
            };
            if tt > 2 {
                self.report(format!("luma matte on layer '{}'", names[i]))?;
            }
            let (Some(&target), Some(&source)) = (built_from.get(&i), i.checked_sub(1).and_then(|s| built_from.get(&s)))
            else {
                continue;
            };
            built[target].matte = Some((source, tt == 2 || tt == 4));
            built[source].is_matte_source = true;
        }

        debug!(layers = built.len(), width, height, "composition built");
        Ok(Composition { width, height, layers: built })
    }

    /// Allocates the transform node of layer `i` after the ones of its
    /// parent chain.
    #[allow(clippy::too_many_arguments)]
    fn layer_transform(
        &mut self,
        i: usize,
        layers: &'a [data::Layer],
        names: &[String],
        prefix: &[String],
        by_index: &HashMap<u32, usize>,
        root: NodeId,
        transforms: &mut [Option<NodeId>],
        visiting: &mut Vec<usize>,
    ) -> LottieResult<NodeId> {
        if let Some(id) = transforms[i] {
            return Ok(id);
        }
        if visiting.contains(&i) {
            return Err(LottieError::InvalidDocument(format!("parent cycle through layer '{}'", names[i])));
        }
        visiting.push(i);

        let layer = &layers[i];
        let parent = match layer.parent {
            Some(parent_ind) => {
                let parent_index = *by_index.get(&parent_ind).ok_or_else(|| {
                    LottieError::InvalidDocument(format!("layer '{}' has missing parent {parent_ind}", names[i]))
                })?;
                self.layer_transform(parent_index, layers, names, prefix, by_index, root, transforms, visiting)?
            }
            None => root,
        };
        visiting.pop();

        let mut keypath = prefix.to_vec();
        keypath.push(names[i].clone());
        let transform = TransformNode::from_data(&layer.ks, layer.ddd == Some(1), self.spatial_samples);
        let node = AnimatorNode::new(Some(parent), NodeKind::Transform(transform))
            .with_clock(NodeClock::new(layer.st, layer.sr))
            .with_keypath(keypath, Some("Transform"));
        let id = self.graph.add(node);
        transforms[i] = Some(id);
        Ok(id)
    }

    fn layer(
        &mut self,
        layer: &'a data::Layer,
        name: &str,
        prefix: &[String],
        transform: NodeId,
    ) -> LottieResult<Option<CompositionLayer>> {
        let mut keypath = prefix.to_vec();
        keypath.push(name.to_string());
        let scope = LayerScope { clock: NodeClock::new(layer.st, layer.sr), keypath };
        let mut nodes = vec![transform];

        let content = match layer.ty {
            0 => self.precomp_content(layer, &scope, transform, &mut nodes)?,
            1 => LayerContent::Solid {
                color: parse_hex_color(layer.color.as_deref().unwrap_or("#000000")),
                width: layer.sw.unwrap_or(0) as f32,
                height: layer.sh.unwrap_or(0) as f32,
            },
            2 => {
                let asset = layer
                    .ref_id
                    .as_deref()
                    .and_then(|id| self.assets.get(id))
                    .ok_or_else(|| LottieError::MissingAsset(layer.ref_id.clone().unwrap_or_default()))?;
                LayerContent::Image { asset: (*asset).clone() }
            }
            3 => LayerContent::Null,
            4 => {
                let shapes = layer.shapes.as_deref().unwrap_or_default();
                LayerContent::Shape(ShapeGroup {
                    name: None,
                    transform: None,
                    items: self.shape_items(shapes, transform, &scope, &scope.keypath, &mut nodes)?,
                })
            }
            5 => self.text_content(layer, &scope, transform, &mut nodes)?,
            other => {
                self.report(format!("layer type {other} ('{name}')"))?;
                return Ok(None);
            }
        };

        let mut masks = Vec::new();
        for (k, mask) in layer.masks_properties.as_deref().unwrap_or_default().iter().enumerate() {
            let mode = match mask.mode.as_deref() {
                Some("a") | None => MaskMode::Add,
                Some("s") => MaskMode::Subtract,
                Some("i") => MaskMode::Intersect,
                Some("n") => MaskMode::None,
                Some(other) => {
                    self.report(format!("mask mode '{other}'"))?;
                    MaskMode::Add
                }
            };
            let mask_name = mask.nm.clone().unwrap_or_else(|| format!("Mask {}", k + 1));
            let mut keypath = scope.keypath.clone();
            keypath.extend(["Masks".to_string(), mask_name]);
            let node = MaskNode::from_data(mask, mode, self.precision, self.spatial_samples);
            let id = self.graph.add(
                AnimatorNode::new(Some(transform), NodeKind::Mask(node))
                    .with_clock(scope.clock)
                    .with_keypath(keypath, None),
            );
            masks.push(id);
            nodes.push(id);
        }

        Ok(Some(CompositionLayer {
            name: name.to_string(),
            keypath: scope.keypath.join("."),
            index: layer.ind,
            in_point: layer.ip,
            out_point: layer.op,
            clock: scope.clock,
            hidden: layer.hd,
            transform,
            content,
            masks,
            matte: None,
            is_matte_source: false,
            nodes,
        }))
    }

    fn precomp_content(
        &mut self,
        layer: &'a data::Layer,
        scope: &LayerScope,
        transform: NodeId,
        nodes: &mut Vec<NodeId>,
    ) -> LottieResult<LayerContent> {
        let ref_id = layer.ref_id.as_deref().unwrap_or_default();
        let asset = self
            .assets
            .get(ref_id)
            .copied()
            .ok_or_else(|| LottieError::InvalidDocument(format!("unknown precomposition '{ref_id}'")))?;
        let Some(child_layers) = asset.layers.as_deref() else {
            return Err(LottieError::InvalidDocument(format!("asset '{ref_id}' is not a precomposition")));
        };
        if self.precomp_stack.contains(&asset.id.as_str()) {
            return Err(LottieError::InvalidDocument(format!("precomposition '{ref_id}' contains itself")));
        }

        let width = layer.w.or(asset.w).unwrap_or(self.document.w) as f32;
        let height = layer.h.or(asset.h).unwrap_or(self.document.h) as f32;

        let time_remap = match &layer.tm {
            Some(tm) => {
                let node = TimeRemapNode::from_data(tm, self.document.fr);
                let id = self.add(transform, NodeKind::TimeRemap(node), scope, None);
                nodes.push(id);
                Some(id)
            }
            None => None,
        };

        self.precomp_stack.push(asset.id.as_str());
        let composition = self.composition(child_layers, width, height, &scope.keypath);
        self.precomp_stack.pop();

        Ok(LayerContent::Precomp {
            composition: Box::new(composition?),
            width,
            height,
            time_remap,
        })
    }

    fn text_content(
        &mut self,
        layer: &'a data::Layer,
        scope: &LayerScope,
        transform: NodeId,
        nodes: &mut Vec<NodeId>,
    ) -> LottieResult<LayerContent> {
        let text = layer
            .t
            .as_ref()
            .ok_or_else(|| LottieError::InvalidDocument(format!("text layer '{}' has no text", scope.keypath.join("."))))?;

        let mut keypath = scope.keypath.clone();
        let document = self.graph.add(
            AnimatorNode::new(Some(transform), NodeKind::Text(TextNode::from_data(text)))
                .with_clock(scope.clock)
                .with_keypath(keypath.clone(), Some("Text")),
        );
        nodes.push(document);

        keypath.push("Text".to_string());
        let mut animators = Vec::new();
        let mut parent = document;
        for (k, animator) in text.a.as_deref().unwrap_or_default().iter().enumerate() {
            let mut animator_path = keypath.clone();
            animator_path.push(animator.nm.clone().unwrap_or_else(|| format!("Animator {}", k + 1)));
            let node = TextAnimatorNode::from_data(animator, self.spatial_samples);
            let id = self.graph.add(
                AnimatorNode::new(Some(parent), NodeKind::TextAnimator(node))
                    .with_clock(scope.clock)
                    .with_keypath(animator_path, None),
            );
            animators.push(id);
            nodes.push(id);
            parent = id;
        }

        Ok(LayerContent::Text { document, animators })
    }

    fn shape_items(
        &mut self,
        shapes: &'a [data::Shape],
        parent: NodeId,
        scope: &LayerScope,
        keypath: &[String],
        nodes: &mut Vec<NodeId>,
    ) -> LottieResult<Vec<ShapeItem>> {
        let n = self.spatial_samples;
        let precision = self.precision;
        let mut counters: HashMap<&'static str, usize> = HashMap::new();
        let mut name_of = |nm: &Option<String>, base: &'static str| {
            let count = counters.entry(base).or_insert(0);
            *count += 1;
            let mut path = keypath.to_vec();
            path.push(nm.clone().unwrap_or_else(|| format!("{base} {count}")));
            path
        };

        let mut items = Vec::new();
        for shape in shapes {
            let (kind, hidden, path) = match shape {
                data::Shape::Group(group) => {
                    let path = name_of(&group.nm, "Group");
                    let transform = group
                        .it
                        .iter()
                        .find_map(|item| match item {
                            data::Shape::Transform(t) => Some(TransformNode::from_data(&t.t, false, n)),
                            _ => None,
                        })
                        .unwrap_or_else(TransformNode::identity);
                    let node = AnimatorNode::new(Some(parent), NodeKind::Transform(transform))
                        .with_clock(scope.clock)
                        .with_keypath(path.clone(), Some("Transform"))
                        .with_enabled(!group.hd);
                    let id = self.graph.add(node);
                    nodes.push(id);
                    let children = self.shape_items(&group.it, id, scope, &path, nodes)?;
                    items.push(ShapeItem::Group(ShapeGroup {
                        name: path.last().cloned(),
                        transform: Some(id),
                        items: children,
                    }));
                    continue;
                }
                data::Shape::Rect(rect) => (
                    NodeKind::Path(PathNode::new(PathSource::rectangle(rect, n), precision)),
                    rect.hd,
                    name_of(&rect.nm, "Rectangle"),
                ),
                data::Shape::Ellipse(ellipse) => (
                    NodeKind::Path(PathNode::new(PathSource::ellipse(ellipse, n), precision)),
                    ellipse.hd,
                    name_of(&ellipse.nm, "Ellipse"),
                ),
                data::Shape::Polystar(star) => (
                    NodeKind::Path(PathNode::new(PathSource::polystar(star, n), precision)),
                    star.hd,
                    name_of(&star.nm, "Polystar"),
                ),
                data::Shape::Path(path) => (
                    NodeKind::Path(PathNode::new(PathSource::bezier(path, precision, n), precision)),
                    path.hd,
                    name_of(&path.nm, "Path"),
                ),
                data::Shape::Fill(fill) => (
                    NodeKind::Shading(ShadingNode::new(ShadingSource::fill(fill, n))),
                    fill.hd,
                    name_of(&fill.nm, "Fill"),
                ),
                data::Shape::Stroke(stroke) => (
                    NodeKind::Shading(ShadingNode::new(ShadingSource::stroke(stroke, n))),
                    stroke.hd,
                    name_of(&stroke.nm, "Stroke"),
                ),
                data::Shape::GradientFill(fill) => (
                    NodeKind::Shading(ShadingNode::new(ShadingSource::gradient_fill(fill, n))),
                    fill.hd,
                    name_of(&fill.nm, "Gradient Fill"),
                ),
                data::Shape::GradientStroke(stroke) => (
                    NodeKind::Shading(ShadingNode::new(ShadingSource::gradient_stroke(stroke, n))),
                    stroke.hd,
                    name_of(&stroke.nm, "Gradient Stroke"),
                ),
                data::Shape::Trim(trim) => (
                    NodeKind::Trim(TrimNode::from_data(trim, n)),
                    trim.hd,
                    name_of(&trim.nm, "Trim Paths"),
                ),
                data::Shape::RoundCorners(corners) => {
                    name_of(&corners.nm, "Round Corners");
                    if !corners.hd {
                        self.round_corners(&items, corners)?;
                    }
                    continue;
                }
                // Consumed by the enclosing group.
                data::Shape::Transform(_) => continue,
                other => {
                    self.report(format!("shape item '{}'", other.type_tag()))?;
                    continue;
                }
            };

            let item_kind: fn(NodeId) -> ShapeItem = match &kind {
                NodeKind::Path(_) => ShapeItem::Path,
                NodeKind::Shading(_) => ShapeItem::Shading,
                _ => ShapeItem::Trim,
            };
            let node = AnimatorNode::new(Some(parent), kind)
                .with_clock(scope.clock)
                .with_keypath(path, None)
                .with_enabled(!hidden);
            let id = self.graph.add(node);
            nodes.push(id);
            items.push(item_kind(id));
        }
        Ok(items)
    }

    /// Adds the radius of a round-corners item to the paths before it.
    fn round_corners(&mut self, items: &[ShapeItem], corners: &data::RoundCornersShape) -> LottieResult<()> {
        let mut rejected = false;
        for item in items {
            if let ShapeItem::Path(id) = item {
                if let NodeKind::Path(path) = self.graph.node_mut(*id).kind_mut() {
                    rejected |= !path.source_mut().apply_round_corners(corners, self.spatial_samples);
                }
            }
        }
        if rejected {
            self.report("round corners on a non-rectangle path".to_string())?;
        }
        Ok(())
    }
}
