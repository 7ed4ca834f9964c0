use lottie_data::model::LottieJson;
use tracing::{debug, instrument};

use crate::animator::AnimatorGraph;
use crate::assets::Providers;
use crate::composition::{Composition, CompositionBuilder, SceneAssembler};
use crate::config::EngineConfig;
use crate::error::{LottieError, LottieResult};
use crate::geometry::BoundingBoxScratch;
use crate::keypath::{self, Keypath};
use crate::property::AnyValue;
use crate::render::RenderTree;

/// One evaluable instance of a document.
///
/// The instance owns its node graph and caches; evaluating the same
/// document on several threads takes one `Animation` per thread.
#[derive(Debug)]
pub struct Animation {
    graph: AnimatorGraph,
    composition: Composition,
    providers: Providers,
    scratch: BoundingBoxScratch,
    unsupported: Vec<String>,
    in_point: f32,
    out_point: f32,
    frame_rate: f32,
    /// Frame of the last `update`.
    frame: Option<f32>,
    /// Set by keypath edits; the next update recomputes every node.
    force_next: bool,
}

impl Animation {
    #[instrument(level = "debug", skip_all, fields(layers = document.layers.len(), assets = document.assets.len()))]
    pub fn new(document: &LottieJson, config: EngineConfig, providers: Providers) -> LottieResult<Self> {
        if document.w == 0 || document.h == 0 {
            return Err(LottieError::InvalidDocument(format!(
                "composition size {}x{} is empty",
                document.w, document.h
            )));
        }
        if document.op <= document.ip {
            return Err(LottieError::InvalidDocument(format!(
                "out point {} is not after in point {}",
                document.op, document.ip
            )));
        }

        let mut graph = AnimatorGraph::new();
        let (composition, unsupported) = CompositionBuilder::new(document, &config, &mut graph).build()?;
        debug!(nodes = graph.len(), unsupported = unsupported.len(), "animation built");

        Ok(Self {
            graph,
            composition,
            providers,
            scratch: BoundingBoxScratch::new(),
            unsupported,
            in_point: document.ip,
            out_point: document.op,
            frame_rate: if document.fr > 0.0 { document.fr } else { 60.0 },
            frame: None,
            force_next: false,
        })
    }

    /// Parses and builds in one step. Parse failures are reported as
    /// [`LottieError::InvalidDocument`].
    pub fn from_json(json: &str, config: EngineConfig, providers: Providers) -> LottieResult<Self> {
        let document: LottieJson =
            serde_json::from_str(json).map_err(|err| LottieError::InvalidDocument(err.to_string()))?;
        Self::new(&document, config, providers)
    }

    pub fn width(&self) -> f32 {
        self.composition.width()
    }

    pub fn height(&self) -> f32 {
        self.composition.height()
    }

    pub fn in_point(&self) -> f32 {
        self.in_point
    }

    pub fn out_point(&self) -> f32 {
        self.out_point
    }

    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    pub fn duration_frames(&self) -> f32 {
        self.out_point - self.in_point
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn graph(&self) -> &AnimatorGraph {
        &self.graph
    }

    /// Unsupported features met while building, each listed once.
    pub fn unsupported(&self) -> &[String] {
        &self.unsupported
    }

    pub fn current_frame(&self) -> Option<f32> {
        self.frame
    }

    /// Brings every node to `frame`. With `force` unset, nodes whose inputs
    /// did not change since their last update keep their outputs.
    #[instrument(level = "trace", skip(self))]
    pub fn update(&mut self, frame: f32, force: bool) {
        let force = force || std::mem::take(&mut self.force_next);
        self.composition.update(&mut self.graph, frame, force);
        self.frame = Some(frame);
    }

    /// Render tree of the last updated frame. Pending keypath edits are
    /// applied first; an instance never updated shows its in point.
    pub fn scene(&mut self) -> RenderTree {
        let frame = self.frame.unwrap_or(self.in_point);
        if self.frame.is_none() || self.force_next {
            self.update(frame, false);
        }
        let mut assembler = SceneAssembler::new(&self.graph, &self.providers, &mut self.scratch);
        RenderTree {
            width: self.composition.width(),
            height: self.composition.height(),
            root: assembler.composition(&self.composition, frame),
        }
    }

    /// Updates to `frame` and assembles its render tree.
    pub fn render(&mut self, frame: f32) -> RenderTree {
        self.update(frame, false);
        self.scene()
    }

    /// Every property keypath, in build order.
    pub fn keypaths(&mut self) -> Vec<String> {
        keypath::list(&mut self.graph)
    }

    /// Values of the properties matching `keypath` as of the last update.
    pub fn value(&mut self, keypath: &str) -> LottieResult<Vec<(String, AnyValue)>> {
        keypath::values(&mut self.graph, &Keypath::new(keypath))
    }

    /// Overrides the matching properties with a constant.
    pub fn set_value(&mut self, keypath: &str, value: AnyValue) -> LottieResult<usize> {
        let count = keypath::set_value(&mut self.graph, &Keypath::new(keypath), value)?;
        debug!(keypath, count, "properties overridden");
        self.force_next = true;
        Ok(count)
    }

    pub fn set_enabled(&mut self, keypath: &str, enabled: bool) -> LottieResult<usize> {
        let count = keypath::set_enabled(&mut self.graph, &Keypath::new(keypath), enabled)?;
        debug!(keypath, count, enabled, "nodes toggled");
        self.force_next = true;
        Ok(count)
    }
}
