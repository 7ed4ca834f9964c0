use lottie_data::model as data;

use crate::config::CurvePrecision;
use crate::geometry::BezierPath;
use crate::keyframes::convert::{path_track, scalar_track};
use crate::property::{AnyCell, PropertyCell, PropertyMap};
use crate::render::MaskMode;

#[derive(Debug, Clone, PartialEq)]
pub struct MaskOutput {
    pub path: BezierPath,
    /// Opacity in `0..=1`.
    pub opacity: f32,
    pub expansion: f32,
}

/// One entry of a layer's mask list.
#[derive(Debug)]
pub struct MaskNode {
    mode: MaskMode,
    inverted: bool,
    path: PropertyCell<BezierPath>,
    opacity: PropertyCell<f32>,
    expansion: PropertyCell<f32>,
    output: MaskOutput,
}

impl MaskNode {
    pub fn from_data(mask: &data::MaskProperties, mode: MaskMode, precision: CurvePrecision, n: u32) -> Self {
        Self {
            mode,
            inverted: mask.inv,
            path: PropertyCell::animated(path_track(&mask.pt, precision), n),
            opacity: PropertyCell::animated(scalar_track(&mask.o, 100.0), n),
            expansion: PropertyCell::animated(scalar_track(&mask.x, 0.0), n),
            output: MaskOutput {
                path: BezierPath::new(precision),
                opacity: 1.0,
                expansion: 0.0,
            },
        }
    }

    pub fn mode(&self) -> MaskMode {
        self.mode
    }

    pub fn inverted(&self) -> bool {
        self.inverted
    }

    pub fn output(&self) -> &MaskOutput {
        &self.output
    }

    pub(crate) fn rebuild(&mut self) {
        self.output = MaskOutput {
            path: self.path.value().clone(),
            opacity: (*self.opacity.value() * 0.01).clamp(0.0, 1.0),
            expansion: *self.expansion.value(),
        };
    }
}

impl PropertyMap for MaskNode {
    fn visit_cells(&mut self, f: &mut dyn FnMut(&'static str, &mut dyn AnyCell)) {
        f("Mask Path", &mut self.path);
        f("Opacity", &mut self.opacity);
        f("Expansion", &mut self.expansion);
    }
}

/// Maps a precomposition layer's time onto its child composition's frames.
#[derive(Debug)]
pub struct TimeRemapNode {
    seconds: PropertyCell<f32>,
    frame_rate: f32,
    output: f32,
}

impl TimeRemapNode {
    pub fn from_data(tm: &data::Property<f32>, frame_rate: f32) -> Self {
        Self {
            seconds: PropertyCell::animated(scalar_track(tm, 0.0), 0),
            frame_rate,
            output: 0.0,
        }
    }

    /// Child composition frame.
    pub fn output(&self) -> f32 {
        self.output
    }

    pub(crate) fn rebuild(&mut self) {
        self.output = *self.seconds.value() * self.frame_rate;
    }
}

impl PropertyMap for TimeRemapNode {
    fn visit_cells(&mut self, f: &mut dyn FnMut(&'static str, &mut dyn AnyCell)) {
        f("Time Remap", &mut self.seconds);
    }
}
