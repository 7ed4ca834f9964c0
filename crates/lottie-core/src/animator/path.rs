use glam::{Vec2, Vec3};
use lottie_data::model as data;

use super::transform::position_cell;
use crate::config::CurvePrecision;
use crate::geometry::{ellipse_path, polystar_path, rectangle_path, BezierPath, PathDirection, Polystar, PolystarKind, TrimMode};
use crate::keyframes::convert::{optional_track, path_track, scalar_track, vec2_track};
use crate::property::{AnyCell, PropertyCell, PropertyMap};

/// Where a path node's geometry comes from.
#[derive(Debug)]
pub enum PathSource {
    Bezier {
        path: PropertyCell<BezierPath>,
    },
    Rectangle {
        position: PropertyCell<Vec2>,
        size: PropertyCell<Vec2>,
        radius: PropertyCell<f32>,
        /// Radius added by a following round-corners item.
        round_corners: Option<PropertyCell<f32>>,
        direction: PathDirection,
    },
    Ellipse {
        position: PropertyCell<Vec2>,
        size: PropertyCell<Vec2>,
        direction: PathDirection,
    },
    Polystar {
        kind: PolystarKind,
        position: PropertyCell<Vec3>,
        outer_radius: PropertyCell<f32>,
        inner_radius: PropertyCell<f32>,
        outer_roundness: PropertyCell<f32>,
        inner_roundness: PropertyCell<f32>,
        points: PropertyCell<f32>,
        rotation: PropertyCell<f32>,
        direction: PathDirection,
    },
}

impl PathSource {
    pub fn bezier(shape: &data::PathShape, precision: CurvePrecision, spatial_samples: u32) -> Self {
        PathSource::Bezier {
            path: PropertyCell::animated(path_track(&shape.ks, precision), spatial_samples),
        }
    }

    pub fn rectangle(shape: &data::RectShape, spatial_samples: u32) -> Self {
        let n = spatial_samples;
        PathSource::Rectangle {
            position: PropertyCell::animated(vec2_track(&shape.p, Vec2::ZERO), n),
            size: PropertyCell::animated(vec2_track(&shape.s, Vec2::ZERO), n),
            radius: PropertyCell::animated(scalar_track(&shape.r, 0.0), n),
            round_corners: None,
            direction: PathDirection::from_raw(shape.d),
        }
    }

    pub fn ellipse(shape: &data::EllipseShape, spatial_samples: u32) -> Self {
        let n = spatial_samples;
        PathSource::Ellipse {
            position: PropertyCell::animated(vec2_track(&shape.p, Vec2::ZERO), n),
            size: PropertyCell::animated(vec2_track(&shape.s, Vec2::ZERO), n),
            direction: PathDirection::from_raw(shape.d),
        }
    }

    pub fn polystar(shape: &data::PolystarShape, spatial_samples: u32) -> Self {
        let n = spatial_samples;
        PathSource::Polystar {
            kind: if shape.sy == 2 { PolystarKind::Polygon } else { PolystarKind::Star },
            position: position_cell(&shape.p, n),
            outer_radius: PropertyCell::animated(scalar_track(&shape.or, 0.0), n),
            inner_radius: PropertyCell::animated(optional_track(shape.ir.as_ref(), 0.0, |v| *v), n),
            outer_roundness: PropertyCell::animated(scalar_track(&shape.os, 0.0), n),
            inner_roundness: PropertyCell::animated(optional_track(shape.is.as_ref(), 0.0, |v| *v), n),
            points: PropertyCell::animated(scalar_track(&shape.pt, 5.0), n),
            rotation: PropertyCell::animated(scalar_track(&shape.r, 0.0), n),
            direction: PathDirection::from_raw(shape.d),
        }
    }

    /// Attaches a round-corners radius. Only rectangles accept one.
    pub fn apply_round_corners(&mut self, shape: &data::RoundCornersShape, spatial_samples: u32) -> bool {
        match self {
            PathSource::Rectangle { round_corners, .. } => {
                *round_corners = Some(PropertyCell::animated(scalar_track(&shape.r, 0.0), spatial_samples));
                true
            }
            _ => false,
        }
    }
}

/// Produces one contour per frame.
#[derive(Debug)]
pub struct PathNode {
    source: PathSource,
    precision: CurvePrecision,
    output: BezierPath,
}

impl PathNode {
    pub fn new(source: PathSource, precision: CurvePrecision) -> Self {
        Self {
            source,
            precision,
            output: BezierPath::new(precision),
        }
    }

    pub fn source_mut(&mut self) -> &mut PathSource {
        &mut self.source
    }

    pub fn output(&self) -> &BezierPath {
        &self.output
    }

    pub(crate) fn rebuild(&mut self) {
        let precision = self.precision;
        self.output = match &self.source {
            PathSource::Bezier { path } => path.value().clone(),
            PathSource::Rectangle { position, size, radius, round_corners, direction } => {
                let extra = round_corners.as_ref().map_or(0.0, |c| *c.value());
                rectangle_path(*position.value(), *size.value(), *radius.value() + extra, *direction, precision)
            }
            PathSource::Ellipse { position, size, direction } => {
                ellipse_path(*size.value(), *position.value(), *direction, precision)
            }
            PathSource::Polystar {
                kind,
                position,
                outer_radius,
                inner_radius,
                outer_roundness,
                inner_roundness,
                points,
                rotation,
                direction,
            } => {
                let star = Polystar {
                    kind: *kind,
                    position: position.value().truncate(),
                    outer_radius: *outer_radius.value(),
                    inner_radius: *inner_radius.value(),
                    outer_roundness: *outer_roundness.value(),
                    inner_roundness: *inner_roundness.value(),
                    points: *points.value(),
                    rotation: *rotation.value(),
                };
                polystar_path(&star, *direction, precision)
            }
        };
    }
}

impl PropertyMap for PathNode {
    fn visit_cells(&mut self, f: &mut dyn FnMut(&'static str, &mut dyn AnyCell)) {
        match &mut self.source {
            PathSource::Bezier { path } => f("Path", path),
            PathSource::Rectangle { position, size, radius, round_corners, .. } => {
                f("Position", position);
                f("Size", size);
                f("Roundness", radius);
                if let Some(cell) = round_corners {
                    f("Round Corners", cell);
                }
            }
            PathSource::Ellipse { position, size, .. } => {
                f("Position", position);
                f("Size", size);
            }
            PathSource::Polystar {
                position,
                outer_radius,
                inner_radius,
                outer_roundness,
                inner_roundness,
                points,
                rotation,
                ..
            } => {
                f("Position", position);
                f("Outer Radius", outer_radius);
                f("Inner Radius", inner_radius);
                f("Outer Roundness", outer_roundness);
                f("Inner Roundness", inner_roundness);
                f("Points", points);
                f("Rotation", rotation);
            }
        }
    }
}

/// Trim window for one frame: fractions in `0..=1` and an offset in turns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimOutput {
    pub start: f32,
    pub end: f32,
    pub offset: f32,
    pub mode: TrimMode,
}

impl TrimOutput {
    pub fn is_identity(&self) -> bool {
        self.start == 0.0 && self.end == 1.0 && self.offset == 0.0
    }
}

#[derive(Debug)]
pub struct TrimNode {
    start: PropertyCell<f32>,
    end: PropertyCell<f32>,
    offset: PropertyCell<f32>,
    mode: TrimMode,
    output: TrimOutput,
}

impl TrimNode {
    pub fn from_data(shape: &data::TrimShape, spatial_samples: u32) -> Self {
        let n = spatial_samples;
        let mode = TrimMode::from_raw(shape.m);
        Self {
            start: PropertyCell::animated(scalar_track(&shape.s, 0.0), n),
            end: PropertyCell::animated(scalar_track(&shape.e, 100.0), n),
            offset: PropertyCell::animated(scalar_track(&shape.o, 0.0), n),
            mode,
            output: TrimOutput { start: 0.0, end: 1.0, offset: 0.0, mode },
        }
    }

    pub fn output(&self) -> &TrimOutput {
        &self.output
    }

    /// Start and end are percentages and may arrive swapped; the offset is
    /// in degrees.
    pub(crate) fn rebuild(&mut self) {
        let (s, e) = (*self.start.value(), *self.end.value());
        self.output = TrimOutput {
            start: s.min(e) * 0.01,
            end: s.max(e) * 0.01,
            offset: (*self.offset.value() % 360.0) / 360.0,
            mode: self.mode,
        };
    }
}

impl PropertyMap for TrimNode {
    fn visit_cells(&mut self, f: &mut dyn FnMut(&'static str, &mut dyn AnyCell)) {
        f("Start", &mut self.start);
        f("End", &mut self.end);
        f("Offset", &mut self.offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottie_data::model::Property;

    fn rect(size: [f32; 2], radius: f32) -> data::RectShape {
        data::RectShape {
            nm: None,
            hd: false,
            d: None,
            s: Property::fixed(size),
            p: Property::fixed([0.0, 0.0]),
            r: Property::fixed(radius),
        }
    }

    #[test]
    fn rectangle_node_builds_closed_contour() {
        let mut node = PathNode::new(PathSource::rectangle(&rect([100.0, 50.0], 0.0), 10), CurvePrecision::default());
        node.update_all(0.0);
        node.rebuild();
        assert!(node.output().is_closed());
        assert!((node.output().length() - 300.0).abs() < 1e-3);
    }

    #[test]
    fn round_corners_only_on_rectangles() {
        let corners = data::RoundCornersShape { nm: None, hd: false, r: Property::fixed(10.0) };
        let mut source = PathSource::rectangle(&rect([100.0, 100.0], 0.0), 10);
        assert!(source.apply_round_corners(&corners, 10));

        let ellipse = data::EllipseShape { nm: None, hd: false, d: None, s: Property::fixed([10.0, 10.0]), p: Property::fixed([0.0, 0.0]) };
        let mut source = PathSource::ellipse(&ellipse, 10);
        assert!(!source.apply_round_corners(&corners, 10));
    }

    #[test]
    fn trim_swaps_and_scales() {
        let shape = data::TrimShape {
            nm: None,
            hd: false,
            s: Property::fixed(80.0),
            e: Property::fixed(20.0),
            o: Property::fixed(450.0),
            m: 2,
        };
        let mut node = TrimNode::from_data(&shape, 10);
        node.update_all(0.0);
        node.rebuild();
        let out = node.output();
        assert!((out.start - 0.2).abs() < 1e-6);
        assert!((out.end - 0.8).abs() < 1e-6);
        assert!((out.offset - 0.25).abs() < 1e-6);
        assert_eq!(out.mode, TrimMode::Individually);
    }
}
