use glam::{Vec2, Vec4};
use lottie_data::model as data;

use crate::keyframes::convert::{color_track, optional_track, scalar_track, track, vec2_track};
use crate::keyframes::{KeyframeInterpolator, KeyframeTrack};
use crate::property::{AnyCell, CombinedInterpolator, PropertyCell, PropertyMap};
use crate::render::{
    parse_gradient_stops, DashPattern, Fill, FillRule, Gradient, GradientKind, LineCap, LineJoin, Paint, Stroke,
};

/// Cap, join and dashes shared by solid and gradient strokes.
#[derive(Debug)]
pub struct StrokeStyle {
    width: PropertyCell<f32>,
    cap: LineCap,
    join: LineJoin,
    miter_limit: f32,
    dash: Option<PropertyCell<DashPattern>>,
}

impl StrokeStyle {
    fn new(width: &data::Property<f32>, lc: u8, lj: u8, ml: Option<f32>, dashes: &[data::DashProperty], n: u32) -> Self {
        Self {
            width: PropertyCell::animated(scalar_track(width, 1.0), n),
            cap: LineCap::from_raw(lc),
            join: LineJoin::from_raw(lj),
            miter_limit: ml.unwrap_or(4.0),
            dash: dash_cell(dashes),
        }
    }

    fn stroke(&self, paint: Paint, opacity: f32) -> Stroke {
        Stroke {
            paint,
            width: *self.width.value(),
            opacity,
            cap: self.cap,
            join: self.join,
            miter_limit: self.miter_limit,
            dash: self.dash.as_ref().and_then(|d| d.value().normalized()),
        }
    }

    fn visit(&mut self, f: &mut dyn FnMut(&'static str, &mut dyn AnyCell)) {
        f("Stroke Width", &mut self.width);
        if let Some(cell) = &mut self.dash {
            f("Dashes", cell);
        }
    }
}

/// Dash entries folded into one cell. Lengths come first, in document
/// order, followed by the offset.
fn dash_cell(entries: &[data::DashProperty]) -> Option<PropertyCell<DashPattern>> {
    let mut parts = Vec::new();
    let mut offset = None;
    for entry in entries {
        let interpolator = KeyframeInterpolator::new(track(&entry.v, 0.0, |v| *v));
        match entry.n.as_deref() {
            Some("o") => offset = Some(interpolator),
            Some("d") | Some("g") | Some("v") => parts.push(interpolator),
            _ => {}
        }
    }
    if parts.is_empty() {
        return None;
    }
    parts.push(offset.unwrap_or_else(|| KeyframeInterpolator::new(KeyframeTrack::constant(0.0))));
    Some(PropertyCell::new(Box::new(CombinedInterpolator::new(parts, dash_from_parts))))
}

fn dash_from_parts(values: &[f32]) -> DashPattern {
    match values.split_last() {
        Some((offset, array)) => DashPattern { array: array.to_vec(), offset: *offset },
        None => DashPattern::default(),
    }
}

#[derive(Debug)]
pub struct GradientCells {
    kind: GradientKind,
    color_count: usize,
    start: PropertyCell<Vec2>,
    end: PropertyCell<Vec2>,
    colors: PropertyCell<Vec<f32>>,
    highlight_length: PropertyCell<f32>,
    highlight_angle: PropertyCell<f32>,
}

impl GradientCells {
    #[allow(clippy::too_many_arguments)]
    fn new(
        t: u8,
        s: &data::Property<data::Vec2>,
        e: &data::Property<data::Vec2>,
        g: &data::GradientColors,
        h: Option<&data::Property<f32>>,
        a: Option<&data::Property<f32>>,
        n: u32,
    ) -> Self {
        Self {
            kind: if t == 2 { GradientKind::Radial } else { GradientKind::Linear },
            color_count: g.p as usize,
            start: PropertyCell::animated(vec2_track(s, Vec2::ZERO), n),
            end: PropertyCell::animated(vec2_track(e, Vec2::ZERO), n),
            colors: PropertyCell::animated(track(&g.k, Vec::new(), |v| v.clone()), n),
            highlight_length: PropertyCell::animated(optional_track(h, 0.0, |v| *v), n),
            highlight_angle: PropertyCell::animated(optional_track(a, 0.0, |v| *v), n),
        }
    }

    fn paint(&self) -> Paint {
        Paint::Gradient(Gradient {
            kind: self.kind,
            stops: parse_gradient_stops(self.colors.value(), self.color_count),
            start: *self.start.value(),
            end: *self.end.value(),
            highlight_length: *self.highlight_length.value(),
            highlight_angle: *self.highlight_angle.value(),
        })
    }

    fn visit(&mut self, f: &mut dyn FnMut(&'static str, &mut dyn AnyCell)) {
        f("Start Point", &mut self.start);
        f("End Point", &mut self.end);
        f("Colors", &mut self.colors);
        if self.kind == GradientKind::Radial {
            f("Highlight Length", &mut self.highlight_length);
            f("Highlight Angle", &mut self.highlight_angle);
        }
    }
}

#[derive(Debug)]
pub enum ShadingSource {
    Fill {
        color: PropertyCell<Vec4>,
        opacity: PropertyCell<f32>,
        rule: FillRule,
    },
    Stroke {
        color: PropertyCell<Vec4>,
        opacity: PropertyCell<f32>,
        style: StrokeStyle,
    },
    GradientFill {
        gradient: GradientCells,
        opacity: PropertyCell<f32>,
        rule: FillRule,
    },
    GradientStroke {
        gradient: GradientCells,
        opacity: PropertyCell<f32>,
        style: StrokeStyle,
    },
}

impl ShadingSource {
    pub fn fill(shape: &data::FillShape, n: u32) -> Self {
        ShadingSource::Fill {
            color: PropertyCell::animated(color_track(&shape.c), n),
            opacity: PropertyCell::animated(scalar_track(&shape.o, 100.0), n),
            rule: FillRule::from_raw(shape.r),
        }
    }

    pub fn stroke(shape: &data::StrokeShape, n: u32) -> Self {
        ShadingSource::Stroke {
            color: PropertyCell::animated(color_track(&shape.c), n),
            opacity: PropertyCell::animated(scalar_track(&shape.o, 100.0), n),
            style: StrokeStyle::new(&shape.w, shape.lc, shape.lj, shape.ml, &shape.d, n),
        }
    }

    pub fn gradient_fill(shape: &data::GradientFillShape, n: u32) -> Self {
        ShadingSource::GradientFill {
            gradient: GradientCells::new(shape.t, &shape.s, &shape.e, &shape.g, shape.h.as_ref(), shape.a.as_ref(), n),
            opacity: PropertyCell::animated(scalar_track(&shape.o, 100.0), n),
            rule: FillRule::from_raw(shape.r),
        }
    }

    pub fn gradient_stroke(shape: &data::GradientStrokeShape, n: u32) -> Self {
        ShadingSource::GradientStroke {
            gradient: GradientCells::new(shape.t, &shape.s, &shape.e, &shape.g, shape.h.as_ref(), shape.a.as_ref(), n),
            opacity: PropertyCell::animated(scalar_track(&shape.o, 100.0), n),
            style: StrokeStyle::new(&shape.w, shape.lc, shape.lj, shape.ml, &shape.d, n),
        }
    }
}

/// Resolved paint for the paths a shading item covers.
#[derive(Debug, Clone, PartialEq)]
pub enum Shading {
    Fill(Fill),
    Stroke(Stroke),
}

#[derive(Debug)]
pub struct ShadingNode {
    source: ShadingSource,
    output: Shading,
}

impl ShadingNode {
    pub fn new(source: ShadingSource) -> Self {
        Self {
            source,
            output: Shading::Fill(Fill {
                paint: Paint::Solid(Vec4::ZERO),
                opacity: 0.0,
                rule: FillRule::NonZero,
            }),
        }
    }

    pub fn output(&self) -> &Shading {
        &self.output
    }

    pub(crate) fn rebuild(&mut self) {
        self.output = match &self.source {
            ShadingSource::Fill { color, opacity, rule } => Shading::Fill(Fill {
                paint: Paint::Solid(*color.value()),
                opacity: *opacity.value() * 0.01,
                rule: *rule,
            }),
            ShadingSource::Stroke { color, opacity, style } => {
                Shading::Stroke(style.stroke(Paint::Solid(*color.value()), *opacity.value() * 0.01))
            }
            ShadingSource::GradientFill { gradient, opacity, rule } => Shading::Fill(Fill {
                paint: gradient.paint(),
                opacity: *opacity.value() * 0.01,
                rule: *rule,
            }),
            ShadingSource::GradientStroke { gradient, opacity, style } => {
                Shading::Stroke(style.stroke(gradient.paint(), *opacity.value() * 0.01))
            }
        };
    }
}

impl PropertyMap for ShadingNode {
    fn visit_cells(&mut self, f: &mut dyn FnMut(&'static str, &mut dyn AnyCell)) {
        match &mut self.source {
            ShadingSource::Fill { color, opacity, .. } => {
                f("Color", color);
                f("Opacity", opacity);
            }
            ShadingSource::Stroke { color, opacity, style } => {
                f("Color", color);
                f("Opacity", opacity);
                style.visit(f);
            }
            ShadingSource::GradientFill { gradient, opacity, .. } => {
                gradient.visit(f);
                f("Opacity", opacity);
            }
            ShadingSource::GradientStroke { gradient, opacity, style } => {
                gradient.visit(f);
                f("Opacity", opacity);
                style.visit(f);
            }
        }
    }
}
