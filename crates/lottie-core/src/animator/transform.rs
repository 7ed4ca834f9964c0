use glam::{EulerRot, Mat3, Mat4, Vec3, Vec4};
use lottie_data::model as data;

use crate::keyframes::convert::{optional_track, scalar_track, scale_track, track, vec3_track};
use crate::keyframes::{KeyframeInterpolator, KeyframeTrack};
use crate::property::{AnyCell, CombinedInterpolator, PropertyCell, PropertyMap};

/// Matrix and opacity produced by a transform node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformOutput {
    /// Transform of this node alone.
    pub local: Mat4,
    /// `local` preceded by every ancestor transform.
    pub composed: Mat4,
    /// Opacity in `0..=1`.
    pub opacity: f32,
}

impl Default for TransformOutput {
    fn default() -> Self {
        Self {
            local: Mat4::IDENTITY,
            composed: Mat4::IDENTITY,
            opacity: 1.0,
        }
    }
}

/// Layer or shape-group transform.
#[derive(Debug)]
pub struct TransformNode {
    anchor: PropertyCell<Vec3>,
    position: PropertyCell<Vec3>,
    scale: PropertyCell<Vec3>,
    rotation: PropertyCell<f32>,
    rotation_x: Option<PropertyCell<f32>>,
    rotation_y: Option<PropertyCell<f32>>,
    orientation: Option<PropertyCell<Vec3>>,
    skew: PropertyCell<f32>,
    skew_axis: PropertyCell<f32>,
    opacity: PropertyCell<f32>,
    is_3d: bool,
    output: TransformOutput,
}

impl TransformNode {
    pub fn from_data(transform: &data::Transform, is_3d: bool, spatial_samples: u32) -> Self {
        let n = spatial_samples;
        Self {
            anchor: PropertyCell::animated(vec3_track(&transform.a, Vec3::ZERO), n),
            position: position_cell(&transform.p, n),
            scale: PropertyCell::animated(scale_track(&transform.s), n),
            rotation: PropertyCell::animated(scalar_track(&transform.rz, 0.0), n),
            rotation_x: is_3d.then(|| PropertyCell::animated(optional_track(transform.rx.as_ref(), 0.0, |v| *v), n)),
            rotation_y: is_3d.then(|| PropertyCell::animated(optional_track(transform.ry.as_ref(), 0.0, |v| *v), n)),
            orientation: match (&transform.or, is_3d) {
                (Some(or), true) => Some(PropertyCell::animated(vec3_track(or, Vec3::ZERO), n)),
                _ => None,
            },
            skew: PropertyCell::animated(scalar_track(&transform.sk, 0.0), n),
            skew_axis: PropertyCell::animated(scalar_track(&transform.sa, 0.0), n),
            opacity: PropertyCell::animated(scalar_track(&transform.o, 100.0), n),
            is_3d,
            output: TransformOutput::default(),
        }
    }

    /// A transform that never changes and maps points to themselves.
    pub fn identity() -> Self {
        Self::from_data(&data::Transform::default(), false, 0)
    }

    pub fn output(&self) -> &TransformOutput {
        &self.output
    }

    pub fn is_3d(&self) -> bool {
        self.is_3d
    }

    pub(crate) fn rebuild(&mut self, parent: Option<&TransformOutput>) {
        let mut anchor = *self.anchor.value();
        let mut position = *self.position.value();
        let cell = |c: &Option<PropertyCell<f32>>| c.as_ref().map_or(0.0, |c| *c.value());
        let mut rotation = Vec3::new(cell(&self.rotation_x), cell(&self.rotation_y), *self.rotation.value());
        let mut orientation = self.orientation.as_ref().map_or(Vec3::ZERO, |c| *c.value());
        if !self.is_3d {
            anchor.z = 0.0;
            position.z = 0.0;
            rotation.x = 0.0;
            rotation.y = 0.0;
            orientation = Vec3::ZERO;
        }

        let local = transform_matrix(
            anchor,
            position,
            *self.scale.value(),
            rotation,
            orientation,
            *self.skew.value(),
            *self.skew_axis.value(),
        );
        let composed = match parent {
            Some(parent) => parent.composed * local,
            None => local,
        };
        self.output = TransformOutput {
            local,
            composed,
            opacity: (*self.opacity.value() * 0.01).clamp(0.0, 1.0),
        };
    }
}

impl PropertyMap for TransformNode {
    fn visit_cells(&mut self, f: &mut dyn FnMut(&'static str, &mut dyn AnyCell)) {
        f("Anchor Point", &mut self.anchor);
        f("Position", &mut self.position);
        f("Scale", &mut self.scale);
        f("Rotation", &mut self.rotation);
        if let Some(cell) = &mut self.rotation_x {
            f("X Rotation", cell);
        }
        if let Some(cell) = &mut self.rotation_y {
            f("Y Rotation", cell);
        }
        if let Some(cell) = &mut self.orientation {
            f("Orientation", cell);
        }
        f("Skew", &mut self.skew);
        f("Skew Axis", &mut self.skew_axis);
        f("Opacity", &mut self.opacity);
    }
}

/// A position property, unified or split into per-axis tracks.
pub(crate) fn position_cell(position: &data::PositionProperty, spatial_samples: u32) -> PropertyCell<Vec3> {
    match position {
        data::PositionProperty::Unified(p) => {
            PropertyCell::animated(vec3_track(p, Vec3::ZERO), spatial_samples)
        }
        data::PositionProperty::Split { x, y, z } => {
            let parts = vec![
                KeyframeInterpolator::new(scalar_track(x, 0.0)),
                KeyframeInterpolator::new(scalar_track(y, 0.0)),
                KeyframeInterpolator::new(z.as_ref().map_or_else(|| KeyframeTrack::constant(0.0), |z| track(z, 0.0, |v| *v))),
            ];
            PropertyCell::new(Box::new(CombinedInterpolator::new(parts, |v: &[f32]| {
                Vec3::new(v[0], v[1], v[2])
            })))
        }
    }
}

/// `T · R · Skew · S · (−A)`, with rotations and skew in degrees and scale
/// in percent. Rotation applies orientation, then X, Y and Z.
pub fn transform_matrix(
    anchor: Vec3,
    position: Vec3,
    scale: Vec3,
    rotation: Vec3,
    orientation: Vec3,
    skew: f32,
    skew_axis: f32,
) -> Mat4 {
    let orient = Mat4::from_euler(
        EulerRot::YXZ,
        orientation.y.to_radians(),
        orientation.x.to_radians(),
        orientation.z.to_radians(),
    );
    let rotate = orient
        * Mat4::from_rotation_x(rotation.x.to_radians())
        * Mat4::from_rotation_y(rotation.y.to_radians())
        * Mat4::from_rotation_z(rotation.z.to_radians());

    Mat4::from_translation(position)
        * rotate
        * skew_matrix(skew, skew_axis)
        * Mat4::from_scale(scale * 0.01)
        * Mat4::from_translation(-anchor)
}

fn skew_matrix(skew: f32, axis: f32) -> Mat4 {
    if skew == 0.0 {
        return Mat4::IDENTITY;
    }
    let shear = Mat4::from_cols(
        Vec4::X,
        Vec4::new((-skew).to_radians().tan(), 1.0, 0.0, 0.0),
        Vec4::Z,
        Vec4::W,
    );
    let axis = axis.to_radians();
    Mat4::from_rotation_z(-axis) * shear * Mat4::from_rotation_z(axis)
}

/// The 2D affine part of `m`, for shape geometry.
pub fn affine_2d(m: &Mat4) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(m.x_axis.x, m.x_axis.y, 0.0),
        Vec3::new(m.y_axis.x, m.y_axis.y, 0.0),
        Vec3::new(m.w_axis.x, m.w_axis.y, 1.0),
    )
}
