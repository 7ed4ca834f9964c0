//! Conversion of parsed document properties into keyframe tracks.

use glam::{Vec2, Vec3, Vec4};
use lottie_data::model as data;

use super::keyframe::{Keyframe, KeyframeTrack};
use crate::config::CurvePrecision;
use crate::geometry::{BezierPath, CurveVertex};

fn easing(handle: Option<&data::EasingHandle>) -> Option<Vec2> {
    handle.map(|h| Vec2::new(h.x, h.y))
}

fn spatial(tangent: Option<&Vec<f32>>) -> Option<Vec3> {
    let t = tangent?;
    let x = *t.first()?;
    let y = t.get(1).copied().unwrap_or(0.0);
    let z = t.get(2).copied().unwrap_or(0.0);
    Some(Vec3::new(x, y, z))
}

/// Builds keyframes from raw document keyframes.
///
/// A keyframe's value is its `s`, or the previous keyframe's `e` when `s` is
/// absent; keyframes with neither are dropped. Temporal and spatial in
/// tangents come from the previous raw keyframe.
pub fn keyframes_from_raw<S, T>(raw: &[data::Keyframe<S>], map: impl Fn(&S) -> T) -> Vec<Keyframe<T>> {
    let mut keyframes = Vec::with_capacity(raw.len());
    let mut previous: Option<&data::Keyframe<S>> = None;
    for kf in raw {
        let value = kf.s.as_ref().or_else(|| previous.and_then(|p| p.e.as_ref()));
        if let Some(value) = value {
            keyframes.push(Keyframe {
                value: map(value),
                time: kf.t,
                is_hold: kf.h == Some(1),
                in_tangent: previous.and_then(|p| easing(p.i.as_ref())),
                out_tangent: easing(kf.o.as_ref()),
                spatial_in_tangent: previous.and_then(|p| spatial(p.ti.as_ref())),
                spatial_out_tangent: spatial(kf.to.as_ref()),
            });
        }
        previous = Some(kf);
    }
    keyframes
}

/// Track for `property`, or a constant `default` track when the property is
/// missing or has no usable keyframes.
pub fn track<S, T>(property: &data::Property<S>, default: T, map: impl Fn(&S) -> T) -> KeyframeTrack<T> {
    match &property.k {
        data::Value::Default => KeyframeTrack::constant(default),
        data::Value::Static(v) => KeyframeTrack::constant(map(v)),
        data::Value::Animated(raw) => {
            let keyframes = keyframes_from_raw(raw, map);
            if keyframes.is_empty() {
                KeyframeTrack::constant(default)
            } else {
                KeyframeTrack::new(keyframes)
            }
        }
    }
}

pub fn optional_track<S, T>(
    property: Option<&data::Property<S>>,
    default: T,
    map: impl Fn(&S) -> T,
) -> KeyframeTrack<T> {
    match property {
        Some(p) => track(p, default, map),
        None => KeyframeTrack::constant(default),
    }
}

pub fn scalar_track(property: &data::Property<f32>, default: f32) -> KeyframeTrack<f32> {
    track(property, default, |v| *v)
}

pub fn vec2_track(property: &data::Property<data::Vec2>, default: Vec2) -> KeyframeTrack<Vec2> {
    track(property, default, |v| Vec2::from(*v))
}

pub fn vec3_track(property: &data::Property<data::Vec3DefaultZero>, default: Vec3) -> KeyframeTrack<Vec3> {
    track(property, default, |v| Vec3::from(v.0))
}

pub fn scale_track(property: &data::Property<data::Vec3Scale>) -> KeyframeTrack<Vec3> {
    track(property, Vec3::splat(100.0), |v| Vec3::from(v.0))
}

pub fn color_track(property: &data::Property<data::Rgba>) -> KeyframeTrack<Vec4> {
    track(property, Vec4::new(0.0, 0.0, 0.0, 1.0), |c| Vec4::from(c.0))
}

pub fn path_track(property: &data::Property<data::BezierPath>, precision: CurvePrecision) -> KeyframeTrack<BezierPath> {
    track(property, BezierPath::new(precision), |raw| bezier_from_raw(raw, precision))
}

/// Converts raw contour data (handles relative to their vertex). Mismatched
/// array lengths keep the common prefix.
pub fn bezier_from_raw(raw: &data::BezierPath, precision: CurvePrecision) -> BezierPath {
    let count = raw.v.len().min(raw.i.len()).min(raw.o.len());
    let vertices = (0..count).map(|n| {
        CurveVertex::relative(Vec2::from(raw.v[n]), Vec2::from(raw.i[n]), Vec2::from(raw.o[n]))
    });
    BezierPath::from_vertices(vertices, raw.c, precision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottie_data::model::{EasingHandle, Property};

    #[test]
    fn tangents_come_from_neighbouring_raw_keyframes() {
        let mut k0 = data::Keyframe::at(0.0, 0.0_f32);
        k0.o = Some(EasingHandle { x: 0.1, y: 0.2 });
        k0.i = Some(EasingHandle { x: 0.7, y: 0.8 });
        k0.to = Some(vec![1.0, 2.0]);
        k0.ti = Some(vec![3.0, 4.0]);
        let k1 = data::Keyframe::at(10.0, 100.0_f32);

        let track = scalar_track(&Property::animated(vec![k0, k1]), 0.0);
        assert_eq!(track[0].out_tangent, Some(Vec2::new(0.1, 0.2)));
        assert_eq!(track[0].in_tangent, None);
        assert_eq!(track[1].in_tangent, Some(Vec2::new(0.7, 0.8)));
        assert_eq!(track[0].spatial_out_tangent, Some(Vec3::new(1.0, 2.0, 0.0)));
        assert_eq!(track[1].spatial_in_tangent, Some(Vec3::new(3.0, 4.0, 0.0)));
    }

    #[test]
    fn missing_start_value_uses_previous_end() {
        let mut k0 = data::Keyframe::at(0.0, 1.0_f32);
        k0.e = Some(5.0);
        let k1 = data::Keyframe::<f32> { s: None, h: Some(1), ..data::Keyframe::at(10.0, 0.0) };
        let track = scalar_track(&Property::animated(vec![k0, k1]), 0.0);
        assert_eq!(track.len(), 2);
        assert_eq!(track[1].value, 5.0);
        assert!(track[1].is_hold);
    }

    #[test]
    fn missing_property_uses_default() {
        let track = scalar_track(&Property::default(), 100.0);
        assert!(!track.is_animated());
        assert_eq!(track.first().value, 100.0);
    }

    #[test]
    fn closed_raw_path_repeats_first_vertex() {
        let raw = data::BezierPath {
            c: true,
            v: vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]],
            i: vec![[0.0, 0.0]; 3],
            o: vec![[0.0, 0.0]; 3],
        };
        let path = bezier_from_raw(&raw, CurvePrecision::default());
        assert_eq!(path.elements().len(), 4);
        assert!(path.is_closed());
        let expected = 20.0 + 200.0_f32.sqrt();
        assert!((path.length() - expected).abs() < 1e-3);
    }
}
