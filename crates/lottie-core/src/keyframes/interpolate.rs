use glam::{Vec2, Vec3, Vec4};
use lottie_data::model::TextDocument;

use crate::geometry::BezierPath;

/// Values a keyframe span can blend between.
pub trait Interpolatable: Clone + Default {
    fn interpolate(&self, to: &Self, amount: f32) -> Self;

    /// Interpolation along a spatial bezier. Only position-like values bend
    /// their motion path; everything else falls back to [`interpolate`].
    ///
    /// [`interpolate`]: Interpolatable::interpolate
    fn interpolate_spatial(
        &self,
        to: &Self,
        amount: f32,
        _out_tangent: Option<Vec3>,
        _in_tangent: Option<Vec3>,
        _samples: u32,
    ) -> Self {
        self.interpolate(to, amount)
    }
}

impl Interpolatable for f32 {
    fn interpolate(&self, to: &Self, amount: f32) -> Self {
        self + (to - self) * amount
    }
}

impl Interpolatable for Vec2 {
    fn interpolate(&self, to: &Self, amount: f32) -> Self {
        self.lerp(*to, amount)
    }

    fn interpolate_spatial(
        &self,
        to: &Self,
        amount: f32,
        out_tangent: Option<Vec3>,
        in_tangent: Option<Vec3>,
        samples: u32,
    ) -> Self {
        spatial_point(self.extend(0.0), to.extend(0.0), amount, out_tangent, in_tangent, samples).truncate()
    }
}

impl Interpolatable for Vec3 {
    fn interpolate(&self, to: &Self, amount: f32) -> Self {
        self.lerp(*to, amount)
    }

    fn interpolate_spatial(
        &self,
        to: &Self,
        amount: f32,
        out_tangent: Option<Vec3>,
        in_tangent: Option<Vec3>,
        samples: u32,
    ) -> Self {
        spatial_point(*self, *to, amount, out_tangent, in_tangent, samples)
    }
}

// Colors, channel-wise.
impl Interpolatable for Vec4 {
    fn interpolate(&self, to: &Self, amount: f32) -> Self {
        self.lerp(*to, amount)
    }
}

// Gradient stop arrays.
impl Interpolatable for Vec<f32> {
    fn interpolate(&self, to: &Self, amount: f32) -> Self {
        if self.len() != to.len() {
            return if amount < 1.0 { self.clone() } else { to.clone() };
        }
        self.iter().zip(to.iter()).map(|(a, b)| a + (b - a) * amount).collect()
    }
}

impl Interpolatable for TextDocument {
    fn interpolate(&self, to: &Self, amount: f32) -> Self {
        if amount < 1.0 {
            self.clone()
        } else {
            to.clone()
        }
    }
}

impl Interpolatable for BezierPath {
    fn interpolate(&self, to: &Self, amount: f32) -> Self {
        BezierPath::interpolate(self, to, amount)
    }
}

fn cubic_point(p0: Vec3, c1: Vec3, c2: Vec3, p1: Vec3, t: f32) -> Vec3 {
    let mt = 1.0 - t;
    p0 * (mt * mt * mt) + c1 * (3.0 * mt * mt * t) + c2 * (3.0 * mt * t * t) + p1 * (t * t * t)
}

fn colinear(a: Vec3, b: Vec3, c: Vec3) -> bool {
    (b - a).cross(c - a).length_squared() < 1e-6
}

/// Point at `amount` of the arc length of the cubic `from -> to` whose
/// handles are `out_tangent`/`in_tangent` relative to the ends.
fn spatial_point(
    from: Vec3,
    to: Vec3,
    amount: f32,
    out_tangent: Option<Vec3>,
    in_tangent: Option<Vec3>,
    samples: u32,
) -> Vec3 {
    if amount <= 0.0 {
        return from;
    }
    if amount >= 1.0 {
        return to;
    }
    let c1 = from + out_tangent.unwrap_or(Vec3::ZERO);
    let c2 = to + in_tangent.unwrap_or(Vec3::ZERO);
    if colinear(from, c1, c2) && colinear(c1, c2, to) {
        return from.lerp(to, amount);
    }

    let samples = samples.max(2) as usize;
    let mut table = Vec::with_capacity(samples + 1);
    let mut previous = from;
    let mut total = 0.0;
    table.push(0.0);
    for i in 1..=samples {
        let point = cubic_point(from, c1, c2, to, i as f32 / samples as f32);
        total += previous.distance(point);
        table.push(total);
        previous = point;
    }
    if total <= 0.0 {
        return from;
    }

    let target = amount * total;
    let index = table.partition_point(|d| *d < target).clamp(1, samples);
    let (lo, hi) = (table[index - 1], table[index]);
    let local = if hi > lo { (target - lo) / (hi - lo) } else { 0.0 };
    let t = ((index - 1) as f32 + local) / samples as f32;
    cubic_point(from, c1, c2, to, t)
}
