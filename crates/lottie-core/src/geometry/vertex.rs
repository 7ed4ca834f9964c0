use glam::{Mat3, Vec2};

/// A path vertex with absolute tangent handles.
///
/// A tangent equal to `point` is a zero handle; a segment whose outgoing and
/// incoming handles are both zero is a straight line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveVertex {
    pub point: Vec2,
    pub in_tangent: Vec2,
    pub out_tangent: Vec2,
}

/// Result of cutting the span between two vertices.
#[derive(Debug, Clone, Copy)]
pub struct CurveSplit {
    pub start: CurveVertex,
    pub trim_point: CurveVertex,
    pub end: CurveVertex,
}

impl CurveVertex {
    pub fn absolute(point: Vec2, in_tangent: Vec2, out_tangent: Vec2) -> Self {
        Self {
            point,
            in_tangent,
            out_tangent,
        }
    }

    /// Builds a vertex from handles given relative to `point`.
    pub fn relative(point: Vec2, in_relative: Vec2, out_relative: Vec2) -> Self {
        Self {
            point,
            in_tangent: point + in_relative,
            out_tangent: point + out_relative,
        }
    }

    pub fn corner(point: Vec2) -> Self {
        Self::absolute(point, point, point)
    }

    pub fn in_tangent_relative(&self) -> Vec2 {
        self.in_tangent - self.point
    }

    pub fn out_tangent_relative(&self) -> Vec2 {
        self.out_tangent - self.point
    }

    /// Swaps the handles, used when reversing winding.
    pub fn reversed(&self) -> Self {
        Self::absolute(self.point, self.out_tangent, self.in_tangent)
    }

    pub fn translated(&self, by: Vec2) -> Self {
        Self::absolute(self.point + by, self.in_tangent + by, self.out_tangent + by)
    }

    pub fn transformed(&self, matrix: &Mat3) -> Self {
        Self::absolute(
            matrix.transform_point2(self.point),
            matrix.transform_point2(self.in_tangent),
            matrix.transform_point2(self.out_tangent),
        )
    }

    pub fn interpolate(&self, to: &CurveVertex, amount: f32) -> Self {
        Self::absolute(
            self.point.lerp(to.point, amount),
            self.in_tangent.lerp(to.in_tangent, amount),
            self.out_tangent.lerp(to.out_tangent, amount),
        )
    }

    fn is_straight_to(&self, to: &CurveVertex) -> bool {
        self.out_tangent_relative() == Vec2::ZERO && to.in_tangent_relative() == Vec2::ZERO
    }

    /// De Casteljau subdivision of the span `self -> to` at parameter `position`.
    pub fn split_curve(&self, to: &CurveVertex, position: f32) -> CurveSplit {
        if position <= 0.0 {
            return CurveSplit {
                start: *self,
                trim_point: CurveVertex::corner(self.point),
                end: *to,
            };
        }
        if position >= 1.0 {
            return CurveSplit {
                start: *self,
                trim_point: CurveVertex::corner(to.point),
                end: *to,
            };
        }
        if self.is_straight_to(to) {
            return CurveSplit {
                start: *self,
                trim_point: CurveVertex::corner(self.point.lerp(to.point, position)),
                end: *to,
            };
        }

        let a = self.point.lerp(self.out_tangent, position);
        let b = self.out_tangent.lerp(to.in_tangent, position);
        let c = to.in_tangent.lerp(to.point, position);
        let d = a.lerp(b, position);
        let e = b.lerp(c, position);
        let f = d.lerp(e, position);

        CurveSplit {
            start: CurveVertex::absolute(self.point, self.in_tangent, a),
            trim_point: CurveVertex::absolute(f, d, e),
            end: CurveVertex::absolute(to.point, c, to.out_tangent),
        }
    }

    /// Cuts the span at an arc length.
    ///
    /// The parametric guess `at_length / curve_length` is refined up to
    /// `max_samples` times, correcting by the measured length error until it
    /// falls below `accuracy`.
    pub fn trim_curve(
        &self,
        to: &CurveVertex,
        at_length: f32,
        curve_length: f32,
        max_samples: u32,
        accuracy: f32,
        length_samples: u32,
    ) -> CurveSplit {
        if curve_length <= 0.0 {
            return self.split_curve(to, 0.0);
        }
        let mut position = at_length / curve_length;
        let mut split = self.split_curve(to, position);
        if self.is_straight_to(to) {
            return split;
        }

        for _ in 0..max_samples {
            let length = split.start.distance_to(&split.trim_point, length_samples);
            let diff = at_length - length;
            if diff.abs() < accuracy || length <= 0.0 {
                break;
            }
            let correction = ((position / length) * diff)
                .min(position * 0.5)
                .max(position * -0.5);
            position += correction;
            split = self.split_curve(to, position);
        }
        split
    }

    /// Arc length of the span `self -> to`, approximated by a polyline of
    /// `samples` segments. Straight spans are measured exactly.
    pub fn distance_to(&self, to: &CurveVertex, samples: u32) -> f32 {
        if self.is_straight_to(to) {
            return self.point.distance(to.point);
        }
        let samples = samples.max(1);
        let mut distance = 0.0;
        let mut previous = self.point;
        for i in 1..samples {
            let t = i as f32 / samples as f32;
            let point = self.split_curve(to, t).trim_point.point;
            distance += previous.distance(point);
            previous = point;
        }
        distance + previous.distance(to.point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter_arc() -> (CurveVertex, CurveVertex) {
        let k = 0.55228 * 100.0;
        let a = CurveVertex::relative(Vec2::new(100.0, 0.0), Vec2::ZERO, Vec2::new(0.0, k));
        let b = CurveVertex::relative(Vec2::new(0.0, 100.0), Vec2::new(k, 0.0), Vec2::ZERO);
        (a, b)
    }

    #[test]
    fn straight_span_is_exact() {
        let a = CurveVertex::corner(Vec2::ZERO);
        let b = CurveVertex::corner(Vec2::new(3.0, 4.0));
        assert_eq!(a.distance_to(&b, 25), 5.0);
        let split = a.split_curve(&b, 0.5);
        assert_eq!(split.trim_point.point, Vec2::new(1.5, 2.0));
    }

    #[test]
    fn quarter_circle_length() {
        let (a, b) = quarter_arc();
        let expected = std::f32::consts::FRAC_PI_2 * 100.0;
        let measured = a.distance_to(&b, 25);
        assert!((measured - expected).abs() < 0.5, "measured {measured}");
    }

    #[test]
    fn split_clamps_out_of_range_positions() {
        let (a, b) = quarter_arc();
        assert_eq!(a.split_curve(&b, -1.0).trim_point.point, a.point);
        assert_eq!(a.split_curve(&b, 2.0).trim_point.point, b.point);
    }

    #[test]
    fn trim_curve_hits_requested_length() {
        let (a, b) = quarter_arc();
        let total = a.distance_to(&b, 25);
        let target = total * 0.3;
        let split = a.trim_curve(&b, target, total, 3, 1.0, 25);
        let measured = split.start.distance_to(&split.trim_point, 25);
        assert!((measured - target).abs() < 1.0, "measured {measured}, target {target}");
    }

    #[test]
    fn trim_curve_zero_length_span() {
        let a = CurveVertex::corner(Vec2::ONE);
        let split = a.trim_curve(&a, 1.0, 0.0, 3, 1.0, 25);
        assert_eq!(split.trim_point.point, Vec2::ONE);
    }
}
