use std::f32::consts::PI;

use glam::Vec2;
use tracing::warn;

use super::path::BezierPath;
use super::vertex::CurveVertex;
use crate::config::CurvePrecision;

const ELLIPSE_CONTROL_POINT: f32 = 0.55228;
const POLYSTAR_CONTROL_POINT: f32 = 0.47829;
/// Upper bound on star and polygon point counts read from a document.
pub const MAX_POLYSTAR_POINTS: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathDirection {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl PathDirection {
    pub fn from_raw(d: Option<u8>) -> Self {
        match d {
            Some(3) => PathDirection::CounterClockwise,
            _ => PathDirection::Clockwise,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolystarKind {
    Star,
    Polygon,
}

/// Parameters of a star or polygon. Roundness values are percentages and
/// `rotation` is in degrees.
#[derive(Debug, Clone, Copy)]
pub struct Polystar {
    pub kind: PolystarKind,
    pub position: Vec2,
    pub outer_radius: f32,
    pub inner_radius: f32,
    pub outer_roundness: f32,
    pub inner_roundness: f32,
    pub points: f32,
    pub rotation: f32,
}

fn finish(vertices: Vec<CurveVertex>, direction: PathDirection, precision: CurvePrecision) -> BezierPath {
    let mut path = match direction {
        PathDirection::Clockwise => BezierPath::from_vertices(vertices, false, precision),
        PathDirection::CounterClockwise => BezierPath::from_vertices(
            vertices.into_iter().rev().map(|v| v.reversed()),
            false,
            precision,
        ),
    };
    path.close();
    path
}

pub fn ellipse_path(size: Vec2, center: Vec2, direction: PathDirection, precision: CurvePrecision) -> BezierPath {
    let mut half = size * 0.5;
    if direction == PathDirection::CounterClockwise {
        half.x = -half.x;
    }
    let q1 = Vec2::new(center.x, center.y - half.y);
    let q2 = Vec2::new(center.x + half.x, center.y);
    let q3 = Vec2::new(center.x, center.y + half.y);
    let q4 = Vec2::new(center.x - half.x, center.y);
    let cp = half * ELLIPSE_CONTROL_POINT;

    let vertices = [
        CurveVertex::relative(q1, Vec2::new(-cp.x, 0.0), Vec2::new(cp.x, 0.0)),
        CurveVertex::relative(q2, Vec2::new(0.0, -cp.y), Vec2::new(0.0, cp.y)),
        CurveVertex::relative(q3, Vec2::new(cp.x, 0.0), Vec2::new(-cp.x, 0.0)),
        CurveVertex::relative(q4, Vec2::new(0.0, cp.y), Vec2::new(0.0, -cp.y)),
        CurveVertex::relative(q1, Vec2::new(-cp.x, 0.0), Vec2::new(cp.x, 0.0)),
    ];
    let mut path = BezierPath::from_vertices(vertices, false, precision);
    path.close();
    path
}

/// Rectangle centered at `position`, starting at the top-right corner.
/// `corner_radius` is clamped to half of the smaller side.
pub fn rectangle_path(
    position: Vec2,
    size: Vec2,
    corner_radius: f32,
    direction: PathDirection,
    precision: CurvePrecision,
) -> BezierPath {
    let half = size * 0.5;
    let radius = corner_radius.min(half.x).min(half.y);

    let vertices = if radius <= 0.0 {
        vec![
            CurveVertex::corner(Vec2::new(half.x, -half.y) + position),
            CurveVertex::corner(Vec2::new(half.x, half.y) + position),
            CurveVertex::corner(Vec2::new(-half.x, half.y) + position),
            CurveVertex::corner(Vec2::new(-half.x, -half.y) + position),
            CurveVertex::corner(Vec2::new(half.x, -half.y) + position),
        ]
    } else {
        let cp = radius * ELLIPSE_CONTROL_POINT;
        let top_right = Vec2::new(half.x - radius, -half.y + radius) + position;
        let bottom_right = Vec2::new(half.x - radius, half.y - radius) + position;
        let bottom_left = Vec2::new(-half.x + radius, half.y - radius) + position;
        let top_left = Vec2::new(-half.x + radius, -half.y + radius) + position;
        let v = |origin: Vec2, point: (f32, f32), in_t: (f32, f32), out_t: (f32, f32)| {
            CurveVertex::absolute(Vec2::from(point), Vec2::from(in_t), Vec2::from(out_t)).translated(origin)
        };
        vec![
            v(top_right, (radius, 0.0), (radius, 0.0), (radius, 0.0)),
            v(bottom_right, (radius, 0.0), (radius, 0.0), (radius, cp)),
            v(bottom_right, (0.0, radius), (cp, radius), (0.0, radius)),
            v(bottom_left, (0.0, radius), (0.0, radius), (-cp, radius)),
            v(bottom_left, (-radius, 0.0), (-radius, cp), (-radius, 0.0)),
            v(top_left, (-radius, 0.0), (-radius, 0.0), (-radius, -cp)),
            v(top_left, (0.0, -radius), (-cp, -radius), (0.0, -radius)),
            v(top_right, (0.0, -radius), (0.0, -radius), (cp, -radius)),
            v(top_right, (radius, 0.0), (radius, -cp), (radius, 0.0)),
        ]
    };
    finish(vertices, direction, precision)
}

/// Star or polygon outline. Fractional point counts produce a partial
/// last point.
pub fn polystar_path(star: &Polystar, direction: PathDirection, precision: CurvePrecision) -> BezierPath {
    let mut star = *star;
    if star.points > MAX_POLYSTAR_POINTS {
        warn!(points = star.points, max = MAX_POLYSTAR_POINTS, "polystar point count clamped");
        star.points = MAX_POLYSTAR_POINTS;
    }
    match star.kind {
        PolystarKind::Star => star_path(&star, direction, precision),
        PolystarKind::Polygon => polygon_path(&star, direction, precision),
    }
}

fn star_path(star: &Polystar, direction: PathDirection, precision: CurvePrecision) -> BezierPath {
    let points = star.points.max(0.0);
    if points <= 0.0 {
        return BezierPath::new(precision);
    }
    let mut angle = (star.rotation - 90.0).to_radians();
    let angle_per_point = 2.0 * PI / points;
    let half_angle = angle_per_point / 2.0;
    let partial = points - points.floor();
    let outer_roundness = star.outer_roundness * 0.01;
    let inner_roundness = star.inner_roundness * 0.01;
    let (outer, inner) = (star.outer_radius, star.inner_radius);

    let mut point;
    let mut partial_radius = 0.0;
    if partial != 0.0 {
        angle += half_angle * (1.0 - partial);
        partial_radius = inner + partial * (outer - inner);
        point = Vec2::new(partial_radius * angle.cos(), partial_radius * angle.sin());
        angle += angle_per_point * partial / 2.0;
    } else {
        point = Vec2::new(outer * angle.cos(), outer * angle.sin());
        angle += half_angle;
    }

    let mut vertices = vec![CurveVertex::corner(point + star.position)];
    let mut long_segment = false;
    let count = (points.ceil() * 2.0) as usize;
    for i in 0..count {
        let mut radius = if long_segment { outer } else { inner };
        let mut d_theta = half_angle;
        if partial_radius != 0.0 && i + 2 == count {
            d_theta = angle_per_point * partial / 2.0;
        }
        if partial_radius != 0.0 && i + 1 == count {
            radius = partial_radius;
        }
        let previous = point;
        point = Vec2::new(radius * angle.cos(), radius * angle.sin());

        if inner_roundness == 0.0 && outer_roundness == 0.0 {
            vertices.push(CurveVertex::corner(point + star.position));
        } else {
            let cp1_theta = previous.y.atan2(previous.x) - PI / 2.0;
            let cp2_theta = point.y.atan2(point.x) - PI / 2.0;
            let (cp1_roundness, cp2_roundness) = if long_segment {
                (inner_roundness, outer_roundness)
            } else {
                (outer_roundness, inner_roundness)
            };
            let (cp1_radius, cp2_radius) = if long_segment { (inner, outer) } else { (outer, inner) };

            let mut cp1 = Vec2::new(cp1_theta.cos(), cp1_theta.sin())
                * (cp1_radius * cp1_roundness * POLYSTAR_CONTROL_POINT);
            let mut cp2 = Vec2::new(cp2_theta.cos(), cp2_theta.sin())
                * (cp2_radius * cp2_roundness * POLYSTAR_CONTROL_POINT);
            if partial != 0.0 {
                if i == 0 {
                    cp1 *= partial;
                } else if i + 1 == count {
                    cp2 *= partial;
                }
            }
            if let Some(last) = vertices.last_mut() {
                *last = CurveVertex::absolute(last.point, last.in_tangent, last.point - cp1);
            }
            vertices.push(CurveVertex::relative(point + star.position, cp2, Vec2::ZERO));
        }
        angle += d_theta;
        long_segment = !long_segment;
    }
    finish(vertices, direction, precision)
}

fn polygon_path(star: &Polystar, direction: PathDirection, precision: CurvePrecision) -> BezierPath {
    let points = star.points.floor();
    if points < 1.0 {
        return BezierPath::new(precision);
    }
    let mut angle = (star.rotation - 90.0).to_radians();
    let angle_per_point = 2.0 * PI / points;
    let roundness = star.outer_roundness * 0.01;
    let radius = star.outer_radius;

    let mut point = Vec2::new(radius * angle.cos(), radius * angle.sin());
    let mut vertices = vec![CurveVertex::corner(point + star.position)];
    angle += angle_per_point;

    for _ in 0..points as usize {
        let previous = point;
        point = Vec2::new(radius * angle.cos(), radius * angle.sin());
        if roundness != 0.0 {
            let cp1_theta = previous.y.atan2(previous.x) - PI / 2.0;
            let cp2_theta = point.y.atan2(point.x) - PI / 2.0;
            let scale = radius * roundness * POLYSTAR_CONTROL_POINT;
            let cp1 = Vec2::new(cp1_theta.cos(), cp1_theta.sin()) * scale;
            let cp2 = Vec2::new(cp2_theta.cos(), cp2_theta.sin()) * scale;
            if let Some(last) = vertices.last_mut() {
                *last = CurveVertex::absolute(last.point, last.in_tangent, last.point - cp1);
            }
            vertices.push(CurveVertex::relative(point + star.position, cp2, Vec2::ZERO));
        } else {
            vertices.push(CurveVertex::corner(point + star.position));
        }
        angle += angle_per_point;
    }
    finish(vertices, direction, precision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ellipse_closes_at_top() {
        let path = ellipse_path(Vec2::new(100.0, 100.0), Vec2::ZERO, PathDirection::Clockwise, CurvePrecision::default());
        assert!(path.is_closed());
        assert_eq!(path.elements().len(), 5);
        assert_eq!(path.elements()[0].vertex.point, Vec2::new(0.0, -50.0));
        assert_eq!(path.elements()[1].vertex.point, Vec2::new(50.0, 0.0));
        let circumference = PI * 100.0;
        assert!((path.length() - circumference).abs() < 2.0, "{}", path.length());
    }

    #[test]
    fn counter_clockwise_ellipse_mirrors() {
        let path = ellipse_path(Vec2::new(100.0, 100.0), Vec2::ZERO, PathDirection::CounterClockwise, CurvePrecision::default());
        assert_eq!(path.elements()[1].vertex.point, Vec2::new(-50.0, 0.0));
    }

    #[test]
    fn sharp_rectangle() {
        let path = rectangle_path(Vec2::new(50.0, 50.0), Vec2::new(100.0, 40.0), 0.0, PathDirection::Clockwise, CurvePrecision::default());
        assert_eq!(path.elements().len(), 5);
        assert_eq!(path.elements()[0].vertex.point, Vec2::new(100.0, 30.0));
        assert_eq!(path.length(), 280.0);
    }

    #[test]
    fn rounded_rectangle_clamps_radius() {
        let path = rectangle_path(Vec2::ZERO, Vec2::new(100.0, 40.0), 500.0, PathDirection::Clockwise, CurvePrecision::default());
        assert_eq!(path.elements().len(), 9);
        // Radius 20 leaves 60 units of straight edge on the long sides.
        assert_eq!(path.elements()[0].vertex.point, Vec2::new(50.0, 0.0));
        let expected = 2.0 * 60.0 + 2.0 * PI * 20.0;
        assert!((path.length() - expected).abs() < 1.0, "{}", path.length());
    }

    #[test]
    fn reversed_rectangle_runs_backwards() {
        let cw = rectangle_path(Vec2::ZERO, Vec2::splat(10.0), 0.0, PathDirection::Clockwise, CurvePrecision::default());
        let ccw = rectangle_path(Vec2::ZERO, Vec2::splat(10.0), 0.0, PathDirection::CounterClockwise, CurvePrecision::default());
        assert_eq!(ccw.elements()[1].vertex.point, cw.elements()[3].vertex.point);
        assert_eq!(cw.length(), ccw.length());
    }

    #[test]
    fn five_point_star_vertex_count() {
        let star = Polystar {
            kind: PolystarKind::Star,
            position: Vec2::ZERO,
            outer_radius: 50.0,
            inner_radius: 20.0,
            outer_roundness: 0.0,
            inner_roundness: 0.0,
            points: 5.0,
            rotation: 0.0,
        };
        let path = polystar_path(&star, PathDirection::Clockwise, CurvePrecision::default());
        assert_eq!(path.elements().len(), 11);
        let top = path.elements()[0].vertex.point;
        assert!(top.x.abs() < 1e-4 && (top.y + 50.0).abs() < 1e-4);
    }

    #[test]
    fn huge_point_counts_are_clamped() {
        let mut star = Polystar {
            kind: PolystarKind::Star,
            position: Vec2::ZERO,
            outer_radius: 50.0,
            inner_radius: 20.0,
            outer_roundness: 0.0,
            inner_roundness: 0.0,
            points: 1.0e9,
            rotation: 0.0,
        };
        let path = polystar_path(&star, PathDirection::Clockwise, CurvePrecision::default());
        assert_eq!(path.elements().len(), 2 * MAX_POLYSTAR_POINTS as usize + 1);

        star.kind = PolystarKind::Polygon;
        let path = polystar_path(&star, PathDirection::Clockwise, CurvePrecision::default());
        assert_eq!(path.elements().len(), MAX_POLYSTAR_POINTS as usize + 1);
    }

    #[test]
    fn hexagon_perimeter() {
        let polygon = Polystar {
            kind: PolystarKind::Polygon,
            position: Vec2::ZERO,
            outer_radius: 10.0,
            inner_radius: 0.0,
            outer_roundness: 0.0,
            inner_roundness: 0.0,
            points: 6.0,
            rotation: 0.0,
        };
        let path = polystar_path(&polygon, PathDirection::Clockwise, CurvePrecision::default());
        assert_eq!(path.elements().len(), 7);
        assert!((path.length() - 60.0).abs() < 1e-3);
    }
}
