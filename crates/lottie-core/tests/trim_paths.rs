use glam::Vec2;
use lottie_core::config::CurvePrecision;
use lottie_core::geometry::{
    ellipse_path, trim_compound, trim_compound_tagged, BezierPath, CurveVertex, PathDirection, TrimMode,
};

fn precise() -> CurvePrecision {
    CurvePrecision { accuracy: 0.01, max_samples: 20, length_samples: 50 }
}

fn line(from: Vec2, to: Vec2) -> BezierPath {
    BezierPath::from_vertices([CurveVertex::corner(from), CurveVertex::corner(to)], false, precise())
}

fn endpoints(path: &BezierPath) -> (Vec2, Vec2) {
    let elements = path.elements();
    (elements[0].vertex.point, elements[elements.len() - 1].vertex.point)
}

fn assert_near(actual: Vec2, expected: Vec2) {
    assert!(actual.distance(expected) < 1e-3, "{actual:?} != {expected:?}");
}

#[test]
fn full_window_returns_input_unchanged() {
    let circle = ellipse_path(Vec2::splat(100.0), Vec2::ZERO, PathDirection::Clockwise, precise());
    assert_eq!(circle.trim(0.0, 1.0, 0.0), vec![circle.clone()]);

    let paths = vec![circle.clone(), line(Vec2::ZERO, Vec2::new(3.0, 4.0))];
    for mode in [TrimMode::Simultaneously, TrimMode::Individually] {
        assert_eq!(trim_compound(&paths, 0.0, 1.0, 0.0, mode).paths(), paths.as_slice());
    }
}

#[test]
fn complementary_windows_cover_the_length() {
    let circle = ellipse_path(Vec2::splat(100.0), Vec2::ZERO, PathDirection::Clockwise, precise());
    let (a, b) = (0.3, 0.7);
    let inside: f32 = circle.trim(a, b, 0.0).iter().map(BezierPath::length).sum();
    let outside = circle.trim(b, a, 0.0);
    assert_eq!(outside.len(), 2);
    let outside: f32 = outside.iter().map(BezierPath::length).sum();
    assert!((inside + outside - circle.length()).abs() < 0.5, "{inside} + {outside} vs {}", circle.length());
}

#[test]
fn individually_spans_neighbouring_contours() {
    let a = line(Vec2::ZERO, Vec2::new(10.0, 0.0));
    let b = line(Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0));
    let pieces = trim_compound_tagged(&[a, b], 0.25, 0.75, 0.0, TrimMode::Individually);

    assert_eq!(pieces.len(), 2);
    assert_eq!(pieces[0].0, 0);
    let (start, end) = endpoints(&pieces[0].1);
    assert_near(start, Vec2::new(5.0, 0.0));
    assert_near(end, Vec2::new(10.0, 0.0));

    assert_eq!(pieces[1].0, 1);
    let (start, end) = endpoints(&pieces[1].1);
    assert_near(start, Vec2::new(0.0, 10.0));
    assert_near(end, Vec2::new(5.0, 10.0));
}

#[test]
fn individually_wraps_around_the_end() {
    let a = line(Vec2::ZERO, Vec2::new(10.0, 0.0));
    let b = line(Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0));
    let pieces = trim_compound_tagged(&[a, b], 0.75, 0.25, 0.0, TrimMode::Individually);

    let owners: Vec<usize> = pieces.iter().map(|(owner, _)| *owner).collect();
    assert_eq!(owners, [0, 1]);
    let (start, end) = endpoints(&pieces[0].1);
    assert_near(start, Vec2::ZERO);
    assert_near(end, Vec2::new(5.0, 0.0));
    let (start, end) = endpoints(&pieces[1].1);
    assert_near(start, Vec2::new(5.0, 10.0));
    assert_near(end, Vec2::new(10.0, 10.0));
}

#[test]
fn offset_shifts_the_window() {
    let path = line(Vec2::ZERO, Vec2::new(100.0, 0.0));
    let pieces = path.trim(0.0, 0.5, 0.25);
    assert_eq!(pieces.len(), 1);
    let (start, end) = endpoints(&pieces[0]);
    assert_near(start, Vec2::new(25.0, 0.0));
    assert_near(end, Vec2::new(75.0, 0.0));

    // Pushed past the end, the window comes back round as two pieces.
    let pieces = path.trim(0.0, 0.5, 0.75);
    assert_eq!(pieces.len(), 2);
    let total: f32 = pieces.iter().map(BezierPath::length).sum();
    assert!((total - 50.0).abs() < 1e-3);
}

#[test]
fn simultaneously_uses_each_contour_length() {
    let short = line(Vec2::ZERO, Vec2::new(10.0, 0.0));
    let long = line(Vec2::ZERO, Vec2::new(0.0, 40.0));
    let trimmed = trim_compound(&[short, long], 0.0, 0.5, 0.0, TrimMode::Simultaneously);
    let lengths: Vec<f32> = trimmed.paths().iter().map(BezierPath::length).collect();
    assert_eq!(lengths.len(), 2);
    assert!((lengths[0] - 5.0).abs() < 1e-3);
    assert!((lengths[1] - 20.0).abs() < 1e-3);
}

#[test]
fn degenerate_inputs_yield_nothing() {
    let single = BezierPath::from_vertices([CurveVertex::corner(Vec2::ONE)], false, precise());
    assert!(single.trim(0.2, 0.4, 0.0).is_empty());
    assert!(line(Vec2::ZERO, Vec2::X).trim(0.3, 0.3, 0.0).is_empty());
}
