use glam::Vec2;

const NEWTON_ITERATIONS: usize = 8;
const NEWTON_MIN_SLOPE: f32 = 1e-3;
const PRECISION: f32 = 1e-5;
const BISECTION_ITERATIONS: usize = 32;

/// The unit cubic bezier `(0,0) p1 p2 (1,1)` as a timing curve.
///
/// Each axis is kept in polynomial form `((a t + b) t + c) t`. Handle x
/// values are clamped to `0..=1` so that x stays monotone in `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicEasing {
    a: Vec2,
    b: Vec2,
    c: Vec2,
}

impl CubicEasing {
    pub fn new(p1: Vec2, p2: Vec2) -> Self {
        let p1 = Vec2::new(p1.x.clamp(0.0, 1.0), p1.y);
        let p2 = Vec2::new(p2.x.clamp(0.0, 1.0), p2.y);
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = Vec2::ONE - c - b;
        Self { a, b, c }
    }

    fn x_at(&self, t: f32) -> f32 {
        ((self.a.x * t + self.b.x) * t + self.c.x) * t
    }

    fn y_at(&self, t: f32) -> f32 {
        ((self.a.y * t + self.b.y) * t + self.c.y) * t
    }

    fn dx_at(&self, t: f32) -> f32 {
        (3.0 * self.a.x * t + 2.0 * self.b.x) * t + self.c.x
    }

    /// Curve parameter whose x equals `x`. Newton steps first; flat
    /// stretches of the curve fall back to bisection.
    fn parameter_for(&self, x: f32) -> f32 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = self.x_at(t) - x;
            if err.abs() < PRECISION {
                return t;
            }
            let slope = self.dx_at(t);
            if slope.abs() < NEWTON_MIN_SLOPE {
                break;
            }
            let next = t - err / slope;
            if !(0.0..=1.0).contains(&next) {
                break;
            }
            t = next;
        }

        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        t = x;
        for _ in 0..BISECTION_ITERATIONS {
            let err = self.x_at(t) - x;
            if err.abs() < PRECISION {
                break;
            }
            if err > 0.0 {
                hi = t;
            } else {
                lo = t;
            }
            t = 0.5 * (lo + hi);
        }
        t
    }

    /// Eased progress for linear progress `x`.
    pub fn ease(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        self.y_at(self.parameter_for(x))
    }
}

/// One-shot form of [`CubicEasing::ease`].
pub fn cubic_ease(p1: Vec2, p2: Vec2, x: f32) -> f32 {
    CubicEasing::new(p1, p2).ease(x)
}
