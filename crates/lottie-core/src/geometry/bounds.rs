use glam::Vec2;
use kurbo::Rect;

use super::path::BezierPath;

/// Point buffer reused across frames when computing control-point bounds.
///
/// Not shared between threads; each evaluating thread keeps its own.
#[derive(Debug, Default)]
pub struct BoundingBoxScratch {
    points: Vec<Vec2>,
}

impl BoundingBoxScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds of the vertices and the handles of curved spans. Empty input
    /// yields a zero rect.
    pub fn bounds<'a>(&mut self, paths: impl IntoIterator<Item = &'a BezierPath>) -> Rect {
        self.points.clear();
        for path in paths {
            let elements = path.elements();
            for (i, element) in elements.iter().enumerate() {
                self.points.push(element.vertex.point);
                if i == 0 {
                    continue;
                }
                let previous = &elements[i - 1];
                let straight = previous.vertex.out_tangent_relative() == Vec2::ZERO
                    && element.vertex.in_tangent_relative() == Vec2::ZERO;
                if !straight {
                    self.points.push(previous.vertex.out_tangent);
                    self.points.push(element.vertex.in_tangent);
                }
            }
        }

        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        let (min, max) = self
            .points
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Rect::new(min.x as f64, min.y as f64, max.x as f64, max.y as f64)
    }
}
