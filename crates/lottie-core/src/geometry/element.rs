use super::vertex::CurveVertex;
use crate::config::CurvePrecision;

/// One vertex of a path plus the measured length of the span that ends at it.
/// The first element of a path always has zero length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathElement {
    pub length: f32,
    pub vertex: CurveVertex,
}

/// The two halves produced by [`PathElement::split_element_at_position`].
#[derive(Debug, Clone, Copy)]
pub struct ElementSplit {
    pub left: (PathElement, PathElement),
    pub right: (PathElement, PathElement),
}

impl PathElement {
    pub fn new(vertex: CurveVertex) -> Self {
        Self {
            length: 0.0,
            vertex,
        }
    }

    /// Element for the span from this element's vertex to `to`.
    pub fn path_element_to(&self, to: CurveVertex, precision: &CurvePrecision) -> PathElement {
        PathElement {
            length: self.vertex.distance_to(&to, precision.length_samples),
            vertex: to,
        }
    }

    /// Replaces the vertex, keeping the measured length.
    pub fn with_vertex(&self, vertex: CurveVertex) -> PathElement {
        PathElement {
            length: self.length,
            vertex,
        }
    }

    /// Cuts the span `from -> self` at `at_length`.
    pub fn split_element_at_position(
        &self,
        from: &PathElement,
        at_length: f32,
        precision: &CurvePrecision,
    ) -> ElementSplit {
        let cut = from.vertex.trim_curve(
            &self.vertex,
            at_length,
            self.length,
            precision.max_samples,
            precision.accuracy,
            precision.length_samples,
        );

        let left_start = PathElement {
            length: from.length,
            vertex: CurveVertex::absolute(from.vertex.point, from.vertex.in_tangent, cut.start.out_tangent),
        };
        let left_end = left_start.path_element_to(
            CurveVertex::absolute(cut.trim_point.point, cut.trim_point.in_tangent, cut.trim_point.point),
            precision,
        );
        let right_start = PathElement::new(CurveVertex::absolute(
            cut.trim_point.point,
            cut.trim_point.point,
            cut.trim_point.out_tangent,
        ));
        let right_end = right_start.path_element_to(
            CurveVertex::absolute(cut.end.point, cut.end.in_tangent, self.vertex.out_tangent),
            precision,
        );

        ElementSplit {
            left: (left_start, left_end),
            right: (right_start, right_end),
        }
    }
}
