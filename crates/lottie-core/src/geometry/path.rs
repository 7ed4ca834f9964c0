use glam::{Mat3, Vec2};
use kurbo::BezPath;

use super::element::PathElement;
use super::vertex::CurveVertex;
use crate::config::CurvePrecision;

/// A single contour of cubic spans.
///
/// Closed contours repeat their first vertex as the last element; `closed`
/// only tells the renderer to close the subpath.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierPath {
    elements: Vec<PathElement>,
    closed: bool,
    length: f32,
    precision: CurvePrecision,
}

impl Default for BezierPath {
    fn default() -> Self {
        Self::new(CurvePrecision::default())
    }
}

/// Maps `x` into `[0, 1)`.
fn wrap_unit(x: f32) -> f32 {
    x - x.floor()
}

/// Normalized trim window for fractional `start`/`end` shifted by `offset`.
///
/// Returns `None` when nothing survives the trim. A window with
/// `start > end` wraps around the end of the path.
pub fn normalize_trim(start: f32, end: f32, offset: f32) -> Option<(f32, f32)> {
    if start == end {
        return None;
    }
    if (end - start).abs() >= 1.0 {
        return Some((0.0, 1.0));
    }
    let mut s = wrap_unit(start + offset);
    let mut e = wrap_unit(end + offset);
    if s >= 1.0 {
        s = 0.0;
    }
    if e == 0.0 {
        e = 1.0;
    }
    if s == e {
        return None;
    }
    Some((s, e))
}

impl BezierPath {
    pub fn new(precision: CurvePrecision) -> Self {
        Self {
            elements: Vec::new(),
            closed: false,
            length: 0.0,
            precision,
        }
    }

    /// Builds a path through `vertices` in order. When `closed` is set the
    /// first vertex is appended again so the closing span is measurable.
    pub fn from_vertices(
        vertices: impl IntoIterator<Item = CurveVertex>,
        closed: bool,
        precision: CurvePrecision,
    ) -> Self {
        let mut path = Self::new(precision);
        for vertex in vertices {
            path.add_vertex(vertex);
        }
        if closed {
            if let Some(first) = path.elements.first().map(|e| e.vertex) {
                path.add_vertex(first);
            }
            path.close();
        }
        path
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn precision(&self) -> CurvePrecision {
        self.precision
    }

    fn remeasure(&mut self) {
        self.length = self.elements.iter().skip(1).map(|e| e.length).sum();
    }

    pub fn move_to_start_point(&mut self, vertex: CurveVertex) {
        self.elements.clear();
        self.elements.push(PathElement::new(vertex));
        self.length = 0.0;
    }

    pub fn add_vertex(&mut self, vertex: CurveVertex) {
        let element = match self.elements.last() {
            Some(previous) => previous.path_element_to(vertex, &self.precision),
            None => PathElement::new(vertex),
        };
        self.add_element(element);
    }

    /// Appends an already measured element. The first element of a path
    /// never carries a length.
    pub fn add_element(&mut self, element: PathElement) {
        if self.elements.is_empty() {
            self.elements.push(PathElement::new(element.vertex));
            return;
        }
        self.length += element.length;
        self.elements.push(element);
    }

    pub fn add_curve(&mut self, to: Vec2, out_tangent: Vec2, in_tangent: Vec2) {
        let Some(last) = self.elements.len().checked_sub(1) else {
            return;
        };
        let previous = self.elements[last].vertex;
        self.update_vertex(
            CurveVertex::absolute(previous.point, previous.in_tangent, out_tangent),
            last,
            false,
        );
        self.add_vertex(CurveVertex::absolute(to, in_tangent, to));
    }

    pub fn add_line(&mut self, to: Vec2) {
        let Some(last) = self.elements.len().checked_sub(1) else {
            return;
        };
        let previous = self.elements[last].vertex;
        self.update_vertex(
            CurveVertex::absolute(previous.point, previous.in_tangent, previous.point),
            last,
            false,
        );
        self.add_vertex(CurveVertex::corner(to));
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Replaces the vertex at `index`. With `remeasure` the spans on both
    /// sides of the vertex are measured again.
    pub fn update_vertex(&mut self, vertex: CurveVertex, index: usize, remeasure: bool) {
        if index >= self.elements.len() {
            return;
        }
        if !remeasure {
            self.elements[index] = self.elements[index].with_vertex(vertex);
            return;
        }
        let updated = match index.checked_sub(1) {
            Some(previous) => self.elements[previous].path_element_to(vertex, &self.precision),
            None => PathElement::new(vertex),
        };
        self.elements[index] = updated;
        if let Some(next) = self.elements.get(index + 1).map(|e| e.vertex) {
            self.elements[index + 1] = updated.path_element_to(next, &self.precision);
        }
        self.remeasure();
    }

    /// Copy of the path with every vertex mapped through `matrix`.
    pub fn transformed(&self, matrix: &Mat3) -> BezierPath {
        if *matrix == Mat3::IDENTITY {
            return self.clone();
        }
        let mut path = Self::new(self.precision);
        path.elements.reserve(self.elements.len());
        for element in &self.elements {
            path.add_vertex(element.vertex.transformed(matrix));
        }
        path.closed = self.closed;
        path
    }

    /// Vertex-wise interpolation. Paths with different vertex counts snap to
    /// `to` once `amount` reaches 1.
    pub fn interpolate(&self, to: &BezierPath, amount: f32) -> BezierPath {
        if self.elements.len() != to.elements.len() {
            return if amount < 1.0 { self.clone() } else { to.clone() };
        }
        let mut path = Self::new(self.precision);
        for (a, b) in self.elements.iter().zip(&to.elements) {
            path.add_vertex(a.vertex.interpolate(&b.vertex, amount));
        }
        path.closed = if amount < 1.0 { self.closed } else { to.closed };
        path
    }

    /// Trims by fractions of the total length. `offset` shifts both ends and
    /// may wrap the window around the end of the path, yielding two pieces.
    pub fn trim(&self, from: f32, to: f32, offset: f32) -> Vec<BezierPath> {
        let Some((start, end)) = normalize_trim(from, to, offset) else {
            return Vec::new();
        };
        if start == 0.0 && end == 1.0 {
            return vec![self.clone()];
        }
        if self.elements.len() <= 1 {
            return Vec::new();
        }
        let length = self.length;
        if start > end {
            self.trim_path_at_lengths(&[(0.0, end * length), (start * length, length)])
        } else {
            self.trim_path_at_lengths(&[(start * length, end * length)])
        }
    }

    /// Trims to the absolute length range `[from, to]`, clamped to the path.
    pub fn trim_lengths(&self, from: f32, to: f32) -> Vec<BezierPath> {
        let from = from.max(0.0);
        let to = to.min(self.length);
        if from <= 0.0 && to >= self.length {
            return vec![self.clone()];
        }
        if to <= from || self.elements.len() <= 1 {
            return Vec::new();
        }
        self.trim_path_at_lengths(&[(from, to)])
    }

    fn trim_path_at_lengths(&self, positions: &[(f32, f32)]) -> Vec<BezierPath> {
        let Some((&(mut start, mut end), rest)) = positions.split_first() else {
            return Vec::new();
        };
        let mut remaining = rest.iter().copied();
        let precision = self.precision;

        let mut paths = Vec::new();
        let mut elements = self.elements.clone();
        let mut current = BezierPath::new(precision);
        let mut running = 0.0;
        let mut i = 0;

        loop {
            if i >= elements.len() {
                paths.push(current);
                break;
            }
            let element = elements[i];
            let element_length = if i == 0 { 0.0 } else { element.length };
            let new_length = running + element_length;

            if new_length < start {
                running = new_length;
                i += 1;
                continue;
            }

            if new_length == start {
                current.move_to_start_point(element.vertex);
                running = new_length;
                i += 1;
                continue;
            }

            if running < start && start < new_length && current.is_empty() {
                let previous = elements[i - 1];
                let split = element.split_element_at_position(&previous, start - running, &precision);
                current.move_to_start_point(split.right.0.vertex);
                elements[i] = split.right.1;
                elements[i - 1] = split.right.0;
                running += split.left.1.length;
                continue;
            }

            if start < new_length && new_length < end {
                current.add_element(element);
                running = new_length;
                i += 1;
                continue;
            }

            if new_length == end {
                current.add_element(element);
                running = new_length;
                i += 1;
            }

            if running < end && end < new_length {
                let previous = elements[i - 1];
                let split = element.split_element_at_position(&previous, end - running, &precision);
                match current.elements.len().checked_sub(1) {
                    Some(last) => current.update_vertex(split.left.0.vertex, last, false),
                    None => current.move_to_start_point(split.left.0.vertex),
                }
                current.add_element(split.left.1);
                elements[i] = split.right.1;
                elements[i - 1] = split.right.0;
                running += split.left.1.length;
            }

            paths.push(std::mem::replace(&mut current, BezierPath::new(precision)));
            match remaining.next() {
                Some((s, e)) => {
                    start = s;
                    end = e;
                }
                None => break,
            }
        }

        paths.retain(|p| !p.is_empty());
        paths
    }

    /// Converts to a kurbo path for the renderer.
    pub fn to_kurbo(&self) -> BezPath {
        let mut bez = BezPath::new();
        self.append_to(&mut bez);
        bez
    }

    pub fn append_to(&self, bez: &mut BezPath) {
        let point = |v: Vec2| kurbo::Point::new(v.x as f64, v.y as f64);
        let mut previous: Option<&PathElement> = None;
        for element in &self.elements {
            match previous {
                None => bez.move_to(point(element.vertex.point)),
                Some(prev) => {
                    let straight = prev.vertex.out_tangent_relative() == Vec2::ZERO
                        && element.vertex.in_tangent_relative() == Vec2::ZERO;
                    if straight {
                        bez.line_to(point(element.vertex.point));
                    } else {
                        bez.curve_to(
                            point(prev.vertex.out_tangent),
                            point(element.vertex.in_tangent),
                            point(element.vertex.point),
                        );
                    }
                }
            }
            previous = Some(element);
        }
        if self.closed && !self.elements.is_empty() {
            bez.close_path();
        }
    }
}
