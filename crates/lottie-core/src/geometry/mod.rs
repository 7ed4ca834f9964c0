//! Curve geometry: vertices, measured contours and trimming.

pub mod bounds;
pub mod compound;
pub mod element;
pub mod path;
pub mod shapes;
pub mod vertex;

pub use bounds::BoundingBoxScratch;
pub use compound::{trim_compound, trim_compound_tagged, CompoundPath, TrimMode};
pub use element::PathElement;
pub use path::{normalize_trim, BezierPath};
pub use shapes::{ellipse_path, polystar_path, rectangle_path, PathDirection, Polystar, PolystarKind};
pub use vertex::CurveVertex;
