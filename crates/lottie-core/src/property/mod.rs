//! Property cells: per-instance caches of animated values.

mod cell;
mod provider;

pub use cell::{AnyCell, PropertyCell, PropertyMap};
pub use provider::{CombinedInterpolator, SingleValueProvider, ValueProvider};

use glam::{Vec2, Vec3, Vec4};
use lottie_data::model::TextDocument;

use crate::geometry::BezierPath;
use crate::render::DashPattern;

/// The closed set of value kinds a property can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Scalar,
    Vector2,
    Vector3,
    Color,
    Path,
    Text,
    Gradient,
    Dash,
}

/// A property value of any supported kind.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyValue {
    Scalar(f32),
    Vector2(Vec2),
    Vector3(Vec3),
    Color(Vec4),
    Path(BezierPath),
    Text(TextDocument),
    Gradient(Vec<f32>),
    Dash(DashPattern),
}

impl AnyValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            AnyValue::Scalar(_) => ValueKind::Scalar,
            AnyValue::Vector2(_) => ValueKind::Vector2,
            AnyValue::Vector3(_) => ValueKind::Vector3,
            AnyValue::Color(_) => ValueKind::Color,
            AnyValue::Path(_) => ValueKind::Path,
            AnyValue::Text(_) => ValueKind::Text,
            AnyValue::Gradient(_) => ValueKind::Gradient,
            AnyValue::Dash(_) => ValueKind::Dash,
        }
    }
}

/// Types that can live in a [`PropertyCell`] and cross the keypath boundary.
pub trait CellValue: Clone + Default + Send + 'static {
    const KIND: ValueKind;

    fn into_any(self) -> AnyValue;
    fn from_any(value: AnyValue) -> Option<Self>;
}

macro_rules! cell_value {
    ($ty:ty, $variant:ident) => {
        impl CellValue for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn into_any(self) -> AnyValue {
                AnyValue::$variant(self)
            }

            fn from_any(value: AnyValue) -> Option<Self> {
                match value {
                    AnyValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

cell_value!(f32, Scalar);
cell_value!(Vec2, Vector2);
cell_value!(Vec3, Vector3);
cell_value!(Vec4, Color);
cell_value!(BezierPath, Path);
cell_value!(TextDocument, Text);
cell_value!(Vec<f32>, Gradient);
cell_value!(DashPattern, Dash);
