//! Keyframe tracks and the interpolators that read them.

pub mod convert;
pub mod easing;
pub mod interpolate;
pub mod interpolator;
pub mod keyframe;

pub use easing::{cubic_ease, CubicEasing};
pub use interpolate::Interpolatable;
pub use interpolator::{interpolated_progress, KeyframeInterpolator};
pub use keyframe::{Keyframe, KeyframeTrack};
