use crate::keyframes::{Interpolatable, KeyframeInterpolator};

/// Source of a property's value over time.
pub trait ValueProvider<T>: Send {
    /// Whether `value(frame)` may differ from the last returned value.
    fn has_update(&self, frame: f32) -> bool;
    fn value(&mut self, frame: f32) -> T;
}

impl<T: Interpolatable + Send + Sync> ValueProvider<T> for KeyframeInterpolator<T> {
    fn has_update(&self, frame: f32) -> bool {
        KeyframeInterpolator::has_update(self, frame)
    }

    fn value(&mut self, frame: f32) -> T {
        KeyframeInterpolator::value(self, frame)
    }
}

/// A constant installed from outside, reported as updated until read once.
#[derive(Debug, Clone)]
pub struct SingleValueProvider<T> {
    value: T,
    pending: bool,
}

impl<T> SingleValueProvider<T> {
    pub fn new(value: T) -> Self {
        Self { value, pending: true }
    }
}

impl<T: Clone + Send> ValueProvider<T> for SingleValueProvider<T> {
    fn has_update(&self, _frame: f32) -> bool {
        self.pending
    }

    fn value(&mut self, _frame: f32) -> T {
        self.pending = false;
        self.value.clone()
    }
}

/// Several scalar interpolators folded into one value, e.g. the separate
/// x/y/z tracks of a split position or the entries of a dash pattern.
pub struct CombinedInterpolator<T> {
    parts: Vec<KeyframeInterpolator<f32>>,
    combine: fn(&[f32]) -> T,
    scratch: Vec<f32>,
}

impl<T> CombinedInterpolator<T> {
    pub fn new(parts: Vec<KeyframeInterpolator<f32>>, combine: fn(&[f32]) -> T) -> Self {
        let scratch = Vec::with_capacity(parts.len());
        Self { parts, combine, scratch }
    }
}

impl<T> ValueProvider<T> for CombinedInterpolator<T> {
    fn has_update(&self, frame: f32) -> bool {
        self.parts.iter().any(|p| p.has_update(frame))
    }

    fn value(&mut self, frame: f32) -> T {
        self.scratch.clear();
        for part in &mut self.parts {
            self.scratch.push(part.value(frame));
        }
        (self.combine)(&self.scratch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframes::{Keyframe, KeyframeTrack};
    use glam::Vec3;

    #[test]
    fn single_value_reports_once() {
        let mut provider = SingleValueProvider::new(3.0_f32);
        assert!(provider.has_update(0.0));
        assert_eq!(provider.value(0.0), 3.0);
        assert!(!provider.has_update(1.0));
    }

    #[test]
    fn combined_split_position() {
        let x = KeyframeTrack::new(vec![Keyframe::new(0.0_f32, 0.0), Keyframe::new(10.0, 10.0)]);
        let y = KeyframeTrack::constant(5.0_f32);
        let mut provider = CombinedInterpolator::new(
            vec![KeyframeInterpolator::new(x), KeyframeInterpolator::new(y)],
            |v: &[f32]| Vec3::new(v[0], v[1], 0.0),
        );
        assert!(provider.has_update(0.0));
        assert_eq!(provider.value(5.0), Vec3::new(5.0, 5.0, 0.0));
    }
}
