use std::ops::Index;
use std::sync::Arc;

use glam::{Vec2, Vec3};

/// One timed value of an animated property.
///
/// `out_tangent` eases the span that starts here and `in_tangent` the span
/// that ends here; the spatial tangents bend the motion path of
/// position-like values.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe<T> {
    pub value: T,
    pub time: f32,
    pub is_hold: bool,
    pub in_tangent: Option<Vec2>,
    pub out_tangent: Option<Vec2>,
    pub spatial_in_tangent: Option<Vec3>,
    pub spatial_out_tangent: Option<Vec3>,
}

impl<T> Keyframe<T> {
    pub fn new(value: T, time: f32) -> Self {
        Self {
            value,
            time,
            is_hold: false,
            in_tangent: None,
            out_tangent: None,
            spatial_in_tangent: None,
            spatial_out_tangent: None,
        }
    }

    /// Keyframe of a property that is never animated.
    pub fn value_only(value: T) -> Self {
        Self::new(value, 0.0)
    }

    pub fn hold(mut self) -> Self {
        self.is_hold = true;
        self
    }

    pub fn eased(mut self, out_tangent: Vec2, in_tangent: Vec2) -> Self {
        self.out_tangent = Some(out_tangent);
        self.in_tangent = Some(in_tangent);
        self
    }

    pub fn spatial(mut self, out_tangent: Vec3, in_tangent: Vec3) -> Self {
        self.spatial_out_tangent = Some(out_tangent);
        self.spatial_in_tangent = Some(in_tangent);
        self
    }
}

/// Immutable, time-ordered keyframes shared by every property instance that
/// animates the same document property.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T> {
    keyframes: Arc<[Keyframe<T>]>,
}

impl<T> KeyframeTrack<T> {
    /// # Panics
    ///
    /// Panics if `keyframes` is empty.
    pub fn new(keyframes: Vec<Keyframe<T>>) -> Self {
        assert!(!keyframes.is_empty(), "keyframe track must not be empty");
        debug_assert!(
            keyframes.windows(2).all(|w| w[0].time <= w[1].time),
            "keyframes must be time-ordered"
        );
        Self {
            keyframes: keyframes.into(),
        }
    }

    pub fn constant(value: T) -> Self {
        Self::new(vec![Keyframe::value_only(value)])
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_animated(&self) -> bool {
        self.keyframes.len() > 1
    }

    pub fn first(&self) -> &Keyframe<T> {
        &self.keyframes[0]
    }

    pub fn last(&self) -> &Keyframe<T> {
        &self.keyframes[self.keyframes.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<&Keyframe<T>> {
        self.keyframes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyframe<T>> {
        self.keyframes.iter()
    }

    /// True when both tracks point at the same keyframe storage.
    pub fn shares_storage(&self, other: &KeyframeTrack<T>) -> bool {
        Arc::ptr_eq(&self.keyframes, &other.keyframes)
    }
}

impl<T> Index<usize> for KeyframeTrack<T> {
    type Output = Keyframe<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.keyframes[index]
    }
}
