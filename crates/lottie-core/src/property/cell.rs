use super::provider::{SingleValueProvider, ValueProvider};
use super::{AnyValue, CellValue, ValueKind};
use crate::keyframes::{Interpolatable, KeyframeInterpolator, KeyframeTrack};

/// Cached value of one property for the last evaluated frame.
pub struct PropertyCell<T> {
    provider: Box<dyn ValueProvider<T>>,
    value: T,
    is_stale: bool,
    last_update_time: Option<f32>,
}

impl<T: CellValue> PropertyCell<T> {
    pub fn new(provider: Box<dyn ValueProvider<T>>) -> Self {
        Self {
            provider,
            value: T::default(),
            is_stale: true,
            last_update_time: None,
        }
    }

    pub fn constant(value: T) -> Self {
        Self::new(Box::new(SingleValueProvider::new(value)))
    }

    pub fn needs_update(&self, frame: f32) -> bool {
        self.is_stale || self.provider.has_update(frame)
    }

    pub fn update(&mut self, frame: f32) {
        self.value = self.provider.value(frame);
        self.is_stale = false;
        self.last_update_time = Some(frame);
    }

    /// The value cached by the last `update`; `T::default()` before that.
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn last_update_time(&self) -> Option<f32> {
        self.last_update_time
    }

    pub fn set_provider(&mut self, provider: Box<dyn ValueProvider<T>>) {
        self.provider = provider;
        self.is_stale = true;
    }

    pub fn set_value(&mut self, value: T) {
        self.set_provider(Box::new(SingleValueProvider::new(value)));
    }
}

impl<T: CellValue + Interpolatable + Sync> PropertyCell<T> {
    pub fn animated(track: KeyframeTrack<T>, spatial_samples: u32) -> Self {
        Self::new(Box::new(KeyframeInterpolator::with_spatial_samples(track, spatial_samples)))
    }
}

impl<T> std::fmt::Debug for PropertyCell<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyCell")
            .field("value", &self.value)
            .field("is_stale", &self.is_stale)
            .field("last_update_time", &self.last_update_time)
            .finish()
    }
}

/// Type-erased view of a [`PropertyCell`], used by the node graph to poll
/// cells uniformly and by keypath queries.
pub trait AnyCell {
    fn kind(&self) -> ValueKind;
    fn needs_update(&self, frame: f32) -> bool;
    fn update(&mut self, frame: f32);
    fn current(&self) -> AnyValue;
    /// Installs a constant. On a kind mismatch the value is handed back.
    fn override_value(&mut self, value: AnyValue) -> Result<(), AnyValue>;
}

impl<T: CellValue> AnyCell for PropertyCell<T> {
    fn kind(&self) -> ValueKind {
        T::KIND
    }

    fn needs_update(&self, frame: f32) -> bool {
        PropertyCell::needs_update(self, frame)
    }

    fn update(&mut self, frame: f32) {
        PropertyCell::update(self, frame)
    }

    fn current(&self) -> AnyValue {
        self.value.clone().into_any()
    }

    fn override_value(&mut self, value: AnyValue) -> Result<(), AnyValue> {
        if value.kind() != T::KIND {
            return Err(value);
        }
        if let Some(v) = T::from_any(value) {
            self.set_value(v);
        }
        Ok(())
    }
}

/// A set of named property cells owned by one node.
pub trait PropertyMap {
    fn visit_cells(&mut self, f: &mut dyn FnMut(&'static str, &mut dyn AnyCell));

    fn any_needs_update(&mut self, frame: f32) -> bool {
        let mut needed = false;
        self.visit_cells(&mut |_, cell| needed |= cell.needs_update(frame));
        needed
    }

    fn update_all(&mut self, frame: f32) {
        self.visit_cells(&mut |_, cell| cell.update(frame));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframes::Keyframe;

    #[test]
    fn cell_tracks_staleness() {
        let track = KeyframeTrack::new(vec![Keyframe::new(0.0_f32, 0.0), Keyframe::new(100.0, 10.0)]);
        let mut cell = PropertyCell::animated(track, 20);
        assert_eq!(*cell.value(), 0.0);
        assert!(cell.needs_update(5.0));
        cell.update(5.0);
        assert_eq!(*cell.value(), 50.0);
        assert_eq!(cell.last_update_time(), Some(5.0));

        cell.set_value(7.0);
        assert!(cell.needs_update(5.0));
        cell.update(5.0);
        assert_eq!(*cell.value(), 7.0);
        assert!(!cell.needs_update(6.0));
    }

    #[test]
    fn override_rejects_wrong_kind() {
        let mut cell = PropertyCell::constant(1.0_f32);
        let err = AnyCell::override_value(&mut cell, AnyValue::Vector2(glam::Vec2::ONE)).unwrap_err();
        assert_eq!(err.kind(), ValueKind::Vector2);
        assert!(AnyCell::override_value(&mut cell, AnyValue::Scalar(3.0)).is_ok());
        AnyCell::update(&mut cell, 0.0);
        assert_eq!(cell.current(), AnyValue::Scalar(3.0));
    }
}
