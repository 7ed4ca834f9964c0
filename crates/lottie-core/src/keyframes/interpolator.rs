use glam::Vec2;

use super::easing::cubic_ease;
use super::interpolate::Interpolatable;
use super::keyframe::{Keyframe, KeyframeTrack};

/// Stateful reader over a [`KeyframeTrack`].
///
/// The cursor remembers the span of the previous query so sequential
/// playback locates the active span in amortized constant time. Every
/// property instance owns its own interpolator; the track is shared.
#[derive(Debug, Clone)]
pub struct KeyframeInterpolator<T> {
    track: KeyframeTrack<T>,
    leading: Option<usize>,
    trailing: Option<usize>,
    last_updated_frame: Option<f32>,
    spatial_samples: u32,
}

impl<T: Interpolatable> KeyframeInterpolator<T> {
    pub fn new(track: KeyframeTrack<T>) -> Self {
        Self::with_spatial_samples(track, 20)
    }

    pub fn with_spatial_samples(track: KeyframeTrack<T>, spatial_samples: u32) -> Self {
        Self {
            track,
            leading: None,
            trailing: None,
            last_updated_frame: None,
            spatial_samples,
        }
    }

    pub fn track(&self) -> &KeyframeTrack<T> {
        &self.track
    }

    /// Indices of the span found by the last query.
    pub fn span(&self) -> (Option<usize>, Option<usize>) {
        (self.leading, self.trailing)
    }

    /// Whether `value(frame)` could differ from the previous result.
    pub fn has_update(&self, frame: f32) -> bool {
        if self.last_updated_frame.is_none() {
            return true;
        }
        match (self.leading, self.trailing) {
            // Past the last keyframe, and still past it.
            (Some(leading), None) => !(self.track[leading].time < frame),
            // Before the first keyframe, and still before it.
            (None, Some(trailing)) => !(frame < self.track[trailing].time),
            (Some(leading), Some(trailing)) => {
                let leading = &self.track[leading];
                let inside_hold =
                    leading.is_hold && leading.time < frame && frame < self.track[trailing].time;
                !inside_hold
            }
            (None, None) => true,
        }
    }

    pub fn value(&mut self, frame: f32) -> T {
        self.update_span(frame);
        self.last_updated_frame = Some(frame);

        match (self.leading, self.trailing) {
            (Some(leading), Some(trailing)) => {
                let from = &self.track[leading];
                let to = &self.track[trailing];
                let progress = interpolated_progress(from, to, frame);
                // The motion path bends only when both ends of the span carry a tangent.
                match (from.spatial_out_tangent, to.spatial_in_tangent) {
                    (Some(out_tangent), Some(in_tangent)) => from.value.interpolate_spatial(
                        &to.value,
                        progress,
                        Some(out_tangent),
                        Some(in_tangent),
                        self.spatial_samples,
                    ),
                    _ => from.value.interpolate(&to.value, progress),
                }
            }
            (Some(leading), None) => self.track[leading].value.clone(),
            (None, Some(trailing)) => self.track[trailing].value.clone(),
            (None, None) => self.track.first().value.clone(),
        }
    }

    fn update_span(&mut self, frame: f32) {
        let len = self.track.len();
        if len == 1 {
            self.leading = Some(0);
            self.trailing = None;
            return;
        }

        if self.leading.is_none() && self.trailing.is_none() {
            if frame < self.track[0].time {
                self.trailing = Some(0);
            } else {
                self.leading = Some(0);
                self.trailing = Some(1);
            }
        }

        // Forward while the span ends at or before the frame.
        if let Some(trailing) = self.trailing {
            if self.track[trailing].time <= frame {
                let mut new_leading = trailing;
                loop {
                    self.leading = Some(new_leading);
                    self.trailing = (new_leading + 1 < len).then_some(new_leading + 1);
                    match self.trailing {
                        Some(next) if self.track[next].time <= frame => new_leading += 1,
                        _ => break,
                    }
                }
                return;
            }
        }

        // Backward while the span starts after the frame.
        if let Some(leading) = self.leading {
            if frame < self.track[leading].time {
                let mut new_trailing = leading;
                loop {
                    self.leading = new_trailing.checked_sub(1);
                    self.trailing = Some(new_trailing);
                    match self.leading {
                        Some(previous) if frame < self.track[previous].time => new_trailing -= 1,
                        _ => break,
                    }
                }
            }
        }
    }
}

/// Eased progress through the span `from -> to` at `frame`.
pub fn interpolated_progress<T>(from: &Keyframe<T>, to: &Keyframe<T>, frame: f32) -> f32 {
    if frame <= from.time {
        return 0.0;
    }
    if to.time <= frame {
        return 1.0;
    }
    if from.is_hold {
        return 0.0;
    }

    let out_tangent = from.out_tangent.unwrap_or(Vec2::ZERO);
    let in_tangent = to.in_tangent.unwrap_or(Vec2::ONE);
    let progress = (frame - from.time) / (to.time - from.time);
    if out_tangent != Vec2::ZERO || in_tangent != Vec2::ONE {
        cubic_ease(out_tangent, in_tangent, progress)
    } else {
        progress
    }
}
