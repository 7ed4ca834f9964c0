use glam::{Vec2, Vec3};
use lottie_core::keyframes::{Keyframe, KeyframeInterpolator, KeyframeTrack};

fn scalar_track(points: &[(f32, f32)]) -> KeyframeTrack<f32> {
    KeyframeTrack::new(points.iter().map(|&(t, v)| Keyframe::new(v, t)).collect())
}

#[test]
fn values_clamp_outside_the_track() {
    let mut interp = KeyframeInterpolator::new(scalar_track(&[(10.0, 1.0), (20.0, 3.0), (30.0, -4.0)]));
    for frame in [-100.0, 0.0, 9.999, 10.0] {
        assert_eq!(interp.value(frame), 1.0, "frame {frame}");
    }
    for frame in [30.0, 30.001, 1e6] {
        assert_eq!(interp.value(frame), -4.0, "frame {frame}");
    }
    // Seeking back in after clamping still interpolates.
    assert_eq!(interp.value(15.0), 2.0);
}

#[test]
fn hold_freezes_until_the_next_keyframe() {
    let track = KeyframeTrack::new(vec![
        Keyframe::new(0.0_f32, 0.0),
        Keyframe::new(100.0, 10.0).hold(),
        Keyframe::new(200.0, 20.0),
    ]);
    let mut interp = KeyframeInterpolator::new(track);

    assert_eq!(interp.value(5.0), 50.0);
    assert_eq!(interp.value(10.0), 100.0);
    for frame in [10.5, 15.0, 19.99] {
        assert!(!interp.has_update(frame), "frame {frame}");
        assert_eq!(interp.value(frame), 100.0);
    }
    assert!(interp.has_update(20.0));
    assert_eq!(interp.value(20.0), 200.0);
}

#[test]
fn sequential_playback_visits_every_span_once() {
    let points: Vec<(f32, f32)> = (0..8).map(|i| (i as f32 * 5.0, i as f32)).collect();
    let mut interp = KeyframeInterpolator::new(scalar_track(&points));

    let mut visited = Vec::new();
    let mut frame = -2.0;
    while frame <= 40.0 {
        assert!(interp.has_update(frame) || frame > 35.0 || frame < 0.0);
        interp.value(frame);
        if visited.last() != Some(&interp.span()) {
            visited.push(interp.span());
        }
        frame += 0.5;
    }

    let mut expected = vec![(None, Some(0))];
    expected.extend((0..7).map(|i| (Some(i), Some(i + 1))));
    expected.push((Some(7), None));
    assert_eq!(visited, expected);
}

#[test]
fn random_seeks_match_fresh_evaluation() {
    let points: Vec<(f32, f32)> = (0..20).map(|i| (i as f32 * 3.0, (i * i) as f32)).collect();
    let mut cursor = KeyframeInterpolator::new(scalar_track(&points));
    for frame in [40.0, 2.0, 57.0, 57.0, 13.5, 0.0, 31.2, -1.0, 60.0, 9.0] {
        let mut fresh = KeyframeInterpolator::new(scalar_track(&points));
        assert_eq!(cursor.value(frame), fresh.value(frame), "frame {frame}");
    }
}

#[test]
fn eased_span_lags_linear_at_start() {
    let track = KeyframeTrack::new(vec![
        Keyframe::new(0.0_f32, 0.0).eased(Vec2::new(0.42, 0.0), Vec2::ONE),
        Keyframe::new(100.0, 10.0),
    ]);
    let mut interp = KeyframeInterpolator::new(track);
    assert!(interp.value(2.0) < 20.0);
    assert_eq!(interp.value(10.0), 100.0);
}

#[test]
fn spatial_tangents_bend_the_motion_path() {
    let track = KeyframeTrack::new(vec![
        Keyframe::new(Vec3::ZERO, 0.0).spatial(Vec3::new(50.0, 0.0, 0.0), Vec3::ZERO),
        Keyframe::new(Vec3::new(100.0, 100.0, 0.0), 10.0).spatial(Vec3::ZERO, Vec3::new(0.0, -50.0, 0.0)),
    ]);
    let mut interp = KeyframeInterpolator::with_spatial_samples(track, 50);
    let start = interp.value(0.0);
    let middle = interp.value(5.0);
    let end = interp.value(10.0);

    assert_eq!(start, Vec3::ZERO);
    assert_eq!(end, Vec3::new(100.0, 100.0, 0.0));
    // The curve bulges below the straight diagonal.
    assert!(middle.x > middle.y, "{middle:?}");
}
