use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lottie_core::keyframes::{Keyframe, KeyframeInterpolator, KeyframeTrack};
use lottie_core::{Animation, EngineConfig, Providers};
use serde_json::json;

fn long_track(count: usize) -> KeyframeTrack<f32> {
    KeyframeTrack::new((0..count).map(|i| Keyframe::new(i as f32, i as f32)).collect())
}

fn bench_interpolator(c: &mut Criterion) {
    let mut group = c.benchmark_group("KeyframeInterpolator");
    let track = long_track(10_000);

    // Playback advances the cursor one span at a time.
    group.bench_function("sequential_playback", |b| {
        b.iter(|| {
            let mut interp = KeyframeInterpolator::new(track.clone());
            let mut frame = 0.0;
            while frame < 10_000.0 {
                black_box(interp.value(frame));
                frame += 0.5;
            }
        })
    });

    // A seek pays for the distance between the old and new span.
    for &distance in &[10.0_f32, 1_000.0, 9_000.0] {
        group.bench_with_input(BenchmarkId::new("seek", distance), &distance, |b, &d| {
            let mut interp = KeyframeInterpolator::new(track.clone());
            b.iter(|| {
                black_box(interp.value(500.0));
                black_box(interp.value(500.0 + d));
            })
        });
    }

    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let shapes: Vec<_> = (0..50)
        .map(|i| {
            json!({
                "ty": "gr",
                "it": [
                    { "ty": "el", "s": { "a": 0, "k": [20, 20] }, "p": { "a": 1, "k": [ { "t": 0, "s": [0, 0] }, { "t": 60, "s": [i, 100] } ] } },
                    { "ty": "tm", "s": { "a": 0, "k": 0 }, "e": { "a": 1, "k": [ { "t": 0, "s": [0] }, { "t": 60, "s": [100] } ] } },
                    { "ty": "st", "c": { "a": 0, "k": [0, 0, 0] }, "w": { "a": 0, "k": 2 } },
                    { "ty": "tr" }
                ]
            })
        })
        .collect();
    let doc = json!({
        "v": "5.7.0", "ip": 0, "op": 60, "fr": 60, "w": 512, "h": 512,
        "layers": [{ "ty": 4, "nm": "Shapes", "ip": 0, "op": 60, "ks": {}, "shapes": shapes }]
    });
    let document = serde_json::from_value(doc).expect("bench document parses");
    let mut animation =
        Animation::new(&document, EngineConfig::default(), Providers::default()).expect("bench document builds");

    c.bench_function("Animation::render/50_trimmed_groups", |b| {
        let mut frame = 0.0;
        b.iter(|| {
            frame = (frame + 1.0) % 60.0;
            black_box(animation.render(frame));
        })
    });
}

criterion_group!(benches, bench_interpolator, bench_frame);
criterion_main!(benches);
