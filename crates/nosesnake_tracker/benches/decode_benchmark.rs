//! # Frame Decode Benchmark
//!
//! One tracker frame must fit comfortably inside 33 ms (30 fps).
//!
//! Run with: `cargo bench --package nosesnake_tracker`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use crossbeam_channel::unbounded;
use nosesnake_shared::QuitSignal;
use nosesnake_tracker::sim::{SimulatedCamera, TemplateFaceModel, SIM_FRAME_HEIGHT, SIM_FRAME_WIDTH};
use nosesnake_tracker::{locate_nose, Camera, Centroid, GestureDecoder, HullMoments};

fn bench_locate_nose(c: &mut Criterion) {
    let (_tx, rx) = unbounded();
    let mut camera = SimulatedCamera::new(SIM_FRAME_WIDTH, SIM_FRAME_HEIGHT, rx, QuitSignal::new());
    let Ok(frame) = camera.read_frame() else {
        return;
    };

    let mut model = TemplateFaceModel::default();
    c.bench_function("locate_nose_640x480", |b| {
        b.iter(|| locate_nose(black_box(&frame), &mut model, &mut HullMoments, 0));
    });
}

fn bench_decoder_step(c: &mut Criterion) {
    let path: Vec<Option<Centroid>> = (0..64)
        .map(|i| (i % 7 != 0).then(|| Centroid::new(i * 13 % 200, i * 7 % 150)))
        .collect();

    c.bench_function("decoder_step_64_frames", |b| {
        b.iter(|| {
            let mut decoder = GestureDecoder::new(20);
            decoder.arm();
            for centroid in &path {
                black_box(decoder.step(*centroid));
            }
        });
    });
}

criterion_group!(benches, bench_locate_nose, bench_decoder_step);
criterion_main!(benches);
