//! Criterion benchmarks for crossfeed-core
//!
//! Run with: cargo bench -p crossfeed-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use crossfeed_core::{
    AudioProcessor, CrossfeedEngine, FirstOrderFilter, LookupTable, MultiChannelDelay,
    ProcessSpec, db_to_linear, lowpass_coefficients, lowpass_pole, transcode_block,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize, freq: f32) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * freq * t).sin() * 0.5
        })
        .collect()
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("CrossfeedEngine");

    for &block_size in BLOCK_SIZES {
        let input_l = generate_test_signal(block_size, 440.0);
        let input_r = generate_test_signal(block_size, 660.0);

        group.bench_with_input(
            BenchmarkId::new("process_block", block_size),
            &block_size,
            |b, &size| {
                let mut engine = CrossfeedEngine::default();
                engine
                    .prepare(ProcessSpec::stereo(SAMPLE_RATE, size))
                    .unwrap();
                let mut left = input_l.clone();
                let mut right = input_r.clone();
                b.iter(|| {
                    left.copy_from_slice(&input_l);
                    right.copy_from_slice(&input_r);
                    engine.process_block(black_box(&mut left), black_box(&mut right));
                });
            },
        );
    }

    group.bench_function("prepare", |b| {
        let mut engine = CrossfeedEngine::default();
        b.iter(|| {
            engine
                .prepare(black_box(ProcessSpec::stereo(SAMPLE_RATE, 512)))
                .unwrap();
        });
    });

    group.finish();
}

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("Primitives");
    let block_size = 512;
    let input = generate_test_signal(block_size, 440.0);

    group.bench_function("first_order_lowpass", |b| {
        let mut filter =
            FirstOrderFilter::with_coefficients(lowpass_coefficients(lowpass_pole(700.0, SAMPLE_RATE)));
        let mut buffer = input.clone();
        b.iter(|| {
            buffer.copy_from_slice(&input);
            filter.process_block_inplace(black_box(&mut buffer));
        });
    });

    group.bench_function("multichannel_delay", |b| {
        let mut delay = MultiChannelDelay::new();
        delay
            .prepare(&ProcessSpec::stereo(SAMPLE_RATE, block_size))
            .unwrap();
        delay.set_max_delay_samples(22).unwrap();
        delay.set_delay_samples(15);
        let mut left = input.clone();
        let mut right = input.clone();
        b.iter(|| {
            delay.process(&mut [&mut left[..], &mut right[..]]);
            black_box(left[0]);
        });
    });

    group.bench_function("mid_side_transcode", |b| {
        let mut left = input.clone();
        let mut right = input.clone();
        b.iter(|| {
            transcode_block(black_box(&mut left), black_box(&mut right));
        });
    });

    let table = LookupTable::new(db_to_linear, -15.0, 15.0, 10_000);
    group.bench_function("db_lookup", |b| {
        b.iter(|| black_box(table.eval(black_box(-4.5))));
    });
    group.bench_function("db_exact", |b| {
        b.iter(|| black_box(db_to_linear(black_box(-4.5))));
    });

    group.finish();
}

criterion_group!(benches, bench_engine, bench_primitives);
criterion_main!(benches);
