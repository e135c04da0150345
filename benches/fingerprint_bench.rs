//! Performance benchmarks for fingerprinting and matching

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use constellate::{EngineConfig, Fingerprinter, FingerprintIndex, TrackMetadata};

/// Synthetic tone sequence so the benches exercise realistic peak densities
fn synthetic_track(seed: u64, seconds: f32, sample_rate: u32) -> Vec<f32> {
    let mut state = seed;
    let total = (seconds * sample_rate as f32) as usize;
    let tone_len = sample_rate as usize / 8;
    let mut samples = Vec::with_capacity(total);

    while samples.len() < total {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let freq = 400.0 + (state % 2800) as f32;
        for i in 0..tone_len.min(total - samples.len()) {
            let t = i as f32 / sample_rate as f32;
            samples.push(0.7 * (-t * 30.0).exp() * (2.0 * std::f32::consts::PI * freq * t).sin());
        }
    }
    samples
}

fn bench_fingerprint(c: &mut Criterion) {
    let samples = synthetic_track(1, 30.0, 44100);
    let engine = Fingerprinter::new(EngineConfig::default()).unwrap();

    c.bench_function("fingerprint_30s", |b| {
        b.iter(|| {
            let _ = engine.fingerprint(black_box(&samples), black_box(44100));
        });
    });
}

fn bench_identify(c: &mut Criterion) {
    let engine = Fingerprinter::new(EngineConfig::default()).unwrap();
    let mut index = FingerprintIndex::new();
    for seed in 0..10 {
        let track = synthetic_track(seed, 30.0, 44100);
        engine
            .index_track(
                &mut index,
                &track,
                44100,
                TrackMetadata::with_title(format!("track {}", seed)),
            )
            .unwrap();
    }

    let query_track = synthetic_track(3, 30.0, 44100);
    let clip = &query_track[44100 * 10..44100 * 15];

    c.bench_function("identify_5s_clip_10_tracks", |b| {
        b.iter(|| {
            let _ = engine.identify(black_box(&index), black_box(clip), black_box(44100));
        });
    });
}

criterion_group!(benches, bench_fingerprint, bench_identify);
criterion_main!(benches);
