//! Criterion benchmarks for assay-decay.
//!
//! Covers: raw vector decay and cached composition decay.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use assay_core::constants::{AM241, CS137, PU239, PU241, SR90, U235, U238};
use assay_core::traits::DecayCalculator;
use assay_core::{CompMap, Composition};
use assay_decay::DecayEngine;

fn spent_fuel() -> CompMap {
    [
        (U235, 0.8),
        (U238, 93.4),
        (PU239, 1.2),
        (PU241, 0.1),
        (AM241, 0.05),
        (CS137, 0.3),
        (SR90, 0.2),
    ]
    .into_iter()
    .collect()
}

fn bench_vector_decay(c: &mut Criterion) {
    let engine = DecayEngine::new();
    let v = spent_fuel();

    c.bench_function("vector_decay_12_steps", |b| {
        b.iter(|| engine.decay(black_box(&v), black_box(12)))
    });
}

fn bench_cached_composition_decay(c: &mut Criterion) {
    let engine = DecayEngine::new();
    let comp = Composition::from_mass(spent_fuel()).unwrap();
    // Keep the result alive so subsequent calls hit the decay line.
    let _warm = comp.decay(1, &engine).unwrap();

    c.bench_function("composition_decay_cached", |b| {
        b.iter(|| comp.decay(black_box(1), &engine))
    });
}

criterion_group!(benches, bench_vector_decay, bench_cached_composition_decay);
criterion_main!(benches);
