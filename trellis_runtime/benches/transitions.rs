//! Transition Table Benchmarks
//!
//! Measures the hot paths of the transition table:
//!
//! 1. **Cached transitions**: following existing edges from the empty shape
//! 2. **Fan-out**: lookup cost as one shape gains many outgoing edges
//! 3. **Insertion**: building tables from scratch, through promotion and growth
//! 4. **Collection**: compaction of tables full of cleared edges

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use trellis_core::intern::{InternedString, intern};
use trellis_runtime::{ShapeHandle, ShapeRegistry, SpecialTransition, TransitionKey};

// =============================================================================
// Benchmark Helpers
// =============================================================================

/// Pre-intern property names for consistent benchmarking
fn intern_property_names(prefix: &str, count: usize) -> Vec<InternedString> {
    (0..count).map(|i| intern(&format!("{prefix}{i}"))).collect()
}

/// Build a chain adding every name in order; returns the final shape.
fn build_chain(registry: &mut ShapeRegistry, names: &[InternedString]) -> ShapeHandle {
    names.iter().fold(registry.empty_shape(), |shape, name| {
        registry.transition_default(shape, name.clone()).unwrap()
    })
}

/// Give the empty shape one edge per name.
fn build_fan_out(registry: &mut ShapeRegistry, names: &[InternedString]) -> Vec<ShapeHandle> {
    let empty = registry.empty_shape();
    names
        .iter()
        .map(|name| registry.transition_default(empty, name.clone()).unwrap())
        .collect()
}

// =============================================================================
// Cached Transition Benchmarks
// =============================================================================

fn bench_cached_transitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_transitions");

    for count in [1, 4, 8, 16].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("chain_length", count), count, |b, &count| {
            let mut registry = ShapeRegistry::new();
            let names = intern_property_names("prop", count);

            // Prime transition tables
            build_chain(&mut registry, &names);

            b.iter(|| black_box(build_chain(&mut registry, &names)))
        });
    }

    group.bench_function("special_cached", |b| {
        let mut registry = ShapeRegistry::new();
        let empty = registry.empty_shape();
        registry
            .transition_special(empty, SpecialTransition::Frozen)
            .unwrap();

        b.iter(|| black_box(registry.transition_special(empty, SpecialTransition::Frozen)))
    });

    group.finish();
}

// =============================================================================
// Fan-out Lookup Benchmarks
// =============================================================================

fn bench_fan_out_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out_lookup");

    // Covers the single-edge encoding and arrays of increasing size
    for count in [1, 2, 16, 128, 1024].iter() {
        group.bench_with_input(BenchmarkId::new("hit", count), count, |b, &count| {
            let mut registry = ShapeRegistry::new();
            let names = intern_property_names("fan", count);
            build_fan_out(&mut registry, &names);
            let empty = registry.empty_shape();
            let key = TransitionKey::field(names[count / 2].clone());

            b.iter(|| black_box(registry.accessor(empty).find(&key)))
        });

        group.bench_with_input(BenchmarkId::new("miss", count), count, |b, &count| {
            let mut registry = ShapeRegistry::new();
            let names = intern_property_names("fan", count);
            build_fan_out(&mut registry, &names);
            let empty = registry.empty_shape();
            let key = TransitionKey::field(intern("absent"));

            b.iter(|| black_box(registry.accessor(empty).find(&key)))
        });
    }

    group.finish();
}

// =============================================================================
// Insertion Benchmarks
// =============================================================================

fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion");
    group.sample_size(50); // Each iteration builds a fresh registry

    for count in [2, 16, 256].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("fan_out", count), count, |b, &count| {
            let names = intern_property_names("ins", count);

            b.iter(|| {
                let mut registry = ShapeRegistry::new();
                black_box(build_fan_out(&mut registry, &names))
            })
        });
    }

    group.finish();
}

// =============================================================================
// Collection Benchmarks
// =============================================================================

fn bench_collection(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection");
    group.sample_size(50);

    group.bench_function("sweep_half_cleared", |b| {
        let names = intern_property_names("gc", 256);

        b.iter(|| {
            let mut registry = ShapeRegistry::new();
            let targets = build_fan_out(&mut registry, &names);
            registry.collect_garbage(targets.iter().step_by(2).copied());
            black_box(registry.sweep_transitions())
        })
    });

    group.finish();
}

// =============================================================================
// Criterion Groups
// =============================================================================

criterion_group!(
    transition_benches,
    bench_cached_transitions,
    bench_fan_out_lookup,
    bench_insertion,
    bench_collection,
);

criterion_main!(transition_benches);
