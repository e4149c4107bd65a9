//! Benchmarks for ripple-observables
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ripple_observables::{array, object, observer, property, Observable, Reactive};
use serde_json::json;

// =============================================================================
// OBSERVABLE BENCHMARKS
// =============================================================================

fn bench_observable_create(c: &mut Criterion) {
    c.bench_function("observable_create", |b| {
        b.iter(|| black_box(Observable::<i32>::new()))
    });
}

fn bench_notify_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("notify_fanout");
    for observers in [1usize, 10, 100] {
        let channel: Observable<i32> = Observable::new();
        for _ in 0..observers {
            channel.add_observer(observer(|n: &i32| {
                black_box(*n);
            }));
        }
        group.bench_with_input(
            BenchmarkId::from_parameter(observers),
            &channel,
            |b, channel| b.iter(|| channel.notify(black_box(&42))),
        );
    }
    group.finish();
}

fn bench_filter_chain(c: &mut Criterion) {
    let channel: Observable<i32> = Observable::new();
    channel
        .filter(|n| *n > 0)
        .filter(|n| n % 2 == 0)
        .filter(|n| *n < 1_000)
        .add_observer(observer(|n: &i32| {
            black_box(*n);
        }));
    c.bench_function("filter_chain_notify", |b| {
        b.iter(|| channel.notify(black_box(&42)))
    });
}

// =============================================================================
// REACTIVE WRAPPER BENCHMARKS
// =============================================================================

fn bench_property_set(c: &mut Criterion) {
    let value = property(0i32);
    value.add_observer(observer(|n: &i32| {
        black_box(*n);
    }));
    c.bench_function("property_set", |b| b.iter(|| value.set(black_box(42))));
}

fn bench_array_push(c: &mut Criterion) {
    c.bench_function("array_push", |b| {
        let samples = array(Vec::<i32>::new());
        samples.add_observer(observer(|sequence: &Vec<i32>| {
            black_box(sequence.len());
        }));
        b.iter(|| samples.push(vec![black_box(1)]))
    });
}

fn bench_object_set_value_of(c: &mut Criterion) {
    let state = object(json!({ "x": 0, "y": 0, "z": 0 }));
    state.add_observer(observer(|fields: &_| {
        black_box(fields);
    }));
    c.bench_function("object_set_value_of", |b| {
        b.iter(|| state.set_value_of("x", json!(black_box(42))))
    });
}

fn bench_nested_bubble(c: &mut Criterion) {
    let state = object(json!({
        "a": { "b": { "c": { "value": 0 } } }
    }));
    state.add_observer(observer(|fields: &_| {
        black_box(fields);
    }));
    let leaf = state
        .get("a")
        .and_then(|a| a.as_object().cloned())
        .and_then(|a| a.get("b"))
        .and_then(|b| b.as_object().cloned())
        .and_then(|b| b.get("c"))
        .and_then(|c| c.as_object().cloned())
        .and_then(|c| c.get("value"))
        .expect("seeded leaf");
    c.bench_function("nested_bubble_depth_3", |b| {
        b.iter(|| leaf.set(json!(black_box(42))))
    });
}

criterion_group!(
    benches,
    bench_observable_create,
    bench_notify_fanout,
    bench_filter_chain,
    bench_property_set,
    bench_array_push,
    bench_object_set_value_of,
    bench_nested_bubble
);
criterion_main!(benches);
