//! Poller Benchmarks
//!
//! Overhead of the helpers when the condition already holds, which is the
//! common case in a passing test.
//!
//! Run with: `cargo bench --bench poll_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use apptest::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_poll_until(c: &mut Criterion) {
    let mut group = c.benchmark_group("poll_until");

    let element = MockElement::new("Button").with_label("OK");
    let options = WaitOptions::new();

    group.bench_function("satisfied_immediately", |bench| {
        bench.iter(|| {
            let report = poll_until(black_box(&element), |e: &MockElement| e.exists(), &options);
            black_box(report);
        });
    });

    let immediate = WaitOptions::immediate();
    group.bench_function("zero_timeout_false", |bench| {
        bench.iter(|| {
            let report = poll_until(black_box(&element), |e: &MockElement| !e.exists(), &immediate);
            black_box(report);
        });
    });

    group.finish();
}

fn bench_element_assertions(c: &mut Criterion) {
    let mut group = c.benchmark_group("element_assertions");

    let element = MockElement::new("Button 'Log in'")
        .with_label("Log in")
        .with_value("1");

    let cases = vec!["exists", "has_label", "is_interactive", "is_on"];
    for name in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &name, |bench, case| {
            let ctx = TestContext::new();
            bench.iter(|| {
                let handle = ctx.element(black_box(&element));
                match *case {
                    "exists" => handle.assert_exists(),
                    "has_label" => handle.assert_has_label("Log in"),
                    "is_interactive" => handle.assert_is_interactive(),
                    _ => handle.assert_is_on(),
                };
                ctx.reporter().clear();
            });
        });
    }

    group.finish();
}

fn bench_query_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_count");

    for size in [1usize, 10, 100] {
        let query = MockQuery::new(
            "Cells query",
            (0..size).map(|i| MockElement::new(format!("Cell {i}"))).collect(),
        );
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bench, &n| {
            let ctx = TestContext::new();
            bench.iter(|| {
                ctx.query(black_box(&query)).assert_has_count(n);
                ctx.reporter().clear();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_poll_until,
    bench_element_assertions,
    bench_query_count
);
criterion_main!(benches);
