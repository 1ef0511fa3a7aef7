//! Benchmarks for width allocation.
//!
//! Run with: cargo bench -p pickgrid-layout

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pickgrid_core::{Field, Record, RecordRef};
use pickgrid_layout::{Container, LayoutConfig, LayoutEngine};
use pickgrid_text::MonospaceMeasurer;

fn fields() -> Vec<Field> {
    vec![
        Field::new("ticker", "Ticker"),
        Field::new("name", "Name").truncatable(),
        Field::new("coupon", "Cpn").hideable(),
        Field::new("maturity", "Maturity").hideable(),
        Field::new("rating", "Rating").hideable(),
    ]
}

fn records(n: usize) -> Vec<RecordRef> {
    (0..n)
        .map(|i| {
            Arc::new(
                Record::new(format!("SEC{i:05}"))
                    .with("ticker", format!("T{i:04}"))
                    .with("name", format!("Issuer {} Holdings Series {}", i % 311, i % 7))
                    .with("coupon", (i % 16) as f64 * 0.375)
                    .with("maturity", format!("20{:02}-0{}-15", 25 + i % 20, 1 + i % 9))
                    .with("rating", ["Aaa", "Aa1", "A2", "Baa3"][i % 4]),
            )
        })
        .collect()
}

fn bench_allocate(c: &mut Criterion) {
    let fields = fields();
    let container = Container::new("menu", 420.0);
    let mut group = c.benchmark_group("allocate");

    for n in [50usize, 500, 5_000] {
        let recs = records(n);

        group.bench_with_input(BenchmarkId::new("cold", n), &recs, |b, recs| {
            b.iter(|| {
                let mut engine = LayoutEngine::new(LayoutConfig::default(), MonospaceMeasurer::default());
                black_box(engine.allocate(recs, &fields, &container, true, true).ok())
            });
        });

        group.bench_with_input(BenchmarkId::new("warm", n), &recs, |b, recs| {
            let mut engine = LayoutEngine::new(LayoutConfig::default(), MonospaceMeasurer::default());
            let _ = engine.allocate(recs, &fields, &container, true, true);
            b.iter(|| black_box(engine.allocate(recs, &fields, &container, true, true).ok()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_allocate);
criterion_main!(benches);
