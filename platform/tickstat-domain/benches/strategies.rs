//! Criterion benchmarks for the per-update cost of each strategy.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tickstat_domain::services::strategy::StrategyKind;

fn make_prices(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0)
        .collect()
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy_run");
    for n in [1_000usize, 5_000] {
        let prices = make_prices(n);
        for kind in [
            StrategyKind::FullHistory,
            StrategyKind::fixed_window(),
            StrategyKind::RunningAggregate,
        ] {
            group.bench_with_input(BenchmarkId::new(kind.label(), n), &prices, |b, prices| {
                b.iter(|| {
                    let mut strategy = kind.build().expect("build strategy");
                    for price in prices.iter().copied() {
                        black_box(strategy.update(price).expect("update"));
                    }
                    black_box(strategy.total_return().expect("total return"))
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
