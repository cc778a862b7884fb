use proptest::prelude::*;
use tickstat_domain::services::strategy::{
    FixedWindow, FullHistory, RunningAggregate, Strategy, StrategyKind,
};
use tickstat_domain::value_objects::signal::Signal;

fn feed<S: Strategy>(strategy: &mut S, prices: &[f64]) {
    for price in prices.iter().copied() {
        strategy.update(price).expect("finite prices update cleanly");
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn running_aggregate_matches_full_history(prices in prop::collection::vec(0.01f64..10_000.0, 0..200)) {
        let mut naive = FullHistory::new();
        let mut better = RunningAggregate::new();
        feed(&mut naive, &prices);
        feed(&mut better, &prices);

        prop_assert_eq!(naive.signals(), better.signals());
        prop_assert_eq!(naive.total_return(), better.total_return());
    }

    #[test]
    fn equivalence_holds_with_repeated_and_integral_prices(prices in prop::collection::vec(1u32..20, 1..120)) {
        let prices: Vec<f64> = prices.into_iter().map(f64::from).collect();
        let mut naive = FullHistory::new();
        let mut better = RunningAggregate::new();
        feed(&mut naive, &prices);
        feed(&mut better, &prices);

        prop_assert_eq!(naive.signals(), better.signals());
        prop_assert!(naive.signals().contains(&Signal::Hold));
    }

    #[test]
    fn fixed_window_agrees_with_full_history_until_first_eviction(
        prices in prop::collection::vec(0.01f64..10_000.0, 0..120),
        window in 1usize..40,
    ) {
        let mut naive = FullHistory::new();
        let mut windowed = FixedWindow::new(window).expect("positive window");
        feed(&mut naive, &prices);
        feed(&mut windowed, &prices);

        let prefix = prices.len().min(window);
        prop_assert_eq!(&naive.signals()[..prefix], &windowed.signals()[..prefix]);
        if prices.len() <= window {
            prop_assert_eq!(naive.total_return(), windowed.total_return());
        }
    }

    #[test]
    fn every_variant_records_one_signal_per_update(
        prices in prop::collection::vec(-1_000.0f64..1_000.0, 0..100),
        window in 1usize..16,
    ) {
        for kind in [
            StrategyKind::FullHistory,
            StrategyKind::FixedWindow { window },
            StrategyKind::RunningAggregate,
        ] {
            let mut strategy = kind.build().expect("build");
            let mut expected = Vec::with_capacity(prices.len());
            for (k, price) in prices.iter().copied().enumerate() {
                expected.push(strategy.update(price).expect("update"));
                prop_assert_eq!(strategy.signals().len(), k + 1);
                prop_assert_eq!(strategy.observed(), k + 1);
            }
            prop_assert_eq!(strategy.signals(), expected.as_slice());
        }
    }

    #[test]
    fn sentinel_for_fewer_than_two_prices(price in prop::option::of(-1_000.0f64..1_000.0), window in 1usize..8) {
        for kind in [
            StrategyKind::FullHistory,
            StrategyKind::FixedWindow { window },
            StrategyKind::RunningAggregate,
        ] {
            let mut strategy = kind.build().expect("build");
            if let Some(p) = price {
                strategy.update(p).expect("update");
            }
            prop_assert_eq!(strategy.total_return(), Ok(0.0));
        }
    }
}
