use tickstat_domain::errors::StrategyError;
use tickstat_domain::services::strategy::{
    FixedWindow, FullHistory, RunningAggregate, Strategy, StrategyKind,
};
use tickstat_domain::value_objects::signal::Signal::{Buy, Hold, Sell};

fn run(kind: StrategyKind, prices: &[f64]) -> Box<dyn Strategy> {
    let mut strategy = kind.build().expect("build strategy");
    for price in prices.iter().copied() {
        strategy.update(price).expect("update");
    }
    strategy
}

#[test]
fn scenario_full_history_and_running_aggregate() {
    let prices = [10.0, 20.0, 15.0];
    for kind in [StrategyKind::FullHistory, StrategyKind::RunningAggregate] {
        let s = run(kind, &prices);
        assert_eq!(s.signals(), &[Hold, Buy, Hold], "{kind}");
        assert_eq!(s.total_return(), Ok(0.5), "{kind}");
    }
}

#[test]
fn scenario_fixed_window_of_two() {
    let s = run(StrategyKind::FixedWindow { window: 2 }, &[10.0, 20.0, 15.0]);
    assert_eq!(s.signals(), &[Hold, Buy, Sell]);
    assert_eq!(s.total_return(), Ok(-0.25));
}

#[test]
fn window_total_return_diverges_after_overflow() {
    let prices = [10.0, 12.0, 14.0, 16.0, 18.0];
    let naive = run(StrategyKind::FullHistory, &prices);
    let windowed = run(StrategyKind::FixedWindow { window: 3 }, &prices);

    let naive_return = naive.total_return().expect("total return");
    let windowed_return = windowed.total_return().expect("total return");
    assert!((naive_return - 0.8).abs() < 1e-12);
    assert!((windowed_return - (18.0 / 14.0 - 1.0)).abs() < 1e-12);
    assert!((naive_return - windowed_return).abs() > 0.1);
}

#[test]
fn windowed_signals_can_diverge_once_window_slides() {
    // Full-history mean lags behind a trend the short window tracks closely.
    let prices = [100.0, 100.0, 100.0, 50.0, 60.0];
    let naive = run(StrategyKind::FullHistory, &prices);
    let windowed = run(StrategyKind::FixedWindow { window: 2 }, &prices);

    assert_eq!(naive.signals()[..2], windowed.signals()[..2]);
    assert_eq!(naive.signals()[4], Sell);
    assert_eq!(windowed.signals()[4], Buy);
}

#[test]
fn falling_series_emits_sells() {
    let s = run(StrategyKind::RunningAggregate, &[5.0, 4.0, 3.0, 2.0]);
    assert_eq!(s.signals(), &[Hold, Sell, Sell, Sell]);
    let total = s.total_return().expect("total return");
    assert!((total + 0.6).abs() < 1e-12);
}

#[test]
fn zero_first_price_propagates_from_every_variant() {
    let prices = [0.0, 1.0];
    for kind in [
        StrategyKind::FullHistory,
        StrategyKind::FixedWindow { window: 4 },
        StrategyKind::RunningAggregate,
    ] {
        let s = run(kind, &prices);
        assert_eq!(s.total_return(), Err(StrategyError::ZeroFirstPrice), "{kind}");
    }
}

#[test]
fn window_evicting_zero_first_price_recovers() {
    let s = run(StrategyKind::FixedWindow { window: 2 }, &[0.0, 1.0, 2.0]);
    assert_eq!(s.total_return(), Ok(1.0));
}

#[test]
fn names_are_stable() {
    assert_eq!(FullHistory::new().name(), "full_history");
    assert_eq!(FixedWindow::new(3).expect("window").name(), "fixed_window");
    assert_eq!(RunningAggregate::new().name(), "running_aggregate");
    assert_eq!(
        StrategyKind::FixedWindow { window: 3 }.to_string(),
        "fixed_window(window=3)"
    );
}
