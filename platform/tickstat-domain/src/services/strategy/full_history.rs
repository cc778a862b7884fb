use super::{checked_average, ensure_finite_price, simple_return, Strategy};
use crate::errors::StrategyError;
use crate::value_objects::signal::Signal;

/// Baseline: keeps every price and re-sums the whole history on each update.
/// Linear per update, quadratic over a run.
#[derive(Debug, Clone, Default)]
pub struct FullHistory {
    prices: Vec<f64>,
    signals: Vec<Signal>,
}

impl FullHistory {
    pub const NAME: &'static str = "full_history";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }
}

impl Strategy for FullHistory {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn update(&mut self, price: f64) -> Result<Signal, StrategyError> {
        ensure_finite_price(price)?;
        self.prices.push(price);

        let sum = self.prices.iter().fold(0.0, |acc, p| acc + p);
        let average = match checked_average(price, sum, self.prices.len()) {
            Ok(average) => average,
            Err(err) => {
                self.prices.pop();
                return Err(err);
            }
        };

        let signal = Signal::from_price_and_average(price, average);
        self.signals.push(signal);
        Ok(signal)
    }

    fn total_return(&self) -> Result<f64, StrategyError> {
        simple_return(
            self.prices.first().copied(),
            self.prices.last().copied(),
            self.prices.len(),
        )
    }

    fn signals(&self) -> &[Signal] {
        &self.signals
    }

    fn observed(&self) -> usize {
        self.prices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::FullHistory;
    use crate::errors::StrategyError;
    use crate::services::strategy::Strategy;
    use crate::value_objects::signal::Signal;

    #[test]
    fn averages_over_everything_seen() {
        let mut s = FullHistory::new();
        for price in [10.0, 20.0, 15.0] {
            s.update(price).expect("update");
        }
        assert_eq!(s.signals(), &[Signal::Hold, Signal::Buy, Signal::Hold]);
        assert_eq!(s.total_return(), Ok(0.5));
        assert_eq!(s.prices(), &[10.0, 20.0, 15.0]);
    }

    #[test]
    fn rejects_non_finite_price_without_recording() {
        let mut s = FullHistory::new();
        s.update(1.0).expect("update");
        assert!(matches!(
            s.update(f64::NAN),
            Err(StrategyError::NonFinitePrice(p)) if p.is_nan()
        ));
        assert_eq!(
            s.update(f64::INFINITY),
            Err(StrategyError::NonFinitePrice(f64::INFINITY))
        );
        assert_eq!(s.observed(), 1);
        assert_eq!(s.signals().len(), 1);
    }

    #[test]
    fn overflowing_average_is_reported_and_rolled_back() {
        let mut s = FullHistory::new();
        s.update(f64::MAX).expect("update");
        let err = s.update(f64::MAX).expect_err("sum overflows");
        assert!(matches!(err, StrategyError::NonFiniteAverage { .. }));
        assert_eq!(s.observed(), 1);
        assert_eq!(s.signals(), &[Signal::Hold]);
    }
}
