use super::{checked_average, ensure_finite_price, simple_return, Strategy};
use crate::errors::StrategyError;
use crate::value_objects::signal::Signal;

/// Mean of the full history kept as a running sum and count.
///
/// Accumulates in the same left-to-right order as [`super::FullHistory`], so
/// both produce bit-identical averages, signals and total returns.
#[derive(Debug, Clone, Default)]
pub struct RunningAggregate {
    running_sum: f64,
    count: usize,
    first_price: Option<f64>,
    last_price: Option<f64>,
    signals: Vec<Signal>,
}

impl RunningAggregate {
    pub const NAME: &'static str = "running_aggregate";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.running_sum / self.count as f64)
    }
}

impl Strategy for RunningAggregate {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn update(&mut self, price: f64) -> Result<Signal, StrategyError> {
        ensure_finite_price(price)?;

        let sum = self.running_sum + price;
        let count = self.count + 1;
        let average = checked_average(price, sum, count)?;

        if self.first_price.is_none() {
            self.first_price = Some(price);
        }
        self.last_price = Some(price);
        self.running_sum = sum;
        self.count = count;

        let signal = Signal::from_price_and_average(price, average);
        self.signals.push(signal);
        Ok(signal)
    }

    fn total_return(&self) -> Result<f64, StrategyError> {
        simple_return(self.first_price, self.last_price, self.count)
    }

    fn signals(&self) -> &[Signal] {
        &self.signals
    }

    fn observed(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::RunningAggregate;
    use crate::errors::StrategyError;
    use crate::services::strategy::Strategy;
    use crate::value_objects::signal::Signal;

    #[test]
    fn tracks_global_first_and_last() {
        let mut s = RunningAggregate::new();
        for price in [10.0, 20.0, 15.0] {
            s.update(price).expect("update");
        }
        assert_eq!(s.signals(), &[Signal::Hold, Signal::Buy, Signal::Hold]);
        assert_eq!(s.average(), Some(15.0));
        assert_eq!(s.total_return(), Ok(0.5));
    }

    #[test]
    fn zero_first_price_is_an_error_not_a_sentinel() {
        let mut s = RunningAggregate::new();
        s.update(0.0).expect("update");
        assert_eq!(s.total_return(), Ok(0.0));
        s.update(2.0).expect("update");
        assert_eq!(s.total_return(), Err(StrategyError::ZeroFirstPrice));
    }

    #[test]
    fn empty_state_has_no_average() {
        let s = RunningAggregate::new();
        assert_eq!(s.average(), None);
        assert_eq!(s.total_return(), Ok(0.0));
        assert_eq!(s.observed(), 0);
    }
}
