use super::{checked_average, ensure_finite_price, simple_return, RingBuffer, Strategy};
use crate::errors::StrategyError;
use crate::value_objects::signal::Signal;

/// Moving average over the last `window` prices, kept as a running sum over a
/// ring buffer. `total_return` is measured across the prices currently held
/// in the window, not across the whole run.
#[derive(Debug, Clone)]
pub struct FixedWindow {
    prices: RingBuffer,
    running_sum: f64,
    observed: usize,
    signals: Vec<Signal>,
}

impl FixedWindow {
    pub const NAME: &'static str = "fixed_window";

    pub fn new(window: usize) -> Result<Self, StrategyError> {
        let prices = RingBuffer::new(window)?;
        Ok(Self {
            prices,
            running_sum: 0.0,
            observed: 0,
            signals: Vec::new(),
        })
    }

    pub fn window(&self) -> usize {
        self.prices.capacity()
    }

    /// Prices currently in the window, oldest first.
    pub fn window_prices(&self) -> Vec<f64> {
        self.prices.iter().collect()
    }
}

impl Strategy for FixedWindow {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn update(&mut self, price: f64) -> Result<Signal, StrategyError> {
        ensure_finite_price(price)?;

        // Add first, then subtract the evicted price.
        let mut sum = self.running_sum + price;
        let evicted = self.prices.next_eviction();
        if let Some(oldest) = evicted {
            sum -= oldest;
        }
        let len = if evicted.is_some() {
            self.prices.len()
        } else {
            self.prices.len() + 1
        };
        let average = checked_average(price, sum, len)?;

        self.prices.push(price);
        self.running_sum = sum;
        self.observed += 1;

        let signal = Signal::from_price_and_average(price, average);
        self.signals.push(signal);
        Ok(signal)
    }

    fn total_return(&self) -> Result<f64, StrategyError> {
        simple_return(self.prices.front(), self.prices.back(), self.prices.len())
    }

    fn signals(&self) -> &[Signal] {
        &self.signals
    }

    fn observed(&self) -> usize {
        self.observed
    }
}
