use std::time::Instant;
use tickstat_domain::repositories::market_data::TickSource;
use tickstat_domain::value_objects::tick::Tick;
use tracing::info_span;

const SYNTHETIC_START_TS: i64 = 1_700_000_000;

/// Deterministic price path for runs without a data file.
#[derive(Debug, Clone)]
pub struct SyntheticTickSource {
    ticks: usize,
    symbol: String,
    step_seconds: i64,
}

impl SyntheticTickSource {
    pub fn new(ticks: usize, symbol: impl Into<String>) -> Self {
        Self {
            ticks,
            symbol: symbol.into(),
            step_seconds: 1,
        }
    }

    pub fn with_step_seconds(mut self, step_seconds: i64) -> Self {
        self.step_seconds = step_seconds;
        self
    }
}

impl TickSource for SyntheticTickSource {
    fn describe(&self) -> String {
        format!("synthetic({} ticks, symbol={})", self.ticks, self.symbol)
    }

    fn load_ticks(&self) -> Result<Vec<Tick>, String> {
        if self.step_seconds <= 0 {
            return Err("step_seconds must be > 0".to_string());
        }
        let mut ticks = Vec::with_capacity(self.ticks);
        let mut price = 100.0f64;
        for i in 0..self.ticks {
            let ts = SYNTHETIC_START_TS + (i as i64) * self.step_seconds;
            let drift = ((i as f64) * 0.000001).sin() * 0.05;
            let shock = ((i as f64) * 0.001).cos() * 0.01;
            price = (price * (1.0 + (drift + shock) * 0.01)).max(0.01);
            ticks.push(Tick::new(ts.to_string(), self.symbol.clone(), price));
        }
        Ok(ticks)
    }
}

/// Loads ticks through `source` and runs [`validate_ticks`] over them.
pub fn load_ticks(source: &dyn TickSource) -> Result<Vec<Tick>, String> {
    let description = source.describe();
    let _span = info_span!("load_ticks", source = %description).entered();

    let start = Instant::now();
    let ticks = source.load_ticks()?;
    validate_ticks(&ticks)?;

    metrics::gauge!("tickstat.data.ticks_loaded").set(ticks.len() as f64);
    metrics::histogram!("tickstat.data.load_ms").record(start.elapsed().as_millis() as f64);
    tracing::info!(rows = ticks.len(), "ticks loaded");
    Ok(ticks)
}

/// Every tick needs a non-empty timestamp and symbol and a finite price, and
/// the first price must be non-zero. Zero prices later in the series pass: a
/// fixed window that starts on one reports `ZeroFirstPrice` from
/// `total_return` instead.
pub fn validate_ticks(ticks: &[Tick]) -> Result<(), String> {
    for (idx, tick) in ticks.iter().enumerate() {
        if tick.timestamp.trim().is_empty() {
            return Err(format!("tick {idx}: empty timestamp"));
        }
        if tick.symbol.trim().is_empty() {
            return Err(format!("tick {idx}: empty symbol"));
        }
        if !tick.price.is_finite() {
            return Err(format!("tick {idx}: non-finite price {}", tick.price));
        }
        if idx == 0 && tick.price == 0.0 {
            return Err("tick 0: first price is zero, total return is undefined".to_string());
        }
    }
    Ok(())
}
