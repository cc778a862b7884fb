use crate::errors::StrategyError;
use crate::value_objects::signal::Signal;
use serde::{Deserialize, Serialize};
use std::fmt;

mod fixed_window;
mod full_history;
mod ring_buffer;
mod running_aggregate;

pub use fixed_window::FixedWindow;
pub use full_history::FullHistory;
pub use ring_buffer::RingBuffer;
pub use running_aggregate::RunningAggregate;

pub const DEFAULT_WINDOW: usize = 10;

/// Incremental moving-average signal generator.
///
/// Each successful `update` folds the price into the variant's average, appends
/// exactly one signal and returns it. A failed update leaves the state untouched.
pub trait Strategy {
    fn name(&self) -> &str;

    fn update(&mut self, price: f64) -> Result<Signal, StrategyError>;

    fn total_return(&self) -> Result<f64, StrategyError>;

    fn signals(&self) -> &[Signal];

    fn observed(&self) -> usize;
}

/// Which strategy to build. `build` is called once per benchmark trial so no
/// state survives between trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    FullHistory,
    FixedWindow { window: usize },
    RunningAggregate,
}

impl StrategyKind {
    pub fn fixed_window() -> Self {
        StrategyKind::FixedWindow {
            window: DEFAULT_WINDOW,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::FullHistory => FullHistory::NAME,
            StrategyKind::FixedWindow { .. } => FixedWindow::NAME,
            StrategyKind::RunningAggregate => RunningAggregate::NAME,
        }
    }

    pub fn build(&self) -> Result<Box<dyn Strategy>, StrategyError> {
        Ok(match *self {
            StrategyKind::FullHistory => Box::new(FullHistory::new()),
            StrategyKind::FixedWindow { window } => Box::new(FixedWindow::new(window)?),
            StrategyKind::RunningAggregate => Box::new(RunningAggregate::new()),
        })
    }

    /// Parses the labels used on the command line and in config files.
    /// `fixed_window` picks up `window`.
    pub fn parse(raw: &str, window: usize) -> Result<Self, String> {
        match raw.trim().to_lowercase().replace('-', "_").as_str() {
            "full_history" | "naive" => Ok(StrategyKind::FullHistory),
            "fixed_window" | "windowed" => Ok(StrategyKind::FixedWindow { window }),
            "running_aggregate" | "better" => Ok(StrategyKind::RunningAggregate),
            other => Err(format!(
                "unsupported strategy '{other}' (use: full_history | fixed_window | running_aggregate)"
            )),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::FixedWindow { window } => write!(f, "{}(window={window})", self.label()),
            _ => f.write_str(self.label()),
        }
    }
}

pub(crate) fn ensure_finite_price(price: f64) -> Result<(), StrategyError> {
    if price.is_finite() {
        Ok(())
    } else {
        Err(StrategyError::NonFinitePrice(price))
    }
}

pub(crate) fn checked_average(price: f64, sum: f64, count: usize) -> Result<f64, StrategyError> {
    let average = sum / count as f64;
    if average.is_finite() {
        Ok(average)
    } else {
        Err(StrategyError::NonFiniteAverage { price, average })
    }
}

/// `(last / first) - 1`, with `0.0` for fewer than two observations.
pub(crate) fn simple_return(
    first: Option<f64>,
    last: Option<f64>,
    observed: usize,
) -> Result<f64, StrategyError> {
    let (Some(first), Some(last)) = (first, last) else {
        return Ok(0.0);
    };
    if observed < 2 {
        return Ok(0.0);
    }
    if first == 0.0 {
        return Err(StrategyError::ZeroFirstPrice);
    }
    Ok(last / first - 1.0)
}
