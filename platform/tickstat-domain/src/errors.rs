use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    #[error("window must be > 0 (got {0})")]
    InvalidWindow(usize),

    #[error("window of {0} prices cannot be allocated")]
    WindowTooLarge(usize),

    #[error("price must be finite (got {0})")]
    NonFinitePrice(f64),

    #[error("average became non-finite after folding price {price} (average {average})")]
    NonFiniteAverage { price: f64, average: f64 },

    #[error("total return is undefined: first observed price is zero")]
    ZeroFirstPrice,
}
