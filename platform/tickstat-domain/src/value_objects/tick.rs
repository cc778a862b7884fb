use serde::{Deserialize, Serialize};

/// One observed price for a symbol. Loaders guarantee a finite price and
/// non-empty timestamp/symbol before handing ticks to the rest of the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub timestamp: String,
    pub symbol: String,
    pub price: f64,
}

impl Tick {
    pub fn new(timestamp: impl Into<String>, symbol: impl Into<String>, price: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            symbol: symbol.into(),
            price,
        }
    }
}
