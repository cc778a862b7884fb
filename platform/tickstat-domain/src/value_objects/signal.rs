use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// Compares a price against an average that already includes that price.
    pub fn from_price_and_average(price: f64, average: f64) -> Self {
        if price > average {
            Signal::Buy
        } else if price < average {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Signal;

    #[test]
    fn decision_rule_matches_price_against_average() {
        assert_eq!(Signal::from_price_and_average(11.0, 10.0), Signal::Buy);
        assert_eq!(Signal::from_price_and_average(9.0, 10.0), Signal::Sell);
        assert_eq!(Signal::from_price_and_average(10.0, 10.0), Signal::Hold);
    }

    #[test]
    fn serializes_as_uppercase_labels() {
        let raw = serde_json::to_string(&[Signal::Buy, Signal::Sell, Signal::Hold])
            .expect("serialize signals");
        assert_eq!(raw, r#"["BUY","SELL","HOLD"]"#);
        assert_eq!(Signal::Sell.to_string(), "SELL");
    }
}
