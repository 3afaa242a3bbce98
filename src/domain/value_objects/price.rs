use super::{Amount, truncate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Limit price in USD per unit of the base asset. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct Price(Decimal);

impl TryFrom<Decimal> for Price {
    type Error = &'static str;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Price::new(value)
    }
}

impl Price {
    pub fn new(value: Decimal) -> Result<Self, &'static str> {
        if value <= Decimal::ZERO {
            return Err("Price must be positive");
        }
        Ok(Price(value))
    }

    pub fn inner(&self) -> Decimal {
        self.0
    }

    /// Cash value of `amount` units at this price, truncated to
    /// settlement precision.
    pub fn notional(&self, amount: Amount) -> Decimal {
        truncate(self.0 * amount.inner())
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Decimal {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
