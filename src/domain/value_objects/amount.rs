use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quantity of the base asset. Non-negative; `new` additionally rejects
/// zero because orders must be placed for a positive amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct Amount(Decimal);

/// Deserialization admits zero: a filled order's `remaining` is a
/// stored `Amount` of zero. Only `new` insists on a positive value.
impl TryFrom<Decimal> for Amount {
    type Error = &'static str;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value < Decimal::ZERO {
            return Err("Amount cannot be negative");
        }
        Ok(Amount(value))
    }
}

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, &'static str> {
        if value <= Decimal::ZERO {
            return Err("Amount must be positive");
        }
        Ok(Amount(value))
    }

    pub fn inner(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn min(self, other: Amount) -> Amount {
        if self.0 <= other.0 { self } else { other }
    }

    /// Subtraction that stops at zero; remaining amounts never go negative.
    pub fn saturating_sub(self, other: Amount) -> Amount {
        if other.0 >= self.0 {
            Amount::ZERO
        } else {
            Amount(self.0 - other.0)
        }
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Decimal {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_non_positive_amount() {
        assert!(Amount::new(dec!(0)).is_err());
        assert!(Amount::new(dec!(-0.5)).is_err());
        assert!(Amount::new(dec!(0.0001)).is_ok());
    }

    #[test]
    fn deserialization_rejects_negatives_but_admits_zero() {
        assert!(serde_json::from_str::<Amount>("\"1.5\"").is_ok());
        assert_eq!(serde_json::from_str::<Amount>("\"0\"").unwrap(), Amount::ZERO);
        assert!(serde_json::from_str::<Amount>("\"-0.5\"").is_err());
    }

    #[test]
    fn saturating_sub_stops_at_zero() {
        let a = Amount::new(dec!(1)).unwrap();
        let b = Amount::new(dec!(2)).unwrap();
        assert_eq!(a.saturating_sub(b), Amount::ZERO);
        assert_eq!(b.saturating_sub(a).inner(), dec!(1));
    }

    #[test]
    fn min_picks_smaller() {
        let a = Amount::new(dec!(0.5)).unwrap();
        let b = Amount::new(dec!(1.5)).unwrap();
        assert_eq!(a.min(b), a);
    }
}
