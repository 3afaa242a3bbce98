use crate::domain::OrderLimits;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Exchange parameters, fixed for the lifetime of the process.
///
/// The fee rate in particular is read once at startup; changing it
/// requires a restart so every trade settled by one process used the
/// same rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Commission charged to the seller, as a fraction of gross value.
    pub fee_rate: Decimal,
    /// Smallest accepted limit price.
    pub min_price: Decimal,
    /// Smallest accepted order amount.
    pub min_amount: Decimal,
    /// Buffer size of each event broadcast channel.
    pub event_capacity: usize,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            fee_rate: dec!(0.015),
            min_price: dec!(0.0001),
            min_amount: dec!(0.0001),
            event_capacity: 256,
        }
    }
}

impl ExchangeConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ExchangeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fee_rate < Decimal::ZERO || self.fee_rate >= Decimal::ONE {
            return Err(ConfigError::Invalid(format!(
                "fee_rate must be in [0, 1), got {}",
                self.fee_rate
            )));
        }
        if self.min_price <= Decimal::ZERO {
            return Err(ConfigError::Invalid("min_price must be positive".into()));
        }
        if self.min_amount <= Decimal::ZERO {
            return Err(ConfigError::Invalid("min_amount must be positive".into()));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid("event_capacity must be positive".into()));
        }
        Ok(())
    }

    pub fn limits(&self) -> OrderLimits {
        OrderLimits {
            min_price: self.min_price,
            min_amount: self.min_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ExchangeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fee_rate, dec!(0.015));
        assert_eq!(config.min_price, dec!(0.0001));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = ExchangeConfig::from_json(r#"{"fee_rate": "0.02"}"#).unwrap();
        assert_eq!(config.fee_rate, dec!(0.02));
        assert_eq!(config.min_amount, dec!(0.0001));
    }

    #[test]
    fn rejects_out_of_range_fee_rate() {
        assert!(ExchangeConfig::from_json(r#"{"fee_rate": "1.5"}"#).is_err());
        assert!(ExchangeConfig::from_json(r#"{"fee_rate": "-0.01"}"#).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            ExchangeConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
