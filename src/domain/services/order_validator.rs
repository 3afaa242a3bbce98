use rust_decimal::Decimal;

/// Minimum acceptable order parameters, taken from configuration at
/// startup.
#[derive(Debug, Clone, Copy)]
pub struct OrderLimits {
    pub min_price: Decimal,
    pub min_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        ValidationError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates raw order parameters before any state is touched.
pub struct OrderValidator;

impl OrderValidator {
    pub fn validate(
        price: Decimal,
        amount: Decimal,
        limits: &OrderLimits,
    ) -> Result<(), ValidationError> {
        if price < limits.min_price {
            return Err(ValidationError::new(format!(
                "Price must be at least {}",
                limits.min_price
            )));
        }
        if amount < limits.min_amount {
            return Err(ValidationError::new(format!(
                "Amount must be at least {}",
                limits.min_amount
            )));
        }
        Ok(())
    }
}
