mod order_validator;
mod settlement;

pub use order_validator::{OrderLimits, OrderValidator, ValidationError};
pub use settlement::{SettlementError, SettlementPlan};
