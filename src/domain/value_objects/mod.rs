mod amount;
mod price;
mod side;
mod symbol;

pub use amount::Amount;
pub use price::Price;
pub use side::Side;
pub use symbol::Symbol;

use rust_decimal::{Decimal, RoundingStrategy};

pub type OrderId = uuid::Uuid;
pub type TradeId = uuid::Uuid;
pub type UserId = uuid::Uuid;
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Fractional digits carried by all monetary and quantity arithmetic.
pub const SETTLEMENT_SCALE: u32 = 8;

/// Truncate a computed value to settlement precision.
///
/// Products of two scale-8 values can carry up to 16 fractional digits;
/// the excess is dropped toward zero so that settlement never fabricates
/// value out of rounding.
pub fn truncate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(SETTLEMENT_SCALE, RoundingStrategy::ToZero)
}
