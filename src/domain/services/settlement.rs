//! Pure settlement arithmetic for one trade between a buy and a sell order.
//!
//! Computing the plan is separated from applying it: the plan is derived
//! from immutable order snapshots and can be checked exhaustively, while
//! the matching engine applies it to the ledger and order store inside a
//! transaction.

use crate::domain::entities::Order;
use crate::domain::value_objects::{Amount, Price, truncate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    SideMismatch,
    SymbolMismatch,
    SelfTrade,
    OrderNotOpen,
    PriceNotCrossed,
}

impl std::fmt::Display for SettlementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettlementError::SideMismatch => write!(f, "Orders are not a buy/sell pair"),
            SettlementError::SymbolMismatch => write!(f, "Orders are for different symbols"),
            SettlementError::SelfTrade => write!(f, "Orders belong to the same user"),
            SettlementError::OrderNotOpen => write!(f, "Both orders must be open with amount remaining"),
            SettlementError::PriceNotCrossed => write!(f, "Sell price exceeds buy price"),
        }
    }
}

impl std::error::Error for SettlementError {}

/// The complete monetary outcome of matching two orders once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementPlan {
    pub matched_amount: Amount,
    /// The resting sell order's limit; the maker keeps their price.
    pub execution_price: Price,
    /// `matched_amount x execution_price`, truncated.
    pub gross_value: Decimal,
    /// Commission charged to the seller only.
    pub fee: Decimal,
    /// Price improvement returned to the buyer's cash balance. The buyer
    /// reserved cash at their own limit price; whatever the execution
    /// price leaves over goes back.
    pub buyer_refund: Decimal,
    /// `gross_value - fee`, credited to the seller's cash balance.
    pub seller_proceeds: Decimal,
}

impl SettlementPlan {
    pub fn compute(buy: &Order, sell: &Order, fee_rate: Decimal) -> Result<Self, SettlementError> {
        use crate::domain::value_objects::Side;

        if buy.side != Side::Buy || sell.side != Side::Sell {
            return Err(SettlementError::SideMismatch);
        }
        if buy.symbol != sell.symbol {
            return Err(SettlementError::SymbolMismatch);
        }
        if buy.user_id == sell.user_id {
            return Err(SettlementError::SelfTrade);
        }
        if !buy.is_open() || !sell.is_open() || buy.remaining.is_zero() || sell.remaining.is_zero()
        {
            return Err(SettlementError::OrderNotOpen);
        }
        if sell.price > buy.price {
            return Err(SettlementError::PriceNotCrossed);
        }

        let matched_amount = buy.remaining.min(sell.remaining);
        let execution_price = sell.price;

        let gross_value = execution_price.notional(matched_amount);
        let fee = truncate(gross_value * fee_rate);

        // The buyer reserved matched x buy.price at placement. Execution
        // at the (never higher) sell price leaves the difference to
        // return. Both notionals are truncated products of scale-8
        // inputs, so the subtraction is exact.
        let buyer_paid = buy.price.notional(matched_amount);
        let buyer_refund = buyer_paid - gross_value;

        let seller_proceeds = gross_value - fee;

        Ok(SettlementPlan {
            matched_amount,
            execution_price,
            gross_value,
            fee,
            buyer_refund,
            seller_proceeds,
        })
    }
}
