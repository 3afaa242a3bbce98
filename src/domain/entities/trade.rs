use crate::domain::value_objects::{Amount, OrderId, Price, Symbol, Timestamp, TradeId, UserId};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The record of one executed match between a buy and a sell order.
///
/// All monetary fields are already truncated to settlement precision;
/// `seller_proceeds + fee` equals `gross_value` exactly, and
/// `buyer_refund + gross_value` equals the cash the buyer had reserved
/// for the matched amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub symbol: Symbol,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    /// Execution price: always the resting sell order's limit.
    pub price: Price,
    pub amount: Amount,
    pub gross_value: Decimal,
    pub fee: Decimal,
    pub buyer_refund: Decimal,
    pub seller_proceeds: Decimal,
    pub executed_at: Timestamp,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: Symbol,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        buyer_id: UserId,
        seller_id: UserId,
        price: Price,
        amount: Amount,
        gross_value: Decimal,
        fee: Decimal,
        buyer_refund: Decimal,
        seller_proceeds: Decimal,
    ) -> Self {
        Trade {
            id: Uuid::new_v4(),
            symbol,
            buy_order_id,
            sell_order_id,
            buyer_id,
            seller_id,
            price,
            amount,
            gross_value,
            fee,
            buyer_refund,
            seller_proceeds,
            executed_at: Utc::now(),
        }
    }
}

impl PartialEq for Trade {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Trade {}
