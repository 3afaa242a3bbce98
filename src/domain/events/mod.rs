use crate::domain::entities::Trade;
use crate::domain::value_objects::{Amount, OrderId, Price, Symbol, Timestamp, TradeId, UserId};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Domain events pushed to the notification sink. Delivery is
/// best-effort: downstream consumers (realtime transports, feeds) may
/// miss events without affecting settled state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "camelCase")]
pub enum ExchangeEvent {
    /// A trade settled between two orders.
    TradeExecuted(TradeExecutedEvent),
    /// The resting book for a symbol changed (placement, fill, cancel).
    BookChanged(BookChangedEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeExecutedEvent {
    pub trade_id: TradeId,
    pub symbol: Symbol,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    pub price: Price,
    pub amount: Amount,
    pub fee: Decimal,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookChangedEvent {
    pub symbol: Symbol,
    pub timestamp: Timestamp,
}

impl From<&Trade> for TradeExecutedEvent {
    fn from(trade: &Trade) -> Self {
        TradeExecutedEvent {
            trade_id: trade.id,
            symbol: trade.symbol,
            buy_order_id: trade.buy_order_id,
            sell_order_id: trade.sell_order_id,
            buyer_id: trade.buyer_id,
            seller_id: trade.seller_id,
            price: trade.price,
            amount: trade.amount,
            fee: trade.fee,
            timestamp: trade.executed_at,
        }
    }
}

impl BookChangedEvent {
    pub fn now(symbol: Symbol) -> Self {
        BookChangedEvent {
            symbol,
            timestamp: Utc::now(),
        }
    }
}
