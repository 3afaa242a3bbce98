use crate::domain::value_objects::{Amount, OrderId, Price, Side, Symbol, Timestamp, UserId};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Open,
    Filled,
    Cancelled,
}

impl OrderStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::Open)
    }
}

/// A resting or incoming limit order.
///
/// Funds (buy) or inventory (sell) are reserved before the order is
/// created, so an OPEN order always has its full remaining value backed
/// by the owner's ledger rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub symbol: Symbol,
    pub side: Side,
    pub price: Price,
    pub amount: Amount,
    pub remaining: Amount,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    pub fn new(user_id: UserId, symbol: Symbol, side: Side, price: Price, amount: Amount) -> Self {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4(),
            user_id,
            symbol,
            side,
            price,
            amount,
            remaining: amount,
            status: OrderStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Cash reserved against the remaining amount of a buy order.
    pub fn reserved_cash(&self) -> Decimal {
        self.price.notional(self.remaining)
    }

    /// Whether a counter-order's price satisfies this order's limit.
    pub fn crosses(&self, counter: &Order) -> bool {
        match self.side {
            Side::Buy => counter.price <= self.price,
            Side::Sell => counter.price >= self.price,
        }
    }

    /// Reduce the remaining amount after a trade. The order flips to
    /// FILLED exactly when the remainder reaches zero.
    pub fn fill(&mut self, matched: Amount, now: Timestamp) {
        self.remaining = self.remaining.saturating_sub(matched);
        if self.remaining.is_zero() {
            self.status = OrderStatus::Filled;
        }
        self.updated_at = now;
    }

    pub fn cancel(&mut self, now: Timestamp) {
        if self.status.is_open() {
            self.status = OrderStatus::Cancelled;
            self.updated_at = now;
        }
    }
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Order {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order(side: Side, price: Decimal, amount: Decimal) -> Order {
        Order::new(
            Uuid::new_v4(),
            Symbol::Btc,
            side,
            Price::new(price).unwrap(),
            Amount::new(amount).unwrap(),
        )
    }

    #[test]
    fn partial_fill_keeps_order_open() {
        let mut o = order(Side::Buy, dec!(100), dec!(2));
        o.fill(Amount::new(dec!(0.5)).unwrap(), Utc::now());
        assert_eq!(o.status, OrderStatus::Open);
        assert_eq!(o.remaining.inner(), dec!(1.5));
    }

    #[test]
    fn full_fill_closes_order() {
        let mut o = order(Side::Sell, dec!(100), dec!(1));
        o.fill(Amount::new(dec!(1)).unwrap(), Utc::now());
        assert_eq!(o.status, OrderStatus::Filled);
        assert!(o.remaining.is_zero());
    }

    #[test]
    fn remaining_never_goes_negative() {
        let mut o = order(Side::Buy, dec!(100), dec!(1));
        o.fill(Amount::new(dec!(5)).unwrap(), Utc::now());
        assert_eq!(o.remaining, Amount::ZERO);
        assert_eq!(o.status, OrderStatus::Filled);
    }

    #[test]
    fn cancel_only_applies_to_open_orders() {
        let mut o = order(Side::Buy, dec!(100), dec!(1));
        o.fill(Amount::new(dec!(1)).unwrap(), Utc::now());
        o.cancel(Utc::now());
        assert_eq!(o.status, OrderStatus::Filled);
    }

    #[test]
    fn crosses_respects_limit_prices() {
        let buy = order(Side::Buy, dec!(100), dec!(1));
        let cheap_sell = order(Side::Sell, dec!(95), dec!(1));
        let dear_sell = order(Side::Sell, dec!(101), dec!(1));
        assert!(buy.crosses(&cheap_sell));
        assert!(!buy.crosses(&dear_sell));
        assert!(cheap_sell.crosses(&buy));
    }

    #[test]
    fn reserved_cash_tracks_remaining() {
        let mut o = order(Side::Buy, dec!(100), dec!(2));
        assert_eq!(o.reserved_cash(), dec!(200));
        o.fill(Amount::new(dec!(0.5)).unwrap(), Utc::now());
        assert_eq!(o.reserved_cash(), dec!(150.0));
    }
}
