use crate::application::ports::{EventPublisher, LedgerRepository, OrderRepository};
use crate::application::transaction::SymbolLocks;
use crate::domain::{
    BookChangedEvent, ExchangeEvent, LedgerError, Order, OrderId, Side,
};
use chrono::Utc;
use std::sync::Arc;

/// Cancels an open order and releases its unfilled reservation.
///
/// Runs under the symbol lock so a cancel cannot interleave with a
/// match against the same order: by the time the reservation is
/// released, the order is guaranteed not to fill again.
pub struct CancelOrderUseCase<L, O, E>
where
    L: LedgerRepository,
    O: OrderRepository,
    E: EventPublisher,
{
    ledger: Arc<L>,
    orders: Arc<O>,
    publisher: Arc<E>,
    locks: Arc<SymbolLocks>,
}

impl<L, O, E> CancelOrderUseCase<L, O, E>
where
    L: LedgerRepository,
    O: OrderRepository,
    E: EventPublisher,
{
    pub fn new(ledger: Arc<L>, orders: Arc<O>, publisher: Arc<E>, locks: Arc<SymbolLocks>) -> Self {
        Self {
            ledger,
            orders,
            publisher,
            locks,
        }
    }

    pub async fn execute(&self, order_id: OrderId) -> Result<Order, CancelError> {
        let snapshot = self
            .orders
            .get(order_id)
            .await
            .ok_or(CancelError::OrderNotFound)?;

        let _guard = self.locks.acquire(snapshot.symbol).await;

        // Re-fetch under the lock; the order may have filled meanwhile.
        let mut order = self
            .orders
            .get(order_id)
            .await
            .ok_or(CancelError::OrderNotFound)?;
        if !order.is_open() {
            return Err(CancelError::OrderNotOpen);
        }

        match order.side {
            Side::Buy => {
                self.ledger
                    .credit(order.user_id, order.reserved_cash())
                    .await;
            }
            Side::Sell => {
                self.ledger
                    .unlock(order.user_id, order.symbol, order.remaining.inner())
                    .await
                    .map_err(CancelError::Ledger)?;
            }
        }

        order.cancel(Utc::now());
        self.orders.update(order.clone()).await;

        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            symbol = %order.symbol,
            side = %order.side,
            remaining = %order.remaining,
            "order cancelled"
        );

        self.publisher
            .publish_to_symbol(
                order.symbol,
                ExchangeEvent::BookChanged(BookChangedEvent::now(order.symbol)),
            )
            .await;

        Ok(order)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelError {
    OrderNotFound,
    OrderNotOpen,
    Ledger(LedgerError),
}

impl std::fmt::Display for CancelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelError::OrderNotFound => write!(f, "Order not found"),
            CancelError::OrderNotOpen => write!(f, "Order is not open"),
            CancelError::Ledger(e) => write!(f, "Ledger error during cancellation: {}", e),
        }
    }
}

impl std::error::Error for CancelError {}
