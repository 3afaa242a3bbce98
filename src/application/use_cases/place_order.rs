use crate::application::ports::{EventPublisher, LedgerRepository, OrderRepository};
use crate::domain::{
    Amount, BookChangedEvent, ExchangeEvent, LedgerError, Order, OrderLimits, OrderValidator,
    Price, Side, Symbol, UserId, ValidationError,
};
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct PlaceOrderCommand {
    pub symbol: Symbol,
    pub side: Side,
    pub price: Decimal,
    pub amount: Decimal,
}

/// Validates an order request, reserves the backing funds or inventory,
/// and persists the order OPEN.
///
/// Reservation and persistence form one unit: a rejected reservation
/// creates no order, and a created order always has its reservation in
/// place. Matching is triggered by the caller after placement returns.
pub struct PlaceOrderUseCase<L, O, E>
where
    L: LedgerRepository,
    O: OrderRepository,
    E: EventPublisher,
{
    ledger: Arc<L>,
    orders: Arc<O>,
    publisher: Arc<E>,
    limits: OrderLimits,
}

impl<L, O, E> PlaceOrderUseCase<L, O, E>
where
    L: LedgerRepository,
    O: OrderRepository,
    E: EventPublisher,
{
    pub fn new(ledger: Arc<L>, orders: Arc<O>, publisher: Arc<E>, limits: OrderLimits) -> Self {
        Self {
            ledger,
            orders,
            publisher,
            limits,
        }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        command: PlaceOrderCommand,
    ) -> Result<Order, PlaceOrderError> {
        OrderValidator::validate(command.price, command.amount, &self.limits)
            .map_err(PlaceOrderError::Validation)?;

        let price = Price::new(command.price)
            .map_err(|e| PlaceOrderError::Validation(ValidationError::new(e)))?;
        let amount = Amount::new(command.amount)
            .map_err(|e| PlaceOrderError::Validation(ValidationError::new(e)))?;

        match command.side {
            Side::Buy => {
                let cost = price.notional(amount);
                self.ledger.try_debit(user_id, cost).await?;
            }
            Side::Sell => {
                self.ledger
                    .try_lock(user_id, command.symbol, amount.inner())
                    .await?;
            }
        }

        let order = Order::new(user_id, command.symbol, command.side, price, amount);
        self.orders.insert(order.clone()).await;

        tracing::info!(
            order_id = %order.id,
            user_id = %user_id,
            symbol = %order.symbol,
            side = %order.side,
            price = %order.price,
            amount = %order.amount,
            "order placed"
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
pub enum PlaceOrderError {
    Validation(ValidationError),
    InsufficientFunds,
    InsufficientInventory,
    Ledger(LedgerError),
}

impl From<LedgerError> for PlaceOrderError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InsufficientFunds => PlaceOrderError::InsufficientFunds,
            LedgerError::InsufficientInventory => PlaceOrderError::InsufficientInventory,
            other => PlaceOrderError::Ledger(other),
        }
    }
}

impl std::fmt::Display for PlaceOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaceOrderError::Validation(e) => write!(f, "Validation failed: {}", e),
            PlaceOrderError::InsufficientFunds => write!(f, "Insufficient USD balance"),
            PlaceOrderError::InsufficientInventory => write!(f, "Insufficient asset balance"),
            PlaceOrderError::Ledger(e) => write!(f, "Ledger error: {}", e),
        }
    }
}

impl std::error::Error for PlaceOrderError {}
