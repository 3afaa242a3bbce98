use crate::application::ports::{EventPublisher, LedgerRepository, OrderRepository};
use crate::application::transaction::SymbolLocks;
use crate::domain::{
    BookChangedEvent, ExchangeEvent, LedgerError, Order, OrderId, SettlementError, SettlementPlan,
    Side, Trade,
};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Outcome of one matching step under the symbol lock.
enum MatchStep {
    Traded(Trade),
    NoCounter,
    Closed,
}

/// Drives an order through the book until it is filled or no eligible
/// counter-order remains.
///
/// Each step runs as its own symbol transaction: re-fetch the order,
/// find the best counter, settle one trade, release the lock. Orders
/// that turn out to be FILLED or CANCELLED by the time the lock is
/// held are skipped without error, so concurrent triggers for the same
/// order are harmless.
pub struct MatchOrderUseCase<L, O, E>
where
    L: LedgerRepository,
    O: OrderRepository,
    E: EventPublisher,
{
    ledger: Arc<L>,
    orders: Arc<O>,
    publisher: Arc<E>,
    locks: Arc<SymbolLocks>,
    fee_rate: Decimal,
}

impl<L, O, E> MatchOrderUseCase<L, O, E>
where
    L: LedgerRepository,
    O: OrderRepository,
    E: EventPublisher,
{
    pub fn new(
        ledger: Arc<L>,
        orders: Arc<O>,
        publisher: Arc<E>,
        locks: Arc<SymbolLocks>,
        fee_rate: Decimal,
    ) -> Self {
        Self {
            ledger,
            orders,
            publisher,
            locks,
            fee_rate,
        }
    }

    /// Match `order_id` repeatedly, one trade per symbol transaction,
    /// and return the trades executed. An unknown or already closed
    /// order yields an empty list.
    pub async fn execute(&self, order_id: OrderId) -> Result<Vec<Trade>, MatchError> {
        let mut trades = Vec::new();
        loop {
            match self.attempt_match(order_id).await? {
                MatchStep::Traded(trade) => trades.push(trade),
                MatchStep::NoCounter | MatchStep::Closed => break,
            }
        }
        Ok(trades)
    }

    async fn attempt_match(&self, order_id: OrderId) -> Result<MatchStep, MatchError> {
        let Some(snapshot) = self.orders.get(order_id).await else {
            return Ok(MatchStep::Closed);
        };

        let _guard = self.locks.acquire(snapshot.symbol).await;

        // Re-fetch under the lock; another task may have filled or
        // cancelled the order while we waited.
        let Some(order) = self.orders.get(order_id).await else {
            return Ok(MatchStep::Closed);
        };
        if !order.is_open() || order.remaining.is_zero() {
            return Ok(MatchStep::Closed);
        }

        let Some(counter) = self.orders.find_best_counter(&order).await else {
            return Ok(MatchStep::NoCounter);
        };

        let trade = self.settle(order, counter).await?;
        Ok(MatchStep::Traded(trade))
    }

    /// Execute one trade between two crossed orders. Runs entirely
    /// under the symbol lock held by the caller.
    ///
    /// The only fallible ledger operation, consuming the seller's
    /// locked inventory, comes first; everything after it is an
    /// unconditional credit or an order update, so a failure leaves
    /// every row untouched.
    async fn settle(&self, order: Order, counter: Order) -> Result<Trade, MatchError> {
        let (mut buy, mut sell) = if order.side == Side::Buy {
            (order, counter)
        } else {
            (counter, order)
        };

        let plan = SettlementPlan::compute(&buy, &sell, self.fee_rate)?;

        self.ledger
            .consume_locked(sell.user_id, sell.symbol, plan.matched_amount.inner())
            .await?;

        self.ledger
            .credit_free(buy.user_id, buy.symbol, plan.matched_amount.inner())
            .await;
        if plan.buyer_refund > Decimal::ZERO {
            self.ledger.credit(buy.user_id, plan.buyer_refund).await;
        }
        self.ledger.credit(sell.user_id, plan.seller_proceeds).await;

        let now = Utc::now();
        buy.fill(plan.matched_amount, now);
        sell.fill(plan.matched_amount, now);
        self.orders.update(buy.clone()).await;
        self.orders.update(sell.clone()).await;

        let trade = Trade::new(
            buy.symbol,
            buy.id,
            sell.id,
            buy.user_id,
            sell.user_id,
            plan.execution_price,
            plan.matched_amount,
            plan.gross_value,
            plan.fee,
            plan.buyer_refund,
            plan.seller_proceeds,
        );

        tracing::info!(
            trade_id = %trade.id,
            symbol = %trade.symbol,
            buy_order_id = %buy.id,
            sell_order_id = %sell.id,
            price = %trade.price,
            amount = %trade.amount,
            fee = %trade.fee,
            "trade executed"
        );

        self.publisher
            .publish_to_symbol(
                trade.symbol,
                ExchangeEvent::TradeExecuted((&trade).into()),
            )
            .await;
        self.publisher
            .publish_to_symbol(
                trade.symbol,
                ExchangeEvent::BookChanged(BookChangedEvent::now(trade.symbol)),
            )
            .await;

        Ok(trade)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    Settlement(SettlementError),
    Ledger(LedgerError),
}

impl From<SettlementError> for MatchError {
    fn from(e: SettlementError) -> Self {
        MatchError::Settlement(e)
    }
}

impl From<LedgerError> for MatchError {
    fn from(e: LedgerError) -> Self {
        MatchError::Ledger(e)
    }
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchError::Settlement(e) => write!(f, "Settlement failed: {}", e),
            MatchError::Ledger(e) => write!(f, "Ledger error during settlement: {}", e),
        }
    }
}

impl std::error::Error for MatchError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, OrderStatus, Price, Symbol};
    use crate::infrastructure::{
        BroadcastEventPublisher, InMemoryLedgerRepository, InMemoryOrderRepository,
    };
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    struct Fixture {
        ledger: Arc<InMemoryLedgerRepository>,
        orders: Arc<InMemoryOrderRepository>,
        publisher: Arc<BroadcastEventPublisher>,
        use_case: MatchOrderUseCase<
            InMemoryLedgerRepository,
            InMemoryOrderRepository,
            BroadcastEventPublisher,
        >,
    }

    fn fixture() -> Fixture {
        let ledger = Arc::new(InMemoryLedgerRepository::new());
        let orders = Arc::new(InMemoryOrderRepository::new());
        let publisher = Arc::new(BroadcastEventPublisher::new(100));
        let use_case = MatchOrderUseCase::new(
            Arc::clone(&ledger),
            Arc::clone(&orders),
            Arc::clone(&publisher),
            Arc::new(SymbolLocks::new()),
            dec!(0.015),
        );
        Fixture {
            ledger,
            orders,
            publisher,
            use_case,
        }
    }

    /// Places a funded order directly: reserves the backing ledger
    /// entries the way placement would, then inserts it OPEN.
    async fn place(fx: &Fixture, side: Side, price: Decimal, amount: Decimal) -> Order {
        let user = Uuid::new_v4();
        let price = Price::new(price).unwrap();
        let amount = Amount::new(amount).unwrap();
        match side {
            Side::Buy => {
                fx.ledger.credit(user, price.notional(amount)).await;
                fx.ledger
                    .try_debit(user, price.notional(amount))
                    .await
                    .unwrap();
            }
            Side::Sell => {
                fx.ledger
                    .credit_free(user, Symbol::Btc, amount.inner())
                    .await;
                fx.ledger
                    .try_lock(user, Symbol::Btc, amount.inner())
                    .await
                    .unwrap();
            }
        }
        let order = Order::new(user, Symbol::Btc, side, price, amount);
        fx.orders.insert(order.clone()).await;
        order
    }

    #[tokio::test]
    async fn crossed_orders_trade_at_sell_price() {
        let fx = fixture();
        let sell = place(&fx, Side::Sell, dec!(95), dec!(1)).await;
        let buy = place(&fx, Side::Buy, dec!(100), dec!(1)).await;

        let trades = fx.use_case.execute(buy.id).await.unwrap();

        assert_eq!(trades.len(), 1);
        let trade = &trades[0];
        assert_eq!(trade.price.inner(), dec!(95));
        assert_eq!(trade.gross_value, dec!(95));
        assert_eq!(trade.fee, dec!(1.425));
        assert_eq!(trade.buyer_refund, dec!(5));
        assert_eq!(trade.seller_proceeds, dec!(93.575));

        assert_eq!(fx.ledger.balance(buy.user_id).await, dec!(5));
        assert_eq!(fx.ledger.balance(sell.user_id).await, dec!(93.575));
        let holding = fx.ledger.holding(buy.user_id, Symbol::Btc).await;
        assert_eq!(holding.free, dec!(1));
        let sold = fx.ledger.holding(sell.user_id, Symbol::Btc).await;
        assert_eq!(sold.total(), dec!(0));
    }

    #[tokio::test]
    async fn both_orders_close_on_full_fill() {
        let fx = fixture();
        let sell = place(&fx, Side::Sell, dec!(100), dec!(2)).await;
        let buy = place(&fx, Side::Buy, dec!(100), dec!(2)).await;

        fx.use_case.execute(buy.id).await.unwrap();

        assert_eq!(fx.orders.get(buy.id).await.unwrap().status, OrderStatus::Filled);
        assert_eq!(fx.orders.get(sell.id).await.unwrap().status, OrderStatus::Filled);
    }

    #[tokio::test]
    async fn partial_fill_leaves_remainder_open() {
        let fx = fixture();
        let sell = place(&fx, Side::Sell, dec!(100), dec!(0.5)).await;
        let buy = place(&fx, Side::Buy, dec!(100), dec!(2)).await;

        let trades = fx.use_case.execute(buy.id).await.unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].amount.inner(), dec!(0.5));
        let buy_after = fx.orders.get(buy.id).await.unwrap();
        assert_eq!(buy_after.status, OrderStatus::Open);
        assert_eq!(buy_after.remaining.inner(), dec!(1.5));
        assert_eq!(fx.orders.get(sell.id).await.unwrap().status, OrderStatus::Filled);
    }

    #[tokio::test]
    async fn consumes_multiple_counter_orders_in_price_order() {
        let fx = fixture();
        let cheap = place(&fx, Side::Sell, dec!(100), dec!(1)).await;
        let dear = place(&fx, Side::Sell, dec!(101), dec!(1)).await;
        let buy = place(&fx, Side::Buy, dec!(101), dec!(2)).await;

        let trades = fx.use_case.execute(buy.id).await.unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].sell_order_id, cheap.id);
        assert_eq!(trades[0].price.inner(), dec!(100));
        assert_eq!(trades[1].sell_order_id, dear.id);
        assert_eq!(trades[1].price.inner(), dec!(101));
        assert_eq!(fx.orders.get(buy.id).await.unwrap().status, OrderStatus::Filled);
    }

    #[tokio::test]
    async fn time_priority_breaks_price_ties() {
        let fx = fixture();
        let first = place(&fx, Side::Sell, dec!(100), dec!(1)).await;
        let _second = place(&fx, Side::Sell, dec!(100), dec!(1)).await;
        let buy = place(&fx, Side::Buy, dec!(100), dec!(1)).await;

        let trades = fx.use_case.execute(buy.id).await.unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].sell_order_id, first.id);
    }

    #[tokio::test]
    async fn non_crossing_orders_do_not_trade() {
        let fx = fixture();
        place(&fx, Side::Sell, dec!(101), dec!(1)).await;
        let buy = place(&fx, Side::Buy, dec!(100), dec!(1)).await;

        let trades = fx.use_case.execute(buy.id).await.unwrap();
        assert!(trades.is_empty());
        assert_eq!(fx.orders.get(buy.id).await.unwrap().status, OrderStatus::Open);
    }

    #[tokio::test]
    async fn resting_buy_refund_uses_its_own_price() {
        let fx = fixture();
        let buy = place(&fx, Side::Buy, dec!(100), dec!(1)).await;
        let sell = place(&fx, Side::Sell, dec!(95), dec!(1)).await;

        // Matching is triggered by the incoming sell, but the refund
        // still measures the buyer's reservation against execution.
        let trades = fx.use_case.execute(sell.id).await.unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price.inner(), dec!(95));
        assert_eq!(trades[0].buyer_refund, dec!(5));
        assert_eq!(fx.ledger.balance(buy.user_id).await, dec!(5));
    }

    #[tokio::test]
    async fn matching_a_closed_order_is_a_no_op() {
        let fx = fixture();
        let sell = place(&fx, Side::Sell, dec!(100), dec!(1)).await;
        let buy = place(&fx, Side::Buy, dec!(100), dec!(1)).await;
        fx.use_case.execute(buy.id).await.unwrap();

        let again = fx.use_case.execute(buy.id).await.unwrap();
        assert!(again.is_empty());
        let and_again = fx.use_case.execute(sell.id).await.unwrap();
        assert!(and_again.is_empty());
    }

    #[tokio::test]
    async fn matching_an_unknown_order_is_a_no_op() {
        let fx = fixture();
        let trades = fx.use_case.execute(Uuid::new_v4()).await.unwrap();
        assert!(trades.is_empty());
    }

    #[tokio::test]
    async fn publishes_trade_and_book_events() {
        let fx = fixture();
        let mut rx = fx.publisher.subscribe();
        place(&fx, Side::Sell, dec!(95), dec!(1)).await;
        let buy = place(&fx, Side::Buy, dec!(100), dec!(1)).await;

        fx.use_case.execute(buy.id).await.unwrap();

        let mut saw_trade = false;
        while let Ok(event) = rx.try_recv() {
            if let ExchangeEvent::TradeExecuted(e) = event {
                assert_eq!(e.price.inner(), dec!(95));
                assert_eq!(e.fee, dec!(1.425));
                saw_trade = true;
            }
        }
        assert!(saw_trade);
    }
}
