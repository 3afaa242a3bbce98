//! Matchbook
//!
//! A spot exchange matching core for a small set of USD-quoted crypto
//! symbols: limit order placement with up-front fund reservation,
//! price-time priority matching, atomic settlement with seller
//! commission and buyer price-improvement refund, and cancellation.
//!
//! # Architecture
//!
//! The crate follows Clean Architecture with clear separation of
//! concerns:
//!
//! - **Domain**: Entities, value objects and pure settlement arithmetic
//! - **Application**: Use cases (place, match, cancel) and port traits
//! - **Infrastructure**: In-memory repositories, event broadcast, config
//!
//! # Example
//!
//! ```ignore
//! use matchbook::{Exchange, ExchangeConfig, PlaceOrderCommand, Side, Symbol};
//! use rust_decimal_macros::dec;
//!
//! #[tokio::main]
//! async fn main() {
//!     let exchange = Exchange::new(ExchangeConfig::default()).unwrap();
//!     let buyer = uuid::Uuid::new_v4();
//!     exchange.deposit_cash(buyer, dec!(1000)).await;
//!     let (order, trades) = exchange
//!         .place_order(buyer, PlaceOrderCommand {
//!             symbol: Symbol::Btc,
//!             side: Side::Buy,
//!             price: dec!(100),
//!             amount: dec!(1),
//!         })
//!         .await
//!         .unwrap();
//!     println!("{} filled by {} trades", order.id, trades.len());
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use domain::{
    Amount, AssetHolding, BookChangedEvent, ExchangeEvent, LedgerError, Order, OrderId,
    OrderStatus, Price, SettlementPlan, Side, Symbol, Timestamp, Trade, TradeExecutedEvent,
    TradeId, UserId,
};

pub use application::ports::{EventPublisher, LedgerRepository, OrderRepository};
pub use application::use_cases::{
    CancelError, MatchError, PlaceOrderCommand, PlaceOrderError,
};

pub use infrastructure::{
    BroadcastEventPublisher, ConfigError, ExchangeConfig, InMemoryLedgerRepository,
    InMemoryOrderRepository,
};

use application::transaction::SymbolLocks;
use application::use_cases::{CancelOrderUseCase, MatchOrderUseCase, PlaceOrderUseCase};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::broadcast;

/// A user's cash balance and asset holdings, as one snapshot.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub cash: Decimal,
    pub holdings: Vec<(Symbol, AssetHolding)>,
}

type Place =
    PlaceOrderUseCase<InMemoryLedgerRepository, InMemoryOrderRepository, BroadcastEventPublisher>;
type Match =
    MatchOrderUseCase<InMemoryLedgerRepository, InMemoryOrderRepository, BroadcastEventPublisher>;
type Cancel =
    CancelOrderUseCase<InMemoryLedgerRepository, InMemoryOrderRepository, BroadcastEventPublisher>;

/// The assembled exchange: repositories, event fan-out and the three
/// use cases wired together over in-memory infrastructure.
pub struct Exchange {
    ledger: Arc<InMemoryLedgerRepository>,
    orders: Arc<InMemoryOrderRepository>,
    publisher: Arc<BroadcastEventPublisher>,
    place: Place,
    matcher: Match,
    cancel: Cancel,
}

impl Exchange {
    pub fn new(config: ExchangeConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let ledger = Arc::new(InMemoryLedgerRepository::new());
        let orders = Arc::new(InMemoryOrderRepository::new());
        let publisher = Arc::new(BroadcastEventPublisher::new(config.event_capacity));
        let locks = Arc::new(SymbolLocks::new());

        let place = PlaceOrderUseCase::new(
            Arc::clone(&ledger),
            Arc::clone(&orders),
            Arc::clone(&publisher),
            config.limits(),
        );
        let matcher = MatchOrderUseCase::new(
            Arc::clone(&ledger),
            Arc::clone(&orders),
            Arc::clone(&publisher),
            Arc::clone(&locks),
            config.fee_rate,
        );
        let cancel = CancelOrderUseCase::new(
            Arc::clone(&ledger),
            Arc::clone(&orders),
            Arc::clone(&publisher),
            Arc::clone(&locks),
        );

        Ok(Exchange {
            ledger,
            orders,
            publisher,
            place,
            matcher,
            cancel,
        })
    }

    /// Credit cash to a user's balance (deposits, test seeding).
    pub async fn deposit_cash(&self, user: UserId, amount: Decimal) {
        self.ledger.credit(user, amount).await;
    }

    /// Credit free inventory of an asset to a user.
    pub async fn deposit_asset(&self, user: UserId, symbol: Symbol, amount: Decimal) {
        self.ledger.credit_free(user, symbol, amount).await;
    }

    /// Place a limit order and immediately run it through matching.
    ///
    /// Placement errors are returned; a matching failure after a
    /// successful placement is logged and leaves the order resting with
    /// whatever fills completed, mirroring how a deferred matching job
    /// would behave.
    pub async fn place_order(
        &self,
        user: UserId,
        command: PlaceOrderCommand,
    ) -> Result<(Order, Vec<Trade>), PlaceOrderError> {
        let order = self.place.execute(user, command).await?;
        let trades = match self.matcher.execute(order.id).await {
            Ok(trades) => trades,
            Err(e) => {
                tracing::error!(order_id = %order.id, error = %e, "matching failed");
                Vec::new()
            }
        };
        // Return the post-matching state of the order.
        let order = self.orders.get(order.id).await.unwrap_or(order);
        Ok((order, trades))
    }

    /// Re-run matching for an order, e.g. after a transient failure.
    pub async fn match_order(&self, order_id: OrderId) -> Result<Vec<Trade>, MatchError> {
        self.matcher.execute(order_id).await
    }

    /// Cancel an open order and release its reservation.
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Order, CancelError> {
        self.cancel.execute(order_id).await
    }

    /// The resting book for a symbol, ordered by price then age.
    pub async fn open_orders(&self, symbol: Symbol) -> Vec<Order> {
        self.orders.open_by_symbol(symbol).await
    }

    /// All of a user's orders, most recent first.
    pub async fn user_orders(&self, user: UserId) -> Vec<Order> {
        self.orders.by_user(user).await
    }

    /// The user's cash balance and holdings across all symbols.
    pub async fn profile(&self, user: UserId) -> UserProfile {
        let cash = self.ledger.balance(user).await;
        let mut holdings = Vec::with_capacity(Symbol::ALL.len());
        for symbol in Symbol::ALL {
            holdings.push((symbol, self.ledger.holding(user, symbol).await));
        }
        UserProfile { cash, holdings }
    }

    /// Subscribe to every event the exchange publishes.
    pub fn subscribe(&self) -> broadcast::Receiver<ExchangeEvent> {
        self.publisher.subscribe()
    }

    /// Subscribe to one symbol's events.
    pub fn subscribe_symbol(&self, symbol: Symbol) -> broadcast::Receiver<ExchangeEvent> {
        self.publisher.subscribe_symbol(symbol)
    }
}
