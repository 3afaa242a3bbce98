use crate::domain::{Order, OrderId, Symbol, UserId};
use async_trait::async_trait;

/// Durable, queryable collection of orders.
///
/// The store owns the order rows; use cases fetch snapshots, mutate
/// them inside a symbol transaction, and write them back with `update`.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn get(&self, id: OrderId) -> Option<Order>;

    async fn insert(&self, order: Order);

    /// Replace the stored row for `order.id`.
    async fn update(&self, order: Order);

    /// Best eligible counter-order for `order`: OPEN, opposite side,
    /// same symbol, different owner, remaining amount > 0 and
    /// price-compatible. Best price wins (lowest sell for a buy,
    /// highest buy for a sell); ties go to the earliest `created_at`.
    async fn find_best_counter(&self, order: &Order) -> Option<Order>;

    /// OPEN orders for a symbol, ordered by price then age.
    async fn open_by_symbol(&self, symbol: Symbol) -> Vec<Order>;

    /// All of a user's orders, most recent first.
    async fn by_user(&self, user: UserId) -> Vec<Order>;
}
