use crate::application::ports::OrderRepository;
use crate::domain::{Order, OrderId, Side, Symbol, UserId};
use async_trait::async_trait;
use dashmap::DashMap;

/// In-memory order store.
///
/// Queries scan the full map; the symbol transaction held by the use
/// cases serializes writers per symbol, so a scan inside a transaction
/// sees a consistent book for that symbol.
pub struct InMemoryOrderRepository {
    orders: DashMap<OrderId, Order>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
        }
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Maker preference between two eligible counter-orders: better price
/// first, then earlier placement, then id as a stable final tie-break.
fn better_counter(side: Side, a: &Order, b: &Order) -> std::cmp::Ordering {
    let by_price = match side {
        // Counter-orders to a buy are sells: lowest ask first.
        Side::Buy => a.price.cmp(&b.price),
        // Counter-orders to a sell are buys: highest bid first.
        Side::Sell => b.price.cmp(&a.price),
    };
    by_price
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn get(&self, id: OrderId) -> Option<Order> {
        self.orders.get(&id).map(|o| o.clone())
    }

    async fn insert(&self, order: Order) {
        self.orders.insert(order.id, order);
    }

    async fn update(&self, order: Order) {
        self.orders.insert(order.id, order);
    }

    async fn find_best_counter(&self, order: &Order) -> Option<Order> {
        let counter_side = order.side.opposite();
        self.orders
            .iter()
            .filter(|entry| {
                let o = entry.value();
                o.symbol == order.symbol
                    && o.side == counter_side
                    && o.user_id != order.user_id
                    && o.is_open()
                    && !o.remaining.is_zero()
                    && order.crosses(o)
            })
            .map(|entry| entry.value().clone())
            .min_by(|a, b| better_counter(order.side, a, b))
    }

    async fn open_by_symbol(&self, symbol: Symbol) -> Vec<Order> {
        let mut open: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| entry.value().symbol == symbol && entry.value().is_open())
            .map(|entry| entry.value().clone())
            .collect();
        open.sort_by(|a, b| {
            a.price
                .cmp(&b.price)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        open
    }

    async fn by_user(&self, user: UserId) -> Vec<Order> {
        let mut mine: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| entry.value().user_id == user)
            .map(|entry| entry.value().clone())
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        mine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, Price};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn order(side: Side, price: Decimal, amount: Decimal) -> Order {
        Order::new(
            Uuid::new_v4(),
            Symbol::Btc,
            side,
            Price::new(price).unwrap(),
            Amount::new(amount).unwrap(),
        )
    }

    #[tokio::test]
    async fn best_counter_for_buy_is_lowest_sell() {
        let repo = InMemoryOrderRepository::new();
        let cheap = order(Side::Sell, dec!(98), dec!(1));
        let dear = order(Side::Sell, dec!(99), dec!(1));
        repo.insert(dear.clone()).await;
        repo.insert(cheap.clone()).await;

        let buy = order(Side::Buy, dec!(100), dec!(1));
        let best = repo.find_best_counter(&buy).await.unwrap();
        assert_eq!(best.id, cheap.id);
    }

    #[tokio::test]
    async fn best_counter_for_sell_is_highest_buy() {
        let repo = InMemoryOrderRepository::new();
        let low = order(Side::Buy, dec!(100), dec!(1));
        let high = order(Side::Buy, dec!(102), dec!(1));
        repo.insert(low).await;
        repo.insert(high.clone()).await;

        let sell = order(Side::Sell, dec!(99), dec!(1));
        let best = repo.find_best_counter(&sell).await.unwrap();
        assert_eq!(best.id, high.id);
    }

    #[tokio::test]
    async fn equal_prices_resolve_by_age() {
        let repo = InMemoryOrderRepository::new();
        let first = order(Side::Sell, dec!(100), dec!(1));
        let mut second = order(Side::Sell, dec!(100), dec!(1));
        second.created_at = first.created_at + chrono::Duration::milliseconds(1);
        repo.insert(second).await;
        repo.insert(first.clone()).await;

        let buy = order(Side::Buy, dec!(100), dec!(1));
        let best = repo.find_best_counter(&buy).await.unwrap();
        assert_eq!(best.id, first.id);
    }

    #[tokio::test]
    async fn own_orders_are_never_counters() {
        let repo = InMemoryOrderRepository::new();
        let user = Uuid::new_v4();
        let mut sell = order(Side::Sell, dec!(100), dec!(1));
        sell.user_id = user;
        repo.insert(sell).await;

        let mut buy = order(Side::Buy, dec!(100), dec!(1));
        buy.user_id = user;
        assert!(repo.find_best_counter(&buy).await.is_none());
    }

    #[tokio::test]
    async fn non_crossing_prices_are_excluded() {
        let repo = InMemoryOrderRepository::new();
        repo.insert(order(Side::Sell, dec!(101), dec!(1))).await;

        let buy = order(Side::Buy, dec!(100), dec!(1));
        assert!(repo.find_best_counter(&buy).await.is_none());
    }

    #[tokio::test]
    async fn closed_orders_are_excluded_from_book() {
        let repo = InMemoryOrderRepository::new();
        let mut cancelled = order(Side::Sell, dec!(100), dec!(1));
        cancelled.cancel(chrono::Utc::now());
        repo.insert(cancelled).await;
        let open = order(Side::Sell, dec!(100), dec!(1));
        repo.insert(open.clone()).await;

        let book = repo.open_by_symbol(Symbol::Btc).await;
        assert_eq!(book.len(), 1);
        assert_eq!(book[0].id, open.id);

        let buy = order(Side::Buy, dec!(100), dec!(1));
        assert_eq!(repo.find_best_counter(&buy).await.unwrap().id, open.id);
    }

    #[tokio::test]
    async fn by_user_returns_most_recent_first() {
        let repo = InMemoryOrderRepository::new();
        let user = Uuid::new_v4();
        let mut older = order(Side::Buy, dec!(100), dec!(1));
        older.user_id = user;
        let mut newer = order(Side::Buy, dec!(101), dec!(1));
        newer.user_id = user;
        newer.created_at = older.created_at + chrono::Duration::seconds(1);
        repo.insert(older.clone()).await;
        repo.insert(newer.clone()).await;

        let mine = repo.by_user(user).await;
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, newer.id);
        assert_eq!(mine[1].id, older.id);
    }
}
