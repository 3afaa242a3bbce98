use matchbook::{Exchange, ExchangeConfig, PlaceOrderCommand, Side, Symbol};
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Demo: seed two funded accounts, trade BTC between them, and print
/// the resulting book and balances.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let exchange = Exchange::new(ExchangeConfig::default())?;

    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    for user in [alice, bob] {
        exchange.deposit_cash(user, dec!(1000000)).await;
        exchange.deposit_asset(user, Symbol::Btc, dec!(10)).await;
        exchange.deposit_asset(user, Symbol::Eth, dec!(100)).await;
    }

    let (ask, _) = exchange
        .place_order(
            bob,
            PlaceOrderCommand {
                symbol: Symbol::Btc,
                side: Side::Sell,
                price: dec!(64000),
                amount: dec!(1.5),
            },
        )
        .await?;
    tracing::info!(order_id = %ask.id, "bob is asking 64000 for 1.5 BTC");

    let (bid, trades) = exchange
        .place_order(
            alice,
            PlaceOrderCommand {
                symbol: Symbol::Btc,
                side: Side::Buy,
                price: dec!(64100),
                amount: dec!(1),
            },
        )
        .await?;
    tracing::info!(order_id = %bid.id, status = ?bid.status, "alice bid 64100 for 1 BTC");

    for trade in &trades {
        println!(
            "trade: {} BTC @ {} (gross {}, fee {}, buyer refund {}, seller proceeds {})",
            trade.amount,
            trade.price,
            trade.gross_value,
            trade.fee,
            trade.buyer_refund,
            trade.seller_proceeds
        );
    }

    println!("\nresting BTC book:");
    for order in exchange.open_orders(Symbol::Btc).await {
        println!(
            "  {} {} {} @ {} ({} remaining)",
            order.id, order.side, order.amount, order.price, order.remaining
        );
    }

    for (name, user) in [("alice", alice), ("bob", bob)] {
        let profile = exchange.profile(user).await;
        println!("\n{name}: {} USD", profile.cash);
        for (symbol, holding) in profile.holdings {
            println!(
                "  {symbol}: {} free, {} locked",
                holding.free, holding.locked
            );
        }
    }

    Ok(())
}
