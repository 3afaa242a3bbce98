mod ledger;
mod order;
mod trade;

pub use ledger::{AssetHolding, LedgerError};
pub use order::{Order, OrderStatus};
pub use trade::Trade;
