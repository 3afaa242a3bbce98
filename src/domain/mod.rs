pub mod entities;
pub mod events;
pub mod services;
pub mod value_objects;

pub use entities::{AssetHolding, LedgerError, Order, OrderStatus, Trade};
pub use events::{BookChangedEvent, ExchangeEvent, TradeExecutedEvent};
pub use services::{OrderLimits, OrderValidator, SettlementError, SettlementPlan, ValidationError};
pub use value_objects::{
    Amount, OrderId, Price, SETTLEMENT_SCALE, Side, Symbol, Timestamp, TradeId, UserId, truncate,
};
