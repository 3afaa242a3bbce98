pub mod config;
pub mod event_publisher;
pub mod repositories;

pub use config::{ConfigError, ExchangeConfig};
pub use event_publisher::BroadcastEventPublisher;
pub use repositories::{InMemoryLedgerRepository, InMemoryOrderRepository};
