mod event_publisher;
mod ledger;
mod order_repository;

pub use event_publisher::EventPublisher;
pub use ledger::LedgerRepository;
pub use order_repository::OrderRepository;
