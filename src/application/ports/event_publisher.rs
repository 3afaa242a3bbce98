use crate::domain::{ExchangeEvent, Symbol};
use async_trait::async_trait;

/// Notification sink for domain events.
///
/// Fire-and-forget: publishing never fails from the caller's point of
/// view, and delivery problems must not roll back the transaction that
/// produced the event.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish to subscribers of one symbol (and to the global feed).
    async fn publish_to_symbol(&self, symbol: Symbol, event: ExchangeEvent);
}
