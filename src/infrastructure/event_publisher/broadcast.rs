use crate::application::ports::EventPublisher;
use crate::domain::{ExchangeEvent, Symbol};
use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;

/// Event fan-out over tokio broadcast channels.
///
/// One global channel carries every event; each symbol additionally has
/// its own channel, created lazily on first use. Send errors mean no
/// subscriber is currently listening and are ignored, matching the
/// fire-and-forget contract of the port.
pub struct BroadcastEventPublisher {
    global: broadcast::Sender<ExchangeEvent>,
    per_symbol: DashMap<Symbol, broadcast::Sender<ExchangeEvent>>,
    capacity: usize,
}

impl BroadcastEventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (global, _) = broadcast::channel(capacity);
        Self {
            global,
            per_symbol: DashMap::new(),
            capacity,
        }
    }

    /// Subscribe to every event.
    pub fn subscribe(&self) -> broadcast::Receiver<ExchangeEvent> {
        self.global.subscribe()
    }

    /// Subscribe to one symbol's events.
    pub fn subscribe_symbol(&self, symbol: Symbol) -> broadcast::Receiver<ExchangeEvent> {
        self.symbol_sender(symbol).subscribe()
    }

    fn symbol_sender(&self, symbol: Symbol) -> broadcast::Sender<ExchangeEvent> {
        self.per_symbol
            .entry(symbol)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

#[async_trait]
impl EventPublisher for BroadcastEventPublisher {
    async fn publish_to_symbol(&self, symbol: Symbol, event: ExchangeEvent) {
        let _ = self.symbol_sender(symbol).send(event.clone());
        let _ = self.global.send(event);
    }
}
