//! Per-symbol transaction serialization.
//!
//! Matching and cancellation read order rows, compute, and write them
//! back; two such transactions touching the same symbol must not
//! interleave. One exclusive lock per symbol serializes them while
//! letting independent symbols proceed concurrently. The lock is held
//! for exactly one transaction (one match step or one cancellation), so
//! a long fill sequence yields between steps and competing work on the
//! same book gets a turn.

use crate::domain::Symbol;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct SymbolLocks {
    locks: DashMap<Symbol, Arc<Mutex<()>>>,
}

impl SymbolLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the exclusive transaction lock for a symbol. The guard
    /// releases on drop; hold it only for one transaction.
    pub async fn acquire(&self, symbol: Symbol) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(symbol)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
