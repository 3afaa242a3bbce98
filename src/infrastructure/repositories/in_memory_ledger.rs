use crate::application::ports::LedgerRepository;
use crate::domain::{AssetHolding, LedgerError, Symbol, UserId};
use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;

/// In-memory ledger backed by concurrent maps.
///
/// Each method runs against a single map entry while holding its shard
/// lock, which gives the row-level atomicity the port requires: a check
/// and its mutation cannot be separated by another writer.
pub struct InMemoryLedgerRepository {
    cash: DashMap<UserId, Decimal>,
    holdings: DashMap<(UserId, Symbol), AssetHolding>,
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self {
            cash: DashMap::new(),
            holdings: DashMap::new(),
        }
    }
}

impl Default for InMemoryLedgerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn balance(&self, user: UserId) -> Decimal {
        self.cash.get(&user).map(|b| *b).unwrap_or(Decimal::ZERO)
    }

    async fn credit(&self, user: UserId, amount: Decimal) {
        *self.cash.entry(user).or_insert(Decimal::ZERO) += amount;
    }

    async fn try_debit(&self, user: UserId, amount: Decimal) -> Result<(), LedgerError> {
        let mut balance = self.cash.entry(user).or_insert(Decimal::ZERO);
        if *balance < amount {
            return Err(LedgerError::InsufficientFunds);
        }
        *balance -= amount;
        Ok(())
    }

    async fn holding(&self, user: UserId, symbol: Symbol) -> AssetHolding {
        self.holdings
            .get(&(user, symbol))
            .map(|h| *h)
            .unwrap_or_default()
    }

    async fn credit_free(&self, user: UserId, symbol: Symbol, amount: Decimal) {
        self.holdings
            .entry((user, symbol))
            .or_default()
            .credit_free(amount);
    }

    async fn try_lock(
        &self,
        user: UserId,
        symbol: Symbol,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        // No holding row means no inventory: a client rejection, unlike
        // the unlock/consume paths where the row is expected to exist.
        let mut holding = self
            .holdings
            .get_mut(&(user, symbol))
            .ok_or(LedgerError::InsufficientInventory)?;
        holding.lock(amount)
    }

    async fn unlock(
        &self,
        user: UserId,
        symbol: Symbol,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let mut holding = self
            .holdings
            .get_mut(&(user, symbol))
            .ok_or(LedgerError::HoldingMissing)?;
        holding.unlock(amount)
    }

    async fn consume_locked(
        &self,
        user: UserId,
        symbol: Symbol,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let mut holding = self
            .holdings
            .get_mut(&(user, symbol))
            .ok_or(LedgerError::HoldingMissing)?;
        holding.consume_locked(amount)
    }
}
