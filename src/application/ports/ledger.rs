use crate::domain::{AssetHolding, LedgerError, Symbol, UserId};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Access to a user's cash balance and per-symbol asset holdings.
///
/// Every method is an atomic read-modify-write of one ledger row: the
/// implementation must hold row-level exclusivity for the duration of
/// the mutation, and a failed check leaves the row untouched.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Current cash balance. Missing users read as zero.
    async fn balance(&self, user: UserId) -> Decimal;

    /// Add cash unconditionally (deposits, refunds, proceeds).
    async fn credit(&self, user: UserId, amount: Decimal);

    /// Remove cash if the balance covers it; otherwise
    /// `LedgerError::InsufficientFunds` and no change.
    async fn try_debit(&self, user: UserId, amount: Decimal) -> Result<(), LedgerError>;

    /// Current holding for a symbol. Missing holdings read as all-zero.
    async fn holding(&self, user: UserId, symbol: Symbol) -> AssetHolding;

    /// Add free inventory, creating the holding row on first use.
    async fn credit_free(&self, user: UserId, symbol: Symbol, amount: Decimal);

    /// Reserve free inventory under an open sell order; rejects with
    /// `LedgerError::InsufficientInventory` when the free amount is
    /// short.
    async fn try_lock(&self, user: UserId, symbol: Symbol, amount: Decimal)
    -> Result<(), LedgerError>;

    /// Return locked inventory to free on cancellation. A missing
    /// holding row is a data inconsistency (`HoldingMissing`), not a
    /// no-op.
    async fn unlock(&self, user: UserId, symbol: Symbol, amount: Decimal)
    -> Result<(), LedgerError>;

    /// Extinguish locked inventory delivered at settlement. Missing or
    /// underfunded holdings fail loudly for the same reason as `unlock`.
    async fn consume_locked(
        &self,
        user: UserId,
        symbol: Symbol,
        amount: Decimal,
    ) -> Result<(), LedgerError>;
}
