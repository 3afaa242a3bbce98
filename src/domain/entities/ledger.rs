//! Per-user ledger rows: the cash balance and per-symbol asset holdings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by ledger mutations.
///
/// The first two are ordinary client rejections. The latter two signal
/// data inconsistency: inventory that should be locked is not there, and
/// the operation must fail loudly rather than settle a trade or cancel an
/// order on top of corrupt state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient USD balance")]
    InsufficientFunds,

    #[error("Insufficient asset balance")]
    InsufficientInventory,

    #[error("Asset holding record is missing")]
    HoldingMissing,

    #[error("Locked amount is smaller than the amount to release")]
    LockedUnderflow,
}

/// A user's inventory of one asset, split into the freely tradeable part
/// and the part locked under open sell orders.
///
/// Invariant: `free + locked` is the user's true total; `locked` equals
/// the summed remaining amount of the user's OPEN sell orders in this
/// symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AssetHolding {
    pub free: Decimal,
    pub locked: Decimal,
}

impl AssetHolding {
    pub fn total(&self) -> Decimal {
        self.free + self.locked
    }

    pub fn credit_free(&mut self, amount: Decimal) {
        self.free += amount;
    }

    /// Move inventory from free to locked when a sell order is placed.
    pub fn lock(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if self.free < amount {
            return Err(LedgerError::InsufficientInventory);
        }
        self.free -= amount;
        self.locked += amount;
        Ok(())
    }

    /// Move inventory back from locked to free when a sell order is
    /// cancelled.
    pub fn unlock(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if self.locked < amount {
            return Err(LedgerError::LockedUnderflow);
        }
        self.locked -= amount;
        self.free += amount;
        Ok(())
    }

    /// Extinguish locked inventory delivered to a buyer at settlement.
    pub fn consume_locked(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if self.locked < amount {
            return Err(LedgerError::LockedUnderflow);
        }
        self.locked -= amount;
        Ok(())
    }
}
