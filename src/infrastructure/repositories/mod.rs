mod in_memory_ledger;
mod in_memory_order;

pub use in_memory_ledger::InMemoryLedgerRepository;
pub use in_memory_order::InMemoryOrderRepository;
