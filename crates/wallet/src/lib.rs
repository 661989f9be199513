//! WalletService (C3): idempotent debit/credit/cancel, balance reads,
//! per-player serialization via the store's row lock (spec.md §4.3).

pub mod service;
pub mod types;

pub use service::WalletService;
pub use types::{BalanceResult, CancelResult, MutationContext, MutationResult};
