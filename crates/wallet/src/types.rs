//! Request/response shapes for WalletService operations (spec.md §4.3)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResult {
    pub balance: Decimal,
    pub currency: String,
    pub cache_hit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResult {
    pub balance: Decimal,
    pub currency: String,
    pub transaction_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResult {
    pub balance: Decimal,
    pub currency: String,
    pub transaction_id: String,
    pub ref_transaction_id: String,
}

/// Optional request context carried through for ledger enrichment; none of
/// these participate in idempotency or balance math.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MutationContext {
    pub provider: Option<String>,
    pub game_id: Option<String>,
    pub session_id: Option<String>,
    pub metadata: Option<Json>,
}
