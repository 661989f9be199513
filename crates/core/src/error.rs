//! Domain error taxonomy shared across the wallet and AML services
//!
//! Every service-level failure is a tagged [`DomainError`] with an explicit
//! [`ErrorKind`]. `casino-api` maps `ErrorKind` to an HTTP status and a
//! locale-templated detail string; internally, services match on `kind()`
//! to decide idempotent-replay vs hard-failure branches.

use serde::Serialize;
use thiserror::Error;

/// Stable, wire-safe error classification (spec.md §7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    PlayerIdMismatch,
    PlayerNotFound,
    WalletNotFound,
    TransactionNotFound,
    TransactionAlreadyProcessed,
    InsufficientFunds,
    InvalidAmount,
    InvalidCredentials,
    InternalServerError,
}

impl ErrorKind {
    /// HTTP status code this error kind maps to, per spec.md §7.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::PlayerIdMismatch => 403,
            ErrorKind::PlayerNotFound => 404,
            ErrorKind::WalletNotFound => 404,
            ErrorKind::TransactionNotFound => 404,
            ErrorKind::TransactionAlreadyProcessed => 409,
            ErrorKind::InsufficientFunds => 400,
            ErrorKind::InvalidAmount => 422,
            ErrorKind::InvalidCredentials => 401,
            ErrorKind::InternalServerError => 500,
        }
    }
}

/// A domain-level error carrying a stable [`ErrorKind`] plus a human-
/// readable detail. `Display` renders the detail; callers needing the wire
/// classification use [`DomainError::kind`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{detail}")]
pub struct DomainError {
    kind: ErrorKind,
    detail: String,
}

impl DomainError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn player_id_mismatch() -> Self {
        Self::new(ErrorKind::PlayerIdMismatch, "authenticated player does not match request player_id")
    }

    pub fn player_not_found() -> Self {
        Self::new(ErrorKind::PlayerNotFound, "player not found")
    }

    pub fn wallet_not_found() -> Self {
        Self::new(ErrorKind::WalletNotFound, "wallet not found")
    }

    pub fn transaction_not_found() -> Self {
        Self::new(ErrorKind::TransactionNotFound, "transaction not found")
    }

    pub fn transaction_already_processed() -> Self {
        Self::new(
            ErrorKind::TransactionAlreadyProcessed,
            "transaction_id already processed",
        )
    }

    pub fn insufficient_funds() -> Self {
        Self::new(ErrorKind::InsufficientFunds, "insufficient funds")
    }

    pub fn invalid_amount() -> Self {
        Self::new(ErrorKind::InvalidAmount, "amount must be positive with at most two fractional digits")
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "invalid credentials")
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalServerError, detail.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorKind::PlayerIdMismatch.http_status(), 403);
        assert_eq!(ErrorKind::TransactionAlreadyProcessed.http_status(), 409);
        assert_eq!(ErrorKind::InvalidAmount.http_status(), 422);
        assert_eq!(ErrorKind::InternalServerError.http_status(), 500);
    }

    #[test]
    fn test_constructors_set_kind() {
        assert_eq!(DomainError::wallet_not_found().kind(), ErrorKind::WalletNotFound);
        assert_eq!(DomainError::insufficient_funds().kind(), ErrorKind::InsufficientFunds);
    }
}
