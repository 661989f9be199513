//! WalletService (C3): idempotent debit/credit/cancel, balance reads
//! (spec.md §4.3)
//!
//! Every mutating operation opens exactly one `StoreSession`, locks the
//! wallet row, mutates, writes the ledger entry, and commits as a unit.
//! Cache invalidation and event publication are scheduled after commit,
//! never before — a reader observing a stale cache value mid-mutation is
//! acceptable because every mutation path reads from the store with
//! `for_update`, never from the cache (spec.md §5).

use std::sync::Arc;

use casino_cache::Cache;
use casino_core::{Amount, Currency, DomainError};
use casino_events::{DomainEvent, EventBus};
use casino_scheduler::{schedule_cache_task, schedule_event_task};
use casino_store::{NewTransaction, StoreError, StorePool, TransactionStatus, TransactionType};
use rust_decimal::Decimal;
use serde_json::Value as Json;
use tracing::instrument;

use crate::types::{BalanceResult, CancelResult, MutationContext, MutationResult};

pub struct WalletService {
    store: StorePool,
    cache: Arc<Cache>,
    events: Arc<EventBus>,
}

impl WalletService {
    pub fn new(store: StorePool, cache: Arc<Cache>, events: Arc<EventBus>) -> Self {
        Self { store, cache, events }
    }

    /// `check(player_id) → ok | not_found`. Side-effect-free.
    #[instrument(skip(self))]
    pub async fn check(&self, player_id: &str) -> Result<(), DomainError> {
        let mut session = self.store.session().await.map_err(store_err)?;
        let wallet = session.get_wallet(player_id, false).await.map_err(store_err)?;
        session.rollback().await.map_err(store_err)?;
        wallet.map(|_| ()).ok_or_else(DomainError::wallet_not_found)
    }

    /// `balance(player_id) → {balance, currency, cache_hit}`.
    #[instrument(skip(self))]
    pub async fn balance(&self, player_id: &str) -> Result<BalanceResult, DomainError> {
        if let Some((cached, _)) = self.cache.get_wallet(player_id).await {
            return Ok(BalanceResult {
                balance: cached.balance,
                currency: cached.currency,
                cache_hit: true,
            });
        }

        let mut session = self.store.session().await.map_err(store_err)?;
        let wallet = session.get_wallet(player_id, false).await.map_err(store_err)?;
        session.rollback().await.map_err(store_err)?;

        let wallet = wallet.ok_or_else(DomainError::wallet_not_found)?;

        let cache = self.cache.clone();
        let player_id_owned = player_id.to_string();
        let balance = wallet.balance;
        let currency = wallet.currency.clone();
        schedule_cache_task(async move {
            cache.put_wallet(&player_id_owned, balance, &currency).await;
        });

        Ok(BalanceResult {
            balance: wallet.balance,
            currency: wallet.currency,
            cache_hit: false,
        })
    }

    /// `debit(player_id, amount, transaction_id, metadata?)`. NOT
    /// replayable: a duplicate `transaction_id` always fails.
    #[instrument(skip(self, ctx))]
    pub async fn debit(
        &self,
        player_id: &str,
        amount: Decimal,
        transaction_id: &str,
        ctx: MutationContext,
    ) -> Result<MutationResult, DomainError> {
        validate_amount(amount)?;

        let mut session = self.store.session().await.map_err(store_err)?;

        if session
            .find_transaction_by_id(transaction_id)
            .await
            .map_err(store_err)?
            .is_some()
        {
            session.rollback().await.map_err(store_err)?;
            return Err(DomainError::transaction_already_processed());
        }

        let wallet = match session.get_wallet(player_id, true).await.map_err(store_err)? {
            Some(w) => w,
            None => {
                session.rollback().await.map_err(store_err)?;
                return Err(DomainError::wallet_not_found());
            }
        };

        if wallet.balance < amount {
            session.rollback().await.map_err(store_err)?;
            return Err(DomainError::insufficient_funds());
        }

        let original_balance = wallet.balance;
        let updated_balance = original_balance - amount;

        session
            .set_wallet_balance(player_id, updated_balance)
            .await
            .map_err(store_err)?;

        let inserted = session
            .insert_transaction(NewTransaction {
                transaction_id,
                player_id,
                transaction_type: TransactionType::Debit,
                amount,
                currency: &wallet.currency,
                original_balance,
                updated_balance,
                ref_transaction_id: None,
                provider: ctx.provider.as_deref(),
                game_id: ctx.game_id.as_deref(),
                session_id: ctx.session_id.as_deref(),
                metadata: ctx.metadata.unwrap_or_else(|| Json::Object(Default::default())),
            })
            .await;

        let inserted = match inserted {
            Ok(tx) => tx,
            Err(err) if err.is_unique_violation() => {
                session.rollback().await.map_err(store_err)?;
                return Err(DomainError::transaction_already_processed());
            }
            Err(err) => {
                session.rollback().await.map_err(store_err)?;
                return Err(store_err(err));
            }
        };

        if let Err(err) = session.commit().await {
            if err.is_unique_violation() {
                return Err(DomainError::transaction_already_processed());
            }
            return Err(store_err(err));
        }

        self.schedule_post_commit(player_id);

        Ok(MutationResult {
            balance: updated_balance,
            currency: wallet.currency,
            transaction_id: inserted.transaction_id,
        })
    }

    /// `credit(player_id, amount, transaction_id, metadata?)`. Idempotent
    /// on a duplicate `transaction_id` that is itself a completed credit
    /// for this player; auto-creates the wallet if missing.
    #[instrument(skip(self, ctx))]
    pub async fn credit(
        &self,
        player_id: &str,
        amount: Decimal,
        transaction_id: &str,
        ctx: MutationContext,
    ) -> Result<MutationResult, DomainError> {
        validate_amount(amount)?;

        let mut session = self.store.session().await.map_err(store_err)?;

        if let Some(existing) = session.find_transaction_by_id(transaction_id).await.map_err(store_err)? {
            session.rollback().await.map_err(store_err)?;
            if existing.player_id == player_id
                && matches!(existing.transaction_type, TransactionType::Credit)
                && matches!(existing.status, TransactionStatus::Completed)
            {
                return Ok(MutationResult {
                    balance: existing.updated_balance,
                    currency: existing.currency,
                    transaction_id: existing.transaction_id,
                });
            }
            return Err(DomainError::transaction_already_processed());
        }

        let player = session.get_player(player_id).await.map_err(store_err)?;

        let wallet = match session.get_wallet(player_id, true).await.map_err(store_err)? {
            Some(w) => w,
            None => {
                let currency = player
                    .map(|p| p.currency)
                    .unwrap_or_else(|| Currency::Usd.code().to_string());
                session.create_wallet(player_id, &currency).await.map_err(store_err)?
            }
        };

        let original_balance = wallet.balance;
        let updated_balance = original_balance + amount;

        session
            .set_wallet_balance(player_id, updated_balance)
            .await
            .map_err(store_err)?;

        let inserted = session
            .insert_transaction(NewTransaction {
                transaction_id,
                player_id,
                transaction_type: TransactionType::Credit,
                amount,
                currency: &wallet.currency,
                original_balance,
                updated_balance,
                ref_transaction_id: None,
                provider: ctx.provider.as_deref(),
                game_id: ctx.game_id.as_deref(),
                session_id: ctx.session_id.as_deref(),
                metadata: ctx.metadata.unwrap_or_else(|| Json::Object(Default::default())),
            })
            .await;

        let inserted = match inserted {
            Ok(tx) => tx,
            Err(err) if err.is_unique_violation() => {
                session.rollback().await.map_err(store_err)?;
                return Err(DomainError::transaction_already_processed());
            }
            Err(err) => {
                session.rollback().await.map_err(store_err)?;
                return Err(store_err(err));
            }
        };

        if let Err(err) = session.commit().await {
            if err.is_unique_violation() {
                return Err(DomainError::transaction_already_processed());
            }
            return Err(store_err(err));
        }

        self.schedule_post_commit(player_id);

        Ok(MutationResult {
            balance: updated_balance,
            currency: wallet.currency,
            transaction_id: inserted.transaction_id,
        })
    }

    /// `cancel(player_id, cancel_transaction_id, ref_transaction_id)`.
    /// Reverses a completed debit/credit; idempotent on a repeat cancel
    /// of the same `ref_transaction_id`.
    #[instrument(skip(self))]
    pub async fn cancel(
        &self,
        player_id: &str,
        cancel_transaction_id: &str,
        ref_transaction_id: &str,
    ) -> Result<CancelResult, DomainError> {
        let mut session = self.store.session().await.map_err(store_err)?;

        let reference = session
            .find_transaction_by_id(ref_transaction_id)
            .await
            .map_err(store_err)?;

        let reference = match reference {
            Some(tx) if tx.player_id == player_id => tx,
            _ => {
                session.rollback().await.map_err(store_err)?;
                return Err(DomainError::transaction_not_found());
            }
        };

        if !matches!(reference.status, TransactionStatus::Completed)
            || matches!(reference.transaction_type, TransactionType::Cancel)
        {
            session.rollback().await.map_err(store_err)?;
            return Err(DomainError::transaction_already_processed());
        }

        if let Some(prior_cancel) = session
            .find_cancel_for_ref(&reference.transaction_id)
            .await
            .map_err(store_err)?
        {
            session.rollback().await.map_err(store_err)?;
            return Ok(CancelResult {
                balance: prior_cancel.updated_balance,
                currency: prior_cancel.currency,
                transaction_id: prior_cancel.transaction_id,
                ref_transaction_id: reference.transaction_id,
            });
        }

        if let Some(existing) = session
            .find_transaction_by_id(cancel_transaction_id)
            .await
            .map_err(store_err)?
        {
            session.rollback().await.map_err(store_err)?;
            let _ = existing;
            return Err(DomainError::transaction_already_processed());
        }

        let wallet = match session.get_wallet(player_id, true).await.map_err(store_err)? {
            Some(w) => w,
            None => {
                session.rollback().await.map_err(store_err)?;
                return Err(DomainError::wallet_not_found());
            }
        };

        let original_balance = wallet.balance;
        let updated_balance = match reference.transaction_type {
            TransactionType::Debit => original_balance + reference.amount,
            TransactionType::Credit => {
                let candidate = original_balance - reference.amount;
                if candidate < Decimal::ZERO {
                    session.rollback().await.map_err(store_err)?;
                    return Err(DomainError::insufficient_funds());
                }
                candidate
            }
            TransactionType::Cancel => unreachable!("filtered out above"),
        };

        session
            .set_wallet_balance(player_id, updated_balance)
            .await
            .map_err(store_err)?;

        let inserted = session
            .insert_transaction(NewTransaction {
                transaction_id: cancel_transaction_id,
                player_id,
                transaction_type: TransactionType::Cancel,
                amount: reference.amount,
                currency: &wallet.currency,
                original_balance,
                updated_balance,
                ref_transaction_id: Some(&reference.transaction_id),
                provider: None,
                game_id: None,
                session_id: None,
                metadata: Json::Object(Default::default()),
            })
            .await;

        let inserted = match inserted {
            Ok(tx) => tx,
            Err(err) if err.is_unique_violation() => {
                session.rollback().await.map_err(store_err)?;
                return Err(DomainError::transaction_already_processed());
            }
            Err(err) => {
                session.rollback().await.map_err(store_err)?;
                return Err(store_err(err));
            }
        };

        session
            .flip_transaction_canceled(&reference.transaction_id)
            .await
            .map_err(store_err)?;

        if let Err(err) = session.commit().await {
            if err.is_unique_violation() {
                return Err(DomainError::transaction_already_processed());
            }
            return Err(store_err(err));
        }

        self.schedule_post_commit(player_id);

        Ok(CancelResult {
            balance: updated_balance,
            currency: wallet.currency,
            transaction_id: inserted.transaction_id,
            ref_transaction_id: reference.transaction_id,
        })
    }

    fn schedule_post_commit(&self, player_id: &str) {
        let cache = self.cache.clone();
        let player_id_owned = player_id.to_string();
        schedule_cache_task(async move {
            cache.invalidate_wallet(&player_id_owned).await;
        });

        let events = self.events.clone();
        let player_id_owned = player_id.to_string();
        schedule_event_task(async move {
            events.publish(&DomainEvent::wallet_updated(player_id_owned)).await;
        });
    }
}

fn store_err(err: StoreError) -> DomainError {
    DomainError::internal(err.to_string())
}

/// `invalid_amount` fires on non-positive amounts or wrong precision
/// (spec.md §7), validated before any session is opened.
fn validate_amount(amount: Decimal) -> Result<(), DomainError> {
    let amount = Amount::new(amount).map_err(|_| DomainError::invalid_amount())?;
    if !amount.is_positive() {
        return Err(DomainError::invalid_amount());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use casino_core::ErrorKind;

    #[test]
    fn validate_amount_rejects_zero() {
        let err = validate_amount(Decimal::ZERO).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);
    }

    #[test]
    fn validate_amount_rejects_negative() {
        let err = validate_amount(Decimal::new(-100, 2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);
    }

    #[test]
    fn validate_amount_rejects_over_precise_value() {
        // 10.005 has three significant fractional digits.
        let err = validate_amount(Decimal::new(10005, 3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);
    }

    #[test]
    fn validate_amount_accepts_positive_two_decimal_amount() {
        assert!(validate_amount(Decimal::new(1050, 2)).is_ok());
    }
}
