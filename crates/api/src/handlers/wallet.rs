//! Wallet mutation/read endpoints (spec.md §4.6, §6).

use axum::extract::State;
use axum::Json;
use casino_core::DomainError;
use casino_scheduler::schedule_aml_task;
use casino_wallet::MutationContext;

use crate::auth::Credential;
use crate::dto::{
    BalanceRequest, BalanceResponse, CancelRequest, CancelResponse, CheckRequest, CheckResponse,
    MutationRequest, MutationResponse,
};
use crate::error::ApiError;
use crate::locale::Locale;
use crate::state::AppState;

fn require_blank_free(value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid_amount());
    }
    Ok(())
}

/// Enforces spec.md §4.6 step 3: the body's `player_id` must match the
/// authenticated credential unless the credential carries the admin role.
fn authorize_player(cred: &Credential, body_player_id: &str) -> Result<(), DomainError> {
    if cred.is_admin || cred.player_id == body_player_id {
        Ok(())
    } else {
        Err(DomainError::player_id_mismatch())
    }
}

/// Fire-and-forget AML analysis of the transaction just committed (spec.md
/// §4.6 step 5, §4.7). Failure never reaches the caller; `AmlService`
/// itself swallows and logs via `analyze_transaction_best_effort`.
fn schedule_async_analysis(state: &AppState, transaction_id: &str) {
    let aml = state.aml.clone();
    let transaction_id = transaction_id.to_string();
    schedule_aml_task(async move {
        aml.analyze_transaction_best_effort(&transaction_id).await;
    });
}

pub async fn balance(
    State(state): State<AppState>,
    cred: Credential,
    locale: Locale,
    Json(req): Json<BalanceRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    authorize_player(&cred, &req.player_id).map_err(|e| ApiError::from(e).with_locale(&locale.0))?;

    let result = state
        .wallet
        .balance(&req.player_id)
        .await
        .map_err(|e| ApiError::from(e).with_locale(&locale.0))?;

    Ok(Json(BalanceResponse {
        status: "ok",
        balance: result.balance,
        currency: result.currency,
        uuid: req.uuid,
        player_id: req.player_id,
        cache_hit: result.cache_hit,
    }))
}

pub async fn check(
    State(state): State<AppState>,
    cred: Credential,
    locale: Locale,
    Json(req): Json<CheckRequest>,
) -> Result<Json<CheckResponse>, ApiError> {
    authorize_player(&cred, &req.player_id).map_err(|e| ApiError::from(e).with_locale(&locale.0))?;

    state
        .wallet
        .check(&req.player_id)
        .await
        .map_err(|e| ApiError::from(e).with_locale(&locale.0))?;

    Ok(Json(CheckResponse {
        status: "ok",
        uuid: req.uuid,
        player_id: req.player_id,
    }))
}

pub async fn debit(
    State(state): State<AppState>,
    cred: Credential,
    locale: Locale,
    Json(req): Json<MutationRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    authorize_player(&cred, &req.player_id).map_err(|e| ApiError::from(e).with_locale(&locale.0))?;
    require_blank_free(&req.transaction_id).map_err(|e| ApiError::from(e).with_locale(&locale.0))?;

    let ctx = MutationContext {
        provider: req.provider,
        game_id: req.game_id,
        session_id: req.session_id,
        metadata: req.metadata,
    };

    let result = state
        .wallet
        .debit(&req.player_id, req.amount, &req.transaction_id, ctx)
        .await
        .map_err(|e| ApiError::from(e).with_locale(&locale.0))?;

    schedule_async_analysis(&state, &result.transaction_id);

    Ok(Json(MutationResponse {
        status: "ok",
        balance: result.balance,
        currency: result.currency,
        transaction_id: result.transaction_id,
        uuid: req.uuid,
        player_id: req.player_id,
    }))
}

pub async fn credit(
    State(state): State<AppState>,
    cred: Credential,
    locale: Locale,
    Json(req): Json<MutationRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    authorize_player(&cred, &req.player_id).map_err(|e| ApiError::from(e).with_locale(&locale.0))?;
    require_blank_free(&req.transaction_id).map_err(|e| ApiError::from(e).with_locale(&locale.0))?;

    let ctx = MutationContext {
        provider: req.provider,
        game_id: req.game_id,
        session_id: req.session_id,
        metadata: req.metadata,
    };

    let result = state
        .wallet
        .credit(&req.player_id, req.amount, &req.transaction_id, ctx)
        .await
        .map_err(|e| ApiError::from(e).with_locale(&locale.0))?;

    schedule_async_analysis(&state, &result.transaction_id);

    Ok(Json(MutationResponse {
        status: "ok",
        balance: result.balance,
        currency: result.currency,
        transaction_id: result.transaction_id,
        uuid: req.uuid,
        player_id: req.player_id,
    }))
}

pub async fn cancel(
    State(state): State<AppState>,
    cred: Credential,
    locale: Locale,
    Json(req): Json<CancelRequest>,
) -> Result<Json<CancelResponse>, ApiError> {
    authorize_player(&cred, &req.player_id).map_err(|e| ApiError::from(e).with_locale(&locale.0))?;
    require_blank_free(&req.transaction_id).map_err(|e| ApiError::from(e).with_locale(&locale.0))?;

    let result = state
        .wallet
        .cancel(&req.player_id, &req.transaction_id, &req.original_transaction_id)
        .await
        .map_err(|e| ApiError::from(e).with_locale(&locale.0))?;

    Ok(Json(CancelResponse {
        status: "ok",
        balance: result.balance,
        currency: result.currency,
        transaction_id: result.transaction_id,
        original_transaction_id: result.ref_transaction_id,
        uuid: req.uuid,
        player_id: req.player_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use casino_core::ErrorKind;

    fn cred(player_id: &str, is_admin: bool) -> Credential {
        Credential {
            player_id: player_id.to_string(),
            is_admin,
        }
    }

    #[test]
    fn require_blank_free_rejects_empty_and_whitespace() {
        assert!(require_blank_free("").is_err());
        assert!(require_blank_free("   ").is_err());
    }

    #[test]
    fn require_blank_free_accepts_non_blank() {
        assert!(require_blank_free("txn-1").is_ok());
    }

    #[test]
    fn authorize_player_allows_matching_player_id() {
        assert!(authorize_player(&cred("p1", false), "p1").is_ok());
    }

    #[test]
    fn authorize_player_rejects_mismatched_non_admin() {
        let err = authorize_player(&cred("p1", false), "p2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PlayerIdMismatch);
    }

    #[test]
    fn authorize_player_allows_admin_regardless_of_player_id() {
        assert!(authorize_player(&cred("admin-session", true), "p2").is_ok());
    }
}
