//! `POST /ua/v1/{casino_key}/{api_token}` (spec.md §6 "Authentication
//! (bootstrap)"). Registers the player on first appearance and mints the
//! bearer token the rest of the surface expects.

use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use crate::dto::{BootstrapEntry, BootstrapRequest, BootstrapResponse};
use crate::error::ApiError;
use crate::locale::Locale;
use crate::state::AppState;

pub async fn bootstrap(
    State(state): State<AppState>,
    Path((casino_key, _api_token)): Path<(String, String)>,
    locale: Locale,
    Json(req): Json<BootstrapRequest>,
) -> Result<Json<BootstrapResponse>, ApiError> {
    info!(casino_key, uuid = %req.uuid, player_id = %req.player.id, "bootstrap request");

    let mut session = state.store.session().await.map_err(ApiError::from)?;
    session
        .upsert_player(
            &req.player.id,
            &req.player.first_name,
            &req.player.last_name,
            &req.player.country,
            &req.player.currency,
        )
        .await
        .map_err(ApiError::from)?;
    session
        .commit()
        .await
        .map_err(|e| ApiError::from(e).with_locale(&locale.0))?;

    let token = state
        .jwt
        .issue(&req.player.id, false)
        .map_err(ApiError::from)?;

    let entry = BootstrapEntry {
        params: format!("params={token}"),
    };

    Ok(Json(BootstrapResponse {
        entry: entry.clone(),
        entry_embedded: entry,
    }))
}
