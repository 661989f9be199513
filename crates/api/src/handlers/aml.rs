//! AML endpoints (spec.md §4.6, §6). Every route here requires the
//! `admin` role.

use axum::extract::{Path, Query, State};
use axum::Json;
use casino_aml::{AlertListFilter, NewReportRequest};

use crate::auth::AdminCredential;
use crate::dto::{
    AnalyzeResponse, CreateAlertRequest, CreateReportRequest, HighRiskQuery, ListAlertsQuery,
    PlayerAlertsQuery, ReportResponse, RiskProfileResponse, UpdateAlertStatusRequest,
};
use crate::error::ApiError;
use crate::locale::Locale;
use crate::state::AppState;

pub async fn analyze_transaction(
    State(state): State<AppState>,
    _admin: AdminCredential,
    locale: Locale,
    Path(transaction_id): Path<String>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let result = state
        .aml
        .analyze_transaction(&transaction_id)
        .await
        .map_err(|e| ApiError::from(e).with_locale(&locale.0))?;
    Ok(Json(result.into()))
}

pub async fn create_alert(
    State(state): State<AppState>,
    _admin: AdminCredential,
    locale: Locale,
    Json(req): Json<CreateAlertRequest>,
) -> Result<Json<casino_store::AmlAlert>, ApiError> {
    let alert = state
        .aml
        .create_manual_alert(&req.player_id, req.severity, &req.description, req.transaction_ids)
        .await
        .map_err(|e| ApiError::from(e).with_locale(&locale.0))?;
    Ok(Json(alert))
}

pub async fn list_alerts(
    State(state): State<AppState>,
    _admin: AdminCredential,
    locale: Locale,
    Query(query): Query<ListAlertsQuery>,
) -> Result<Json<Vec<casino_store::AmlAlert>>, ApiError> {
    let alerts = state
        .aml
        .list_alerts(AlertListFilter {
            player_id: query.player_id,
            status: query.status,
            severity: query.severity,
            limit: query.limit,
            offset: query.offset,
        })
        .await
        .map_err(|e| ApiError::from(e).with_locale(&locale.0))?;
    Ok(Json(alerts))
}

pub async fn get_alert(
    State(state): State<AppState>,
    _admin: AdminCredential,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<Json<casino_store::AmlAlert>, ApiError> {
    let alert = state
        .aml
        .get_alert(id)
        .await
        .map_err(|e| ApiError::from(e).with_locale(&locale.0))?;
    Ok(Json(alert))
}

pub async fn update_alert_status(
    State(state): State<AppState>,
    _admin: AdminCredential,
    locale: Locale,
    Path(id): Path<i64>,
    Json(req): Json<UpdateAlertStatusRequest>,
) -> Result<Json<casino_store::AmlAlert>, ApiError> {
    let alert = state
        .aml
        .update_alert_status(
            id,
            req.status,
            req.reviewed_by.as_deref(),
            req.review_notes.as_deref(),
            req.report_reference.as_deref(),
        )
        .await
        .map_err(|e| ApiError::from(e).with_locale(&locale.0))?;
    Ok(Json(alert))
}

pub async fn risk_profile(
    State(state): State<AppState>,
    _admin: AdminCredential,
    locale: Locale,
    Path(player_id): Path<String>,
) -> Result<Json<RiskProfileResponse>, ApiError> {
    let profile = state
        .aml
        .get_risk_profile(&player_id)
        .await
        .map_err(|e| ApiError::from(e).with_locale(&locale.0))?;
    Ok(Json(RiskProfileResponse(profile)))
}

pub async fn high_risk_players(
    State(state): State<AppState>,
    _admin: AdminCredential,
    locale: Locale,
    Query(query): Query<HighRiskQuery>,
) -> Result<Json<Vec<casino_store::AmlRiskProfile>>, ApiError> {
    let profiles = state
        .aml
        .list_high_risk_players(query.limit)
        .await
        .map_err(|e| ApiError::from(e).with_locale(&locale.0))?;
    Ok(Json(profiles))
}

pub async fn player_alerts(
    State(state): State<AppState>,
    _admin: AdminCredential,
    locale: Locale,
    Path(player_id): Path<String>,
    Query(query): Query<PlayerAlertsQuery>,
) -> Result<Json<Vec<casino_store::AmlAlert>>, ApiError> {
    let alerts = state
        .aml
        .list_player_alerts(&player_id, query.limit, query.offset)
        .await
        .map_err(|e| ApiError::from(e).with_locale(&locale.0))?;
    Ok(Json(alerts))
}

pub async fn create_report(
    State(state): State<AppState>,
    _admin: AdminCredential,
    locale: Locale,
    Json(req): Json<CreateReportRequest>,
) -> Result<Json<ReportResponse>, ApiError> {
    let report = state
        .aml
        .create_report(NewReportRequest {
            player_id: req.player_id,
            report_type: req.report_type,
            jurisdiction: req.jurisdiction,
            alert_id: req.alert_id,
            transaction_ids: req.transaction_ids,
            notes: req.notes,
        })
        .await
        .map_err(|e| ApiError::from(e).with_locale(&locale.0))?;
    Ok(Json(report.into()))
}
