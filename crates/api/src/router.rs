//! HTTP route table (spec.md §6 "HTTP surface").

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{aml, bootstrap, wallet};
use crate::middleware::enforce_access_control;
use crate::state::AppState;

pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/ua/v1/:casino_key/:api_token", post(bootstrap::bootstrap))
        .route("/api/balance", post(wallet::balance))
        .route("/api/check", post(wallet::check))
        .route("/api/debit", post(wallet::debit))
        .route("/api/credit", post(wallet::credit))
        .route("/api/cancel", post(wallet::cancel))
        .route("/aml/analyze-transaction/:transaction_id", post(aml::analyze_transaction))
        .route("/aml/alerts", post(aml::create_alert).get(aml::list_alerts))
        .route("/aml/alerts/:id", get(aml::get_alert))
        .route("/aml/alerts/:id/status", put(aml::update_alert_status))
        .route("/aml/player/:player_id/risk-profile", get(aml::risk_profile))
        .route("/aml/high-risk-players", get(aml::high_risk_players))
        .route("/aml/player/:player_id/alerts", get(aml::player_alerts))
        .route("/aml/report", post(aml::create_report))
        .layer(axum::middleware::from_fn_with_state(state.clone(), enforce_access_control))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
