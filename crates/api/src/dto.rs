//! Wire-format request/response bodies, matching spec.md §6 field-for-field.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use casino_store::{AlertStatus, AmlAlert, AmlRiskProfile, ReportType, Severity};

// === Bootstrap auth ===

#[derive(Debug, Deserialize)]
pub struct BootstrapSession {
    pub id: String,
    pub ip: String,
}

#[derive(Debug, Deserialize)]
pub struct BootstrapPlayer {
    pub id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub country: String,
    pub currency: String,
    pub session: BootstrapSession,
}

#[derive(Debug, Deserialize)]
pub struct BootstrapRequest {
    pub uuid: String,
    pub player: BootstrapPlayer,
}

#[derive(Debug, Clone, Serialize)]
pub struct BootstrapEntry {
    pub params: String,
}

#[derive(Debug, Serialize)]
pub struct BootstrapResponse {
    pub entry: BootstrapEntry,
    #[serde(rename = "entryEmbedded")]
    pub entry_embedded: BootstrapEntry,
}

// === Wallet ===

#[derive(Debug, Deserialize)]
pub struct BalanceRequest {
    pub uuid: String,
    pub player_id: String,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub status: &'static str,
    pub balance: Decimal,
    pub currency: String,
    pub uuid: String,
    pub player_id: String,
    pub cache_hit: bool,
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub uuid: String,
    pub player_id: String,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub status: &'static str,
    pub uuid: String,
    pub player_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MutationRequest {
    pub uuid: String,
    pub transaction_id: String,
    pub player_id: String,
    pub amount: Decimal,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub game_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<Json>,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub status: &'static str,
    pub balance: Decimal,
    pub currency: String,
    pub transaction_id: String,
    pub uuid: String,
    pub player_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub uuid: String,
    pub transaction_id: String,
    pub player_id: String,
    pub original_transaction_id: String,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub status: &'static str,
    pub balance: Decimal,
    pub currency: String,
    pub transaction_id: String,
    pub original_transaction_id: String,
    pub uuid: String,
    pub player_id: String,
}

// === AML ===

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub transaction_id: String,
    pub player_id: String,
    pub risk_score: f64,
    pub is_large_transaction: bool,
    pub is_politically_exposed_person: bool,
    pub is_high_risk_jurisdiction: bool,
    pub is_structuring_attempt: bool,
    pub is_unusual_pattern: bool,
    pub alert: Option<AmlAlert>,
}

impl From<casino_aml::AnalysisResult> for AnalyzeResponse {
    fn from(r: casino_aml::AnalysisResult) -> Self {
        Self {
            transaction_id: r.transaction_id,
            player_id: r.player_id,
            risk_score: r.risk_score,
            is_large_transaction: r.is_large_transaction,
            is_politically_exposed_person: r.is_politically_exposed_person,
            is_high_risk_jurisdiction: r.is_high_risk_jurisdiction,
            is_structuring_attempt: r.is_structuring_attempt,
            is_unusual_pattern: r.is_unusual_pattern,
            alert: r.alert,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAlertRequest {
    pub player_id: String,
    pub severity: Severity,
    pub description: String,
    #[serde(default)]
    pub transaction_ids: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ListAlertsQuery {
    pub player_id: Option<String>,
    pub status: Option<AlertStatus>,
    pub severity: Option<Severity>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct UpdateAlertStatusRequest {
    pub status: AlertStatus,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub review_notes: Option<String>,
    #[serde(default)]
    pub report_reference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerAlertsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct HighRiskQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct RiskProfileResponse(pub AmlRiskProfile);

#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    pub player_id: String,
    pub report_type: ReportType,
    pub jurisdiction: String,
    #[serde(default)]
    pub alert_id: Option<i64>,
    #[serde(default)]
    pub transaction_ids: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub report_id: String,
    pub player_id: String,
    pub report_type: ReportType,
    pub jurisdiction: String,
    pub alert_id: Option<i64>,
    pub transaction_ids: Vec<String>,
    pub notes: Option<String>,
    pub status: casino_store::ReportStatus,
}

impl From<casino_store::AmlReport> for ReportResponse {
    fn from(r: casino_store::AmlReport) -> Self {
        Self {
            report_id: r.report_id,
            player_id: r.player_id,
            report_type: r.report_type,
            jurisdiction: r.jurisdiction,
            alert_id: r.alert_id,
            transaction_ids: r.transaction_ids,
            notes: r.notes,
            status: r.status,
        }
    }
}
