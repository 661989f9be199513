//! Request/response shapes for AMLService operations (spec.md §4.4)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use casino_store::{AlertStatus, AmlAlert, AmlRiskProfile, ReportType, Severity};

/// Everything a rule function needs, assembled by the service from the
/// store so the rules themselves stay pure and unit-testable.
#[derive(Debug, Clone)]
pub struct RuleInputs {
    pub amount: Decimal,
    pub currency: String,
    pub country: String,
    pub is_pep_flag: bool,
    pub pep_status: Option<String>,
    pub high_risk_jurisdiction_flag: bool,
    pub metadata_country: Option<String>,
    pub same_type_count_24h: i64,
    pub same_type_sum_24h: Decimal,
    pub same_type_band_count_24h: i64,
    pub same_type_count_7d: i64,
    pub same_type_sum_7d: Decimal,
    pub same_type_band_count_7d: i64,
    pub recent_same_type_amounts: Vec<Decimal>,
    pub avg_30d: Decimal,
    pub hour_utc: u32,
}

#[derive(Debug, Clone, Default)]
pub struct RuleOutcome {
    pub risk_score: f64,
    pub is_large_transaction: bool,
    pub is_politically_exposed_person: bool,
    pub is_high_risk_jurisdiction: bool,
    pub is_structuring_attempt: bool,
    pub is_unusual_pattern: bool,
    pub sanctions_match: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
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

#[derive(Debug, Clone, Default)]
pub struct AlertListFilter {
    pub player_id: Option<String>,
    pub status: Option<AlertStatus>,
    pub severity: Option<Severity>,
    pub limit: i64,
    pub offset: i64,
}

pub struct NewReportRequest {
    pub player_id: String,
    pub report_type: ReportType,
    pub jurisdiction: String,
    pub alert_id: Option<i64>,
    pub transaction_ids: Vec<String>,
    pub notes: Option<String>,
}

/// Re-exported so `casino-api` doesn't need a direct `casino-store`
/// dependency just to shuttle these types through HTTP handlers.
pub type RiskProfile = AmlRiskProfile;
pub type Alert = AmlAlert;
