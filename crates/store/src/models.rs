//! Row types for the persistence schema (spec.md §3, §6)
//!
//! Enum columns are stored as `TEXT` and converted at the edge via
//! `strum`'s `Display`/`EnumString`, the same pattern the ledger crate this
//! workspace grew out of used for its account-category column.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub player_id: String,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub currency: String,
    pub anonymized: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub player_id: String,
    pub balance: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Debit,
    Credit,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Canceled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub transaction_id: String,
    pub player_id: String,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub currency: String,
    pub status: TransactionStatus,
    pub original_balance: Decimal,
    pub updated_balance: Decimal,
    pub ref_transaction_id: Option<String>,
    pub provider: Option<String>,
    pub game_id: Option<String>,
    pub session_id: Option<String>,
    pub metadata: Json,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    LargeTransaction,
    UnusualPattern,
    Structuring,
    HighRiskCountry,
    SanctionsMatch,
    PepMatch,
    RapidMovement,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertStatus {
    New,
    Investigating,
    Dismissed,
    Reported,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmlAlert {
    pub id: i64,
    pub player_id: String,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub status: AlertStatus,
    pub description: String,
    pub detection_rule: String,
    pub risk_score: f64,
    pub transaction_ids: Vec<String>,
    pub transaction_details: Json,
    pub alert_data: Json,
    pub reviewed_by: Option<String>,
    pub review_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reported_at: Option<DateTime<Utc>>,
    pub report_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AmlRiskProfile {
    pub player_id: String,
    pub overall_risk_score: f64,
    pub deposit_risk_score: f64,
    pub withdrawal_risk_score: f64,
    pub gameplay_risk_score: f64,
    pub last_deposit_at: Option<DateTime<Utc>>,
    pub last_withdrawal_at: Option<DateTime<Utc>>,
    pub last_played_at: Option<DateTime<Utc>>,
    pub deposit_count_7d: i64,
    pub deposit_amount_7d: Decimal,
    pub withdrawal_count_7d: i64,
    pub withdrawal_amount_7d: Decimal,
    pub deposit_count_30d: i64,
    pub deposit_amount_30d: Decimal,
    pub withdrawal_count_30d: i64,
    pub withdrawal_amount_30d: Decimal,
    pub wager_to_deposit_ratio: f64,
    pub withdrawal_to_deposit_ratio: f64,
    pub risk_factors: Json,
    pub last_assessment_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportType {
    Str,
    Ctr,
    Sar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Draft,
    Submitted,
    Acknowledged,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmlReport {
    pub report_id: String,
    pub player_id: String,
    pub report_type: ReportType,
    pub jurisdiction: String,
    pub alert_id: Option<i64>,
    pub transaction_ids: Vec<String>,
    pub notes: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
