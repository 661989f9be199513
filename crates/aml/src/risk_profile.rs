//! Rolling-window risk-profile recompute (spec.md §4.4 "Risk-profile
//! update"). Every analysis recomputes counts/sums from the store rather
//! than mutating the profile incrementally, then blends in the
//! transaction's own risk score.
//!
//! The simplified wallet ledger has only `credit`/`debit`/`cancel`
//! transaction types, not the original system's distinct
//! deposit/withdrawal/wager categories. This module maps `credit` to
//! deposit activity and `debit` to both withdrawal and wagering activity
//! (a debit is the only way money leaves the wallet in this model) — see
//! DESIGN.md for the full rationale.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::json;

use casino_store::{AmlRiskProfile, TransactionType};

#[derive(Debug, Clone, Default)]
pub struct WindowStats {
    pub deposit_count_7d: i64,
    pub deposit_amount_7d: Decimal,
    pub withdrawal_count_7d: i64,
    pub withdrawal_amount_7d: Decimal,
    pub deposit_count_30d: i64,
    pub deposit_amount_30d: Decimal,
    pub withdrawal_count_30d: i64,
    pub withdrawal_amount_30d: Decimal,
    pub wager_amount_30d: Decimal,
    pub last_deposit_at: Option<DateTime<Utc>>,
    pub last_withdrawal_at: Option<DateTime<Utc>>,
}

fn ratio(numerator: Decimal, denominator: Decimal) -> f64 {
    if denominator.is_zero() {
        0.0
    } else {
        (numerator / denominator).to_f64().unwrap_or(0.0)
    }
}

fn blend(old: f64, new_signal: f64) -> f64 {
    0.6 * old + 0.4 * new_signal
}

/// Recompute the profile for `player_id` after analyzing one transaction.
pub fn update_profile(
    old: Option<AmlRiskProfile>,
    player_id: &str,
    transaction_type: TransactionType,
    transaction_risk_score: f64,
    stats: WindowStats,
    now: DateTime<Utc>,
) -> AmlRiskProfile {
    let mut profile = old.unwrap_or_default();
    profile.player_id = player_id.to_string();

    profile.deposit_count_7d = stats.deposit_count_7d;
    profile.deposit_amount_7d = stats.deposit_amount_7d;
    profile.withdrawal_count_7d = stats.withdrawal_count_7d;
    profile.withdrawal_amount_7d = stats.withdrawal_amount_7d;
    profile.deposit_count_30d = stats.deposit_count_30d;
    profile.deposit_amount_30d = stats.deposit_amount_30d;
    profile.withdrawal_count_30d = stats.withdrawal_count_30d;
    profile.withdrawal_amount_30d = stats.withdrawal_amount_30d;

    if stats.last_deposit_at.is_some() {
        profile.last_deposit_at = stats.last_deposit_at;
    }
    if stats.last_withdrawal_at.is_some() {
        profile.last_withdrawal_at = stats.last_withdrawal_at;
    }
    if matches!(transaction_type, TransactionType::Debit) {
        profile.last_played_at = Some(now);
    }

    profile.wager_to_deposit_ratio = ratio(stats.wager_amount_30d, stats.deposit_amount_30d);
    profile.withdrawal_to_deposit_ratio = ratio(stats.withdrawal_amount_30d, stats.deposit_amount_30d);

    match transaction_type {
        TransactionType::Credit => {
            profile.deposit_risk_score = blend(profile.deposit_risk_score, transaction_risk_score);
        }
        TransactionType::Debit => {
            profile.withdrawal_risk_score = blend(profile.withdrawal_risk_score, transaction_risk_score);
        }
        TransactionType::Cancel => {}
    }
    profile.gameplay_risk_score = blend(profile.gameplay_risk_score, transaction_risk_score);

    profile.overall_risk_score = if transaction_risk_score >= 70.0 {
        0.5 * profile.overall_risk_score + 0.5 * transaction_risk_score
    } else {
        0.4 * profile.deposit_risk_score + 0.4 * profile.withdrawal_risk_score + 0.2 * profile.gameplay_risk_score
    };

    let very_low_wagering = profile.wager_to_deposit_ratio < 0.1;
    let low_wagering = profile.wager_to_deposit_ratio < 0.3;
    let high_withdrawal_ratio = profile.withdrawal_to_deposit_ratio > 0.95;
    let avg_deposit_7d = if profile.deposit_count_7d > 0 {
        profile.deposit_amount_7d / Decimal::from(profile.deposit_count_7d)
    } else {
        Decimal::ZERO
    };
    let multiple_small_deposits = profile.deposit_count_7d > 50 && avg_deposit_7d < Decimal::from(1_000_000);
    let high_risk_transaction = transaction_risk_score >= 50.0;

    if very_low_wagering {
        profile.overall_risk_score = profile.overall_risk_score.max(70.0);
    }
    if high_withdrawal_ratio {
        profile.overall_risk_score = profile.overall_risk_score.max(75.0);
    }
    profile.overall_risk_score = profile.overall_risk_score.clamp(0.0, 100.0);

    profile.risk_factors = json!({
        "very_low_wagering": very_low_wagering,
        "low_wagering": low_wagering,
        "high_withdrawal_ratio": high_withdrawal_ratio,
        "multiple_small_deposits": multiple_small_deposits,
        "high_risk_transaction": high_risk_transaction,
    });
    profile.last_assessment_at = Some(now);

    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn stats() -> WindowStats {
        WindowStats {
            deposit_count_7d: 2,
            deposit_amount_7d: dec!(200),
            withdrawal_count_7d: 1,
            withdrawal_amount_7d: dec!(50),
            deposit_count_30d: 5,
            deposit_amount_30d: dec!(1000),
            withdrawal_count_30d: 3,
            withdrawal_amount_30d: dec!(300),
            wager_amount_30d: dec!(900),
            last_deposit_at: Some(Utc::now()),
            last_withdrawal_at: None,
        }
    }

    #[test]
    fn test_overall_override_on_high_score() {
        let profile = update_profile(None, "P1", TransactionType::Credit, 85.0, stats(), Utc::now());
        assert!(profile.overall_risk_score >= 40.0);
    }

    #[test]
    fn test_ratios_zero_when_no_deposits() {
        let mut s = stats();
        s.deposit_amount_30d = Decimal::ZERO;
        let profile = update_profile(None, "P1", TransactionType::Debit, 10.0, s, Utc::now());
        assert_eq!(profile.wager_to_deposit_ratio, 0.0);
        assert_eq!(profile.withdrawal_to_deposit_ratio, 0.0);
    }

    #[test]
    fn test_high_risk_transaction_flag() {
        let profile = update_profile(None, "P1", TransactionType::Debit, 55.0, stats(), Utc::now());
        assert_eq!(profile.risk_factors["high_risk_transaction"], true);
    }
}
