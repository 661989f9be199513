//! Pure scoring rules (spec.md §4.4 rule table). Each function inspects a
//! [`RuleInputs`] snapshot assembled by the service and returns whether it
//! fired plus its score contribution; `score_transaction` combines them.

use rust_decimal::Decimal;

use crate::jurisdiction::{is_high_risk_country, Jurisdiction};
use crate::types::{RuleInputs, RuleOutcome};

fn large_transaction(inputs: &RuleInputs) -> (bool, f64) {
    let jurisdiction = Jurisdiction::for_country(&inputs.country);
    let threshold = jurisdiction.threshold(&inputs.currency);
    (inputs.amount >= threshold, 25.0)
}

fn pep_match(inputs: &RuleInputs) -> (bool, f64) {
    let status_flag = inputs
        .pep_status
        .as_deref()
        .map(|s| matches!(s.to_lowercase().as_str(), "pep" | "politically_exposed_person"))
        .unwrap_or(false);
    (inputs.is_pep_flag || status_flag, 40.0)
}

fn high_risk_jurisdiction(inputs: &RuleInputs) -> (bool, f64) {
    let country_flag = is_high_risk_country(&inputs.country)
        || inputs
            .metadata_country
            .as_deref()
            .map(is_high_risk_country)
            .unwrap_or(false);
    (inputs.high_risk_jurisdiction_flag || country_flag, 35.0)
}

/// Structuring: sums several independent signals across 24h and 7d
/// windows, capped at 80 (spec.md §4.4).
fn structuring(inputs: &RuleInputs) -> (bool, f64) {
    let jurisdiction = Jurisdiction::for_country(&inputs.country);
    let threshold = jurisdiction.threshold(&inputs.currency);

    let mut score = 0.0;
    let mut triggered = false;

    if inputs.same_type_count_24h >= 3 {
        triggered = true;
        score += 15.0;
    }
    if threshold > Decimal::ZERO {
        let ratio_24h = inputs.same_type_sum_24h / threshold;
        if ratio_24h >= Decimal::new(8, 1) && ratio_24h <= Decimal::new(11, 1) {
            triggered = true;
            score += 20.0;
        }
    }
    if inputs.same_type_band_count_24h >= 2 {
        triggered = true;
        score += 15.0;
    }
    if threshold > Decimal::ZERO
        && inputs.same_type_count_7d >= 50
        && inputs.same_type_sum_7d > threshold * Decimal::new(8, 1)
    {
        triggered = true;
        score += 25.0;
    }
    if threshold > Decimal::ZERO && inputs.same_type_count_7d >= 20 {
        let avg_7d = inputs.same_type_sum_7d / Decimal::from(inputs.same_type_count_7d);
        if avg_7d < threshold * Decimal::new(5, 2) {
            triggered = true;
            score += 20.0;
        }
    }
    if inputs.same_type_band_count_7d >= 5 {
        triggered = true;
        score += 25.0;
    }

    (triggered, score.min(80.0))
}

/// Unusual pattern: large deviation from the player's own 30-day average
/// or recent-5 window, with a late-night bonus (spec.md §4.4).
fn unusual_pattern(inputs: &RuleInputs) -> (bool, f64) {
    let recent = &inputs.recent_same_type_amounts;
    let max_recent = recent.iter().cloned().max().unwrap_or(Decimal::ZERO);
    let avg_recent = if recent.is_empty() {
        Decimal::ZERO
    } else {
        recent.iter().sum::<Decimal>() / Decimal::from(recent.len() as i64)
    };

    let exceeds_30d_avg = inputs.avg_30d > Decimal::ZERO && inputs.amount > inputs.avg_30d * Decimal::from(3);
    let exceeds_recent_window =
        !recent.is_empty() && inputs.amount > max_recent * Decimal::from(2) && inputs.amount > avg_recent * Decimal::from(3);

    let triggered = exceeds_30d_avg || exceeds_recent_window;
    let mut score = if exceeds_recent_window {
        50.0
    } else if exceeds_30d_avg {
        40.0
    } else {
        0.0
    };

    if triggered && (1..=5).contains(&inputs.hour_utc) {
        score += 10.0;
    }

    (triggered, score.min(60.0))
}

/// Runs every rule and combines the result into a single clipped score
/// plus the per-rule booleans the API surfaces (spec.md §4.4, §8 S4-S6).
pub fn score_transaction(inputs: &RuleInputs) -> RuleOutcome {
    let (is_large, large_score) = large_transaction(inputs);
    let (is_pep, pep_score) = pep_match(inputs);
    let (is_high_risk, hr_score) = high_risk_jurisdiction(inputs);
    let (is_structuring, structuring_score) = structuring(inputs);
    let (is_unusual, unusual_score) = unusual_pattern(inputs);

    let mut total = 0.0;
    if is_large {
        total += large_score;
    }
    if is_pep {
        total += pep_score;
    }
    if is_high_risk {
        total += hr_score;
    }
    if is_structuring {
        total += structuring_score;
    }
    if is_unusual {
        total += unusual_score;
    }

    RuleOutcome {
        risk_score: total.min(100.0),
        is_large_transaction: is_large,
        is_politically_exposed_person: is_pep,
        is_high_risk_jurisdiction: is_high_risk,
        is_structuring_attempt: is_structuring,
        is_unusual_pattern: is_unusual,
        sanctions_match: crate::jurisdiction::is_sanctioned_country(&inputs.country)
            || inputs.metadata_country.as_deref().map(crate::jurisdiction::is_sanctioned_country).unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_inputs() -> RuleInputs {
        RuleInputs {
            amount: dec!(100),
            currency: "EUR".to_string(),
            country: "DE".to_string(),
            is_pep_flag: false,
            pep_status: None,
            high_risk_jurisdiction_flag: false,
            metadata_country: None,
            same_type_count_24h: 0,
            same_type_sum_24h: Decimal::ZERO,
            same_type_band_count_24h: 0,
            same_type_count_7d: 0,
            same_type_sum_7d: Decimal::ZERO,
            same_type_band_count_7d: 0,
            recent_same_type_amounts: vec![],
            avg_30d: Decimal::ZERO,
            hour_utc: 12,
        }
    }

    #[test]
    fn test_large_transaction_malta_eur() {
        let mut inputs = base_inputs();
        inputs.country = "MT".to_string();
        inputs.amount = dec!(2500);
        let outcome = score_transaction(&inputs);
        assert!(outcome.is_large_transaction);
        assert!(outcome.risk_score >= 25.0);
    }

    #[test]
    fn test_pep_flag() {
        let mut inputs = base_inputs();
        inputs.is_pep_flag = true;
        let outcome = score_transaction(&inputs);
        assert!(outcome.is_politically_exposed_person);
        assert_eq!(outcome.risk_score, 40.0);
    }

    #[test]
    fn test_high_risk_country() {
        let mut inputs = base_inputs();
        inputs.country = "KP".to_string();
        let outcome = score_transaction(&inputs);
        assert!(outcome.is_high_risk_jurisdiction);
        assert!(outcome.sanctions_match);
    }

    #[test]
    fn test_structuring_via_count_and_band() {
        let mut inputs = base_inputs();
        inputs.country = "PH".to_string();
        inputs.currency = "USD".to_string();
        inputs.same_type_count_24h = 5;
        inputs.same_type_band_count_7d = 5;
        let outcome = score_transaction(&inputs);
        assert!(outcome.is_structuring_attempt);
        assert!(outcome.risk_score >= 20.0);
    }

    #[test]
    fn test_unusual_pattern_with_night_bonus() {
        let mut inputs = base_inputs();
        inputs.amount = dec!(1000);
        inputs.avg_30d = dec!(100);
        inputs.hour_utc = 3;
        let outcome = score_transaction(&inputs);
        assert!(outcome.is_unusual_pattern);
        assert_eq!(outcome.risk_score, 50.0);
    }

    #[test]
    fn test_score_clips_at_100() {
        let mut inputs = base_inputs();
        inputs.country = "KP".to_string();
        inputs.is_pep_flag = true;
        inputs.high_risk_jurisdiction_flag = true;
        inputs.same_type_count_24h = 3;
        inputs.amount = dec!(50000);
        inputs.avg_30d = dec!(100);
        let outcome = score_transaction(&inputs);
        assert!(outcome.risk_score <= 100.0);
    }
}
