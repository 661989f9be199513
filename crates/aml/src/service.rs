//! AMLService (C4): rule-based scoring, alert emission, and rolling
//! risk-profile maintenance (spec.md §4.4).
//!
//! `analyze_transaction` opens one store session, reads the transaction
//! and its player plus the windows the rules need, scores it, emits at
//! most one alert, recomputes the player's risk profile, and commits
//! everything as a unit. Nothing here ever runs inside a wallet
//! mutation's own transaction (spec.md §5): the scheduler invokes
//! [`AmlService::analyze_transaction_best_effort`] only after the
//! originating mutation has already committed.

use std::collections::HashMap;

use casino_core::DomainError;
use casino_store::{
    AlertStatus, AlertType, AmlAlert, AmlReport, AmlRiskProfile, NewAlert, NewReport, ReportStatus,
    StorePool, Severity, TransactionType,
};
use chrono::{Duration, Timelike, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value as Json};
use tracing::{instrument, warn};

use crate::jurisdiction::Jurisdiction;
use crate::risk_profile::{self, WindowStats};
use crate::rules::score_transaction;
use crate::types::{AlertListFilter, AnalysisResult, NewReportRequest, RuleInputs};

pub struct AmlService {
    store: StorePool,
}

impl AmlService {
    pub fn new(store: StorePool) -> Self {
        Self { store }
    }

    /// `analyze_transaction(transaction_id) → AnalysisResult`. Surfaces
    /// errors directly; used by the admin-facing analyze endpoint.
    #[instrument(skip(self))]
    pub async fn analyze_transaction(&self, transaction_id: &str) -> Result<AnalysisResult, DomainError> {
        let mut session = self.store.session().await.map_err(store_err)?;

        let tx = match session.find_transaction_by_id(transaction_id).await.map_err(store_err)? {
            Some(tx) => tx,
            None => {
                session.rollback().await.map_err(store_err)?;
                return Err(DomainError::transaction_not_found());
            }
        };

        let player = match session.get_player(&tx.player_id).await.map_err(store_err)? {
            Some(p) => p,
            None => {
                session.rollback().await.map_err(store_err)?;
                return Err(DomainError::player_not_found());
            }
        };

        let now = Utc::now();
        let jurisdiction = Jurisdiction::for_country(&player.country);
        let threshold = jurisdiction.threshold(&tx.currency);

        let window_24h = session
            .list_transactions_by_type_window(&tx.player_id, tx.transaction_type, now - Duration::hours(24))
            .await
            .map_err(store_err)?;
        let window_7d = session
            .list_transactions_by_type_window(&tx.player_id, tx.transaction_type, now - Duration::days(7))
            .await
            .map_err(store_err)?;

        let same_type_count_24h = window_24h.len() as i64;
        let same_type_sum_24h: Decimal = window_24h.iter().map(|t| t.amount).sum();
        let same_type_band_count_24h = window_24h
            .iter()
            .filter(|t| {
                threshold > Decimal::ZERO
                    && t.amount >= threshold * Decimal::new(7, 1)
                    && t.amount < threshold
            })
            .count() as i64;

        let same_type_count_7d = window_7d.len() as i64;
        let same_type_sum_7d: Decimal = window_7d.iter().map(|t| t.amount).sum();
        let same_type_band_count_7d = max_band_cluster(&window_7d.iter().map(|t| t.amount).collect::<Vec<_>>(), threshold);

        let mut recent_same_type_amounts: Vec<Decimal> = window_7d
            .iter()
            .filter(|t| t.transaction_id != tx.transaction_id)
            .rev()
            .take(5)
            .map(|t| t.amount)
            .collect();
        recent_same_type_amounts.reverse();

        let (sum_30d, count_30d) = session
            .sum_and_count_in_window(&tx.player_id, tx.transaction_type, now - Duration::days(30))
            .await
            .map_err(store_err)?;
        let (pre_sum_30d, pre_count_30d) = if count_30d > 0 {
            (sum_30d - tx.amount, (count_30d - 1).max(0))
        } else {
            (sum_30d, count_30d)
        };
        let avg_30d = if pre_count_30d > 0 {
            pre_sum_30d / Decimal::from(pre_count_30d)
        } else {
            Decimal::ZERO
        };

        let metadata_is_pep = tx.metadata.get("is_pep").and_then(Json::as_bool).unwrap_or(false);
        let metadata_pep_status = tx
            .metadata
            .get("pep_status")
            .and_then(Json::as_str)
            .map(|s| s.to_string());
        let metadata_high_risk = tx
            .metadata
            .get("high_risk_jurisdiction")
            .and_then(Json::as_bool)
            .unwrap_or(false);
        let metadata_country = tx.metadata.get("country").and_then(Json::as_str).map(|s| s.to_string());

        let inputs = RuleInputs {
            amount: tx.amount,
            currency: tx.currency.clone(),
            country: player.country.clone(),
            is_pep_flag: metadata_is_pep,
            pep_status: metadata_pep_status,
            high_risk_jurisdiction_flag: metadata_high_risk,
            metadata_country,
            same_type_count_24h,
            same_type_sum_24h,
            same_type_band_count_24h,
            same_type_count_7d,
            same_type_sum_7d,
            same_type_band_count_7d,
            recent_same_type_amounts,
            avg_30d,
            hour_utc: tx.created_at.hour(),
        };

        let outcome = score_transaction(&inputs);

        let alert = if let Some((alert_type, detection_rule, description)) = pick_alert(&outcome) {
            let severity = if outcome.sanctions_match {
                Severity::Critical
            } else {
                match alert_type {
                    AlertType::PepMatch | AlertType::HighRiskCountry | AlertType::Structuring => Severity::High,
                    _ => Severity::Medium,
                }
            };

            let snapshot = json!({
                "transaction_id": tx.transaction_id,
                "transaction_type": tx.transaction_type.to_string(),
                "amount": tx.amount.to_string(),
                "currency": tx.currency,
                "created_at": tx.created_at,
            });

            let alert_data = json!({
                "is_large_transaction": outcome.is_large_transaction,
                "is_politically_exposed_person": outcome.is_politically_exposed_person,
                "is_high_risk_jurisdiction": outcome.is_high_risk_jurisdiction,
                "is_structuring_attempt": outcome.is_structuring_attempt,
                "is_unusual_pattern": outcome.is_unusual_pattern,
                "jurisdiction": jurisdiction.as_str(),
            });

            Some(
                session
                    .insert_alert(NewAlert {
                        player_id: &tx.player_id,
                        alert_type,
                        severity,
                        description: &description,
                        detection_rule,
                        risk_score: outcome.risk_score,
                        transaction_ids: vec![tx.transaction_id.clone()],
                        transaction_details: snapshot,
                        alert_data,
                    })
                    .await
                    .map_err(store_err)?,
            )
        } else {
            None
        };

        let deposit_7d = session
            .sum_and_count_in_window(&tx.player_id, TransactionType::Credit, now - Duration::days(7))
            .await
            .map_err(store_err)?;
        let withdrawal_7d = session
            .sum_and_count_in_window(&tx.player_id, TransactionType::Debit, now - Duration::days(7))
            .await
            .map_err(store_err)?;
        let deposit_30d = session
            .sum_and_count_in_window(&tx.player_id, TransactionType::Credit, now - Duration::days(30))
            .await
            .map_err(store_err)?;
        let withdrawal_30d = session
            .sum_and_count_in_window(&tx.player_id, TransactionType::Debit, now - Duration::days(30))
            .await
            .map_err(store_err)?;
        let last_deposit_at = session
            .latest_transaction_at(&tx.player_id, TransactionType::Credit)
            .await
            .map_err(store_err)?;
        let last_withdrawal_at = session
            .latest_transaction_at(&tx.player_id, TransactionType::Debit)
            .await
            .map_err(store_err)?;

        let old_profile = session.get_risk_profile(&tx.player_id).await.map_err(store_err)?;

        let stats = WindowStats {
            deposit_count_7d: deposit_7d.1,
            deposit_amount_7d: deposit_7d.0,
            withdrawal_count_7d: withdrawal_7d.1,
            withdrawal_amount_7d: withdrawal_7d.0,
            deposit_count_30d: deposit_30d.1,
            deposit_amount_30d: deposit_30d.0,
            withdrawal_count_30d: withdrawal_30d.1,
            withdrawal_amount_30d: withdrawal_30d.0,
            wager_amount_30d: withdrawal_30d.0,
            last_deposit_at,
            last_withdrawal_at,
        };

        let updated_profile = risk_profile::update_profile(
            old_profile,
            &tx.player_id,
            tx.transaction_type,
            outcome.risk_score,
            stats,
            now,
        );
        session.upsert_risk_profile(&updated_profile).await.map_err(store_err)?;

        session.commit().await.map_err(store_err)?;

        Ok(AnalysisResult {
            transaction_id: tx.transaction_id,
            player_id: tx.player_id,
            risk_score: outcome.risk_score,
            is_large_transaction: outcome.is_large_transaction,
            is_politically_exposed_person: outcome.is_politically_exposed_person,
            is_high_risk_jurisdiction: outcome.is_high_risk_jurisdiction,
            is_structuring_attempt: outcome.is_structuring_attempt,
            is_unusual_pattern: outcome.is_unusual_pattern,
            alert,
        })
    }

    /// Post-commit hook for C7: never fails the caller. Errors are logged
    /// and swallowed, leaving the profile unchanged (spec.md §4.4
    /// "Failure semantics").
    #[instrument(skip(self))]
    pub async fn analyze_transaction_best_effort(&self, transaction_id: &str) {
        if let Err(err) = self.analyze_transaction(transaction_id).await {
            warn!(transaction_id, error = %err, "aml analysis failed, no alert emitted");
        }
    }

    /// Manual alert creation (`POST /aml/alerts`), for analysts raising an
    /// alert outside the automatic rule pipeline (`AlertType::Manual`).
    #[instrument(skip(self, description))]
    pub async fn create_manual_alert(
        &self,
        player_id: &str,
        severity: Severity,
        description: &str,
        transaction_ids: Vec<String>,
    ) -> Result<AmlAlert, DomainError> {
        let mut session = self.store.session().await.map_err(store_err)?;
        let alert = session
            .insert_alert(NewAlert {
                player_id,
                alert_type: casino_store::AlertType::Manual,
                severity,
                description,
                detection_rule: "manual",
                risk_score: 0.0,
                transaction_ids,
                transaction_details: Json::Object(Default::default()),
                alert_data: Json::Object(Default::default()),
            })
            .await
            .map_err(store_err)?;
        session.commit().await.map_err(store_err)?;
        Ok(alert)
    }

    pub async fn get_alert(&self, id: i64) -> Result<AmlAlert, DomainError> {
        let mut session = self.store.session().await.map_err(store_err)?;
        let alert = session.get_alert(id).await.map_err(store_err)?;
        session.rollback().await.map_err(store_err)?;
        alert.ok_or_else(|| DomainError::new(casino_core::ErrorKind::TransactionNotFound, "alert not found"))
    }

    pub async fn list_alerts(&self, filter: AlertListFilter) -> Result<Vec<AmlAlert>, DomainError> {
        let mut session = self.store.session().await.map_err(store_err)?;
        let alerts = session
            .list_alerts(casino_store::AlertFilter {
                player_id: filter.player_id,
                status: filter.status,
                severity: filter.severity,
                limit: filter.limit,
                offset: filter.offset,
            })
            .await
            .map_err(store_err)?;
        session.rollback().await.map_err(store_err)?;
        Ok(alerts)
    }

    pub async fn list_player_alerts(&self, player_id: &str, limit: i64, offset: i64) -> Result<Vec<AmlAlert>, DomainError> {
        self.list_alerts(AlertListFilter {
            player_id: Some(player_id.to_string()),
            status: None,
            severity: None,
            limit,
            offset,
        })
        .await
    }

    pub async fn update_alert_status(
        &self,
        id: i64,
        status: AlertStatus,
        reviewed_by: Option<&str>,
        review_notes: Option<&str>,
        report_reference: Option<&str>,
    ) -> Result<AmlAlert, DomainError> {
        let mut session = self.store.session().await.map_err(store_err)?;
        let alert = session
            .update_alert_status(id, status, reviewed_by, review_notes, report_reference)
            .await
            .map_err(store_err)?;
        session.commit().await.map_err(store_err)?;
        Ok(alert)
    }

    pub async fn get_risk_profile(&self, player_id: &str) -> Result<AmlRiskProfile, DomainError> {
        let mut session = self.store.session().await.map_err(store_err)?;
        let profile = session.get_risk_profile(player_id).await.map_err(store_err)?;
        session.rollback().await.map_err(store_err)?;
        Ok(profile.unwrap_or(AmlRiskProfile {
            player_id: player_id.to_string(),
            ..Default::default()
        }))
    }

    pub async fn list_high_risk_players(&self, limit: i64) -> Result<Vec<AmlRiskProfile>, DomainError> {
        let mut session = self.store.session().await.map_err(store_err)?;
        let profiles = session.list_risk_profiles_by_score_desc(limit).await.map_err(store_err)?;
        session.rollback().await.map_err(store_err)?;
        Ok(profiles)
    }

    pub async fn create_report(&self, request: NewReportRequest) -> Result<AmlReport, DomainError> {
        let report_id = format!("RPT-{}", uuid::Uuid::new_v4());
        let mut session = self.store.session().await.map_err(store_err)?;
        let report = session
            .insert_report(NewReport {
                report_id: &report_id,
                player_id: &request.player_id,
                report_type: request.report_type,
                jurisdiction: &request.jurisdiction,
                alert_id: request.alert_id,
                transaction_ids: request.transaction_ids,
                notes: request.notes.as_deref(),
            })
            .await
            .map_err(store_err)?;
        session.commit().await.map_err(store_err)?;
        Ok(report)
    }

    pub async fn update_report_status(&self, report_id: &str, status: ReportStatus) -> Result<AmlReport, DomainError> {
        let mut session = self.store.session().await.map_err(store_err)?;
        let report = match session.update_report_status(report_id, status).await {
            Ok(report) => report,
            Err(err) => {
                session.rollback().await.map_err(store_err)?;
                return Err(match err {
                    casino_store::StoreError::InvalidTransition { .. } => {
                        DomainError::transaction_already_processed()
                    }
                    casino_store::StoreError::NotFound => DomainError::transaction_not_found(),
                    other => store_err(other),
                });
            }
        };
        session.commit().await.map_err(store_err)?;
        Ok(report)
    }
}

/// Priority order: PEP_MATCH > HIGH_RISK_COUNTRY > STRUCTURING >
/// LARGE_TRANSACTION > UNUSUAL_PATTERN; at most one alert per analysis
/// (spec.md §4.4).
fn pick_alert(outcome: &crate::types::RuleOutcome) -> Option<(AlertType, &'static str, String)> {
    if outcome.is_politically_exposed_person {
        return Some((
            AlertType::PepMatch,
            "pep_detection",
            "Transaction involves a politically exposed person".to_string(),
        ));
    }
    if outcome.is_high_risk_jurisdiction {
        return Some((
            AlertType::HighRiskCountry,
            "high_risk_country",
            "Player or transaction linked to a FATF high-risk jurisdiction".to_string(),
        ));
    }
    if outcome.is_structuring_attempt {
        return Some((
            AlertType::Structuring,
            "structuring_detection",
            "Transaction pattern consistent with structuring".to_string(),
        ));
    }
    if outcome.is_large_transaction {
        return Some((
            AlertType::LargeTransaction,
            "large_transaction",
            "Transaction amount exceeds the jurisdiction's large-transaction threshold".to_string(),
        ));
    }
    if outcome.is_unusual_pattern {
        return Some((
            AlertType::UnusualPattern,
            "unusual_pattern",
            "Transaction amount deviates sharply from the player's recent activity".to_string(),
        ));
    }
    None
}

/// Largest count of amounts falling into a single 10%-of-threshold bucket
/// (spec.md §4.4: "≥5 clustered into a single 10%-of-threshold band").
fn max_band_cluster(amounts: &[Decimal], threshold: Decimal) -> i64 {
    if threshold <= Decimal::ZERO {
        return 0;
    }
    let band = threshold / Decimal::from(10);
    if band <= Decimal::ZERO {
        return 0;
    }
    let mut buckets: HashMap<i64, i64> = HashMap::new();
    for amount in amounts {
        let key = (amount / band).trunc().to_i64().unwrap_or(0);
        *buckets.entry(key).or_insert(0) += 1;
    }
    buckets.values().copied().max().unwrap_or(0)
}

fn store_err(err: casino_store::StoreError) -> DomainError {
    DomainError::internal(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RuleOutcome;

    fn outcome() -> RuleOutcome {
        RuleOutcome {
            risk_score: 0.0,
            is_large_transaction: false,
            is_politically_exposed_person: false,
            is_high_risk_jurisdiction: false,
            is_structuring_attempt: false,
            is_unusual_pattern: false,
            sanctions_match: false,
        }
    }

    #[test]
    fn pick_alert_prioritizes_pep_over_everything_else() {
        let mut o = outcome();
        o.is_politically_exposed_person = true;
        o.is_large_transaction = true;
        o.is_structuring_attempt = true;
        let (alert_type, ..) = pick_alert(&o).unwrap();
        assert_eq!(alert_type, AlertType::PepMatch);
    }

    #[test]
    fn pick_alert_falls_back_to_unusual_pattern_when_nothing_else_fires() {
        let mut o = outcome();
        o.is_unusual_pattern = true;
        let (alert_type, ..) = pick_alert(&o).unwrap();
        assert_eq!(alert_type, AlertType::UnusualPattern);
    }

    #[test]
    fn pick_alert_returns_none_when_no_rule_fired() {
        assert!(pick_alert(&outcome()).is_none());
    }

    #[test]
    fn max_band_cluster_zero_threshold_is_zero() {
        assert_eq!(max_band_cluster(&[Decimal::new(100, 0)], Decimal::ZERO), 0);
    }

    #[test]
    fn max_band_cluster_counts_largest_bucket() {
        let threshold = Decimal::new(1000, 0);
        let amounts = vec![
            Decimal::new(950, 0),
            Decimal::new(960, 0),
            Decimal::new(100, 0),
        ];
        assert_eq!(max_band_cluster(&amounts, threshold), 2);
    }
}
