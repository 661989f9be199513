//! Transactional session: the one mutable shared-state seam on the hot path
//!
//! A `StoreSession` wraps a single Postgres transaction. `get_wallet_for_update`
//! takes the row lock that serializes all mutations for one player
//! (spec.md §4.1, §5); the lock is held until `commit`/`rollback` (or
//! `Drop`) releases it, and no network I/O to the cache or event bus may
//! happen while it's held (spec.md §5).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as Json;
use sqlx::postgres::Postgres;
use sqlx::{Row, Transaction};

use crate::error::{classify, StoreError};
use crate::models::*;
use crate::pii::PiiCipher;

pub struct StoreSession {
    tx: Transaction<'static, Postgres>,
    pii: Arc<PiiCipher>,
}

/// Fields needed to append a new ledger row (spec.md §3 Transaction invariants).
pub struct NewTransaction<'a> {
    pub transaction_id: &'a str,
    pub player_id: &'a str,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub currency: &'a str,
    pub original_balance: Decimal,
    pub updated_balance: Decimal,
    pub ref_transaction_id: Option<&'a str>,
    pub provider: Option<&'a str>,
    pub game_id: Option<&'a str>,
    pub session_id: Option<&'a str>,
    pub metadata: Json,
}

pub struct NewAlert<'a> {
    pub player_id: &'a str,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub description: &'a str,
    pub detection_rule: &'a str,
    pub risk_score: f64,
    pub transaction_ids: Vec<String>,
    pub transaction_details: Json,
    pub alert_data: Json,
}

#[derive(Default)]
pub struct AlertFilter {
    pub player_id: Option<String>,
    pub status: Option<AlertStatus>,
    pub severity: Option<Severity>,
    pub limit: i64,
    pub offset: i64,
}

pub struct NewReport<'a> {
    pub report_id: &'a str,
    pub player_id: &'a str,
    pub report_type: ReportType,
    pub jurisdiction: &'a str,
    pub alert_id: Option<i64>,
    pub transaction_ids: Vec<String>,
    pub notes: Option<&'a str>,
}

impl StoreSession {
    pub(crate) fn new(tx: Transaction<'static, Postgres>, pii: Arc<PiiCipher>) -> Self {
        Self { tx, pii }
    }

    pub async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(classify)
    }

    pub async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await.map_err(classify)
    }

    // === Players ===

    /// `first_name`/`last_name` are stored as AES-256-GCM ciphertext
    /// (spec.md §1); decrypted here so every other caller deals in plaintext.
    pub async fn get_player(&mut self, player_id: &str) -> Result<Option<Player>, StoreError> {
        let row = sqlx::query(
            "SELECT player_id, first_name, last_name, country, currency, anonymized, created_at
             FROM players WHERE player_id = $1",
        )
        .bind(player_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(classify)?;

        row.map(|r| {
            let first_name: String = r.get("first_name");
            let last_name: String = r.get("last_name");
            Ok(Player {
                player_id: r.get("player_id"),
                first_name: self.pii.decrypt(&first_name)?,
                last_name: self.pii.decrypt(&last_name)?,
                country: r.get("country"),
                currency: r.get("currency"),
                anonymized: r.get("anonymized"),
                created_at: r.get("created_at"),
            })
        })
        .transpose()
        .map_err(StoreError::from)
    }

    /// Create the player row on first authenticated appearance (spec.md §3:
    /// "Created on first authenticated appearance"). No-op if already present.
    /// Names are AES-256-GCM encrypted before the insert.
    pub async fn upsert_player(
        &mut self,
        player_id: &str,
        first_name: &str,
        last_name: &str,
        country: &str,
        currency: &str,
    ) -> Result<Player, StoreError> {
        let first_name_ct = self.pii.encrypt(first_name)?;
        let last_name_ct = self.pii.encrypt(last_name)?;

        let row = sqlx::query(
            r#"
            INSERT INTO players (player_id, first_name, last_name, country, currency)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (player_id) DO UPDATE SET player_id = players.player_id
            RETURNING player_id, first_name, last_name, country, currency, anonymized, created_at
            "#,
        )
        .bind(player_id)
        .bind(&first_name_ct)
        .bind(&last_name_ct)
        .bind(country)
        .bind(currency)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(classify)?;

        let stored_first_name: String = row.get("first_name");
        let stored_last_name: String = row.get("last_name");

        Ok(Player {
            player_id: row.get("player_id"),
            first_name: self.pii.decrypt(&stored_first_name)?,
            last_name: self.pii.decrypt(&stored_last_name)?,
            country: row.get("country"),
            currency: row.get("currency"),
            anonymized: row.get("anonymized"),
            created_at: row.get("created_at"),
        })
    }

    /// GDPR soft-anonymization: blank names in place, keep the row and every
    /// Transaction/Wallet it owns (SPEC_FULL.md §8 supplement).
    pub async fn anonymize_player(&mut self, player_id: &str) -> Result<(), StoreError> {
        let blank = self.pii.encrypt("")?;
        sqlx::query(
            "UPDATE players SET first_name = $2, last_name = $2, anonymized = TRUE
             WHERE player_id = $1",
        )
        .bind(player_id)
        .bind(&blank)
        .execute(&mut *self.tx)
        .await
        .map_err(classify)?;
        Ok(())
    }

    // === Wallets ===

    /// Row-locking read. `for_update = true` blocks other writers of the
    /// same row until this session commits or rolls back (spec.md §4.1).
    pub async fn get_wallet(
        &mut self,
        player_id: &str,
        for_update: bool,
    ) -> Result<Option<Wallet>, StoreError> {
        let sql = if for_update {
            "SELECT player_id, balance, currency, created_at, updated_at
             FROM wallets WHERE player_id = $1 FOR UPDATE"
        } else {
            "SELECT player_id, balance, currency, created_at, updated_at
             FROM wallets WHERE player_id = $1"
        };

        let row = sqlx::query(sql)
            .bind(player_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(classify)?;

        Ok(row.map(|r| Wallet {
            player_id: r.get("player_id"),
            balance: r.get("balance"),
            currency: r.get("currency"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        }))
    }

    pub async fn create_wallet(&mut self, player_id: &str, currency: &str) -> Result<Wallet, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO wallets (player_id, balance, currency)
            VALUES ($1, 0, $2)
            RETURNING player_id, balance, currency, created_at, updated_at
            "#,
        )
        .bind(player_id)
        .bind(currency)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(classify)?;

        Ok(Wallet {
            player_id: row.get("player_id"),
            balance: row.get("balance"),
            currency: row.get("currency"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    pub async fn set_wallet_balance(&mut self, player_id: &str, balance: Decimal) -> Result<(), StoreError> {
        sqlx::query("UPDATE wallets SET balance = $1, updated_at = now() WHERE player_id = $2")
            .bind(balance)
            .bind(player_id)
            .execute(&mut *self.tx)
            .await
            .map_err(classify)?;
        Ok(())
    }

    // === Transactions ===

    pub async fn find_transaction_by_id(
        &mut self,
        transaction_id: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, transaction_id, player_id, transaction_type, amount, currency, status,
                   original_balance, updated_balance, ref_transaction_id, provider, game_id,
                   session_id, metadata, created_at
            FROM transactions WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(classify)?;

        row.map(row_to_transaction).transpose()
    }

    pub async fn find_cancel_for_ref(
        &mut self,
        ref_transaction_id: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, transaction_id, player_id, transaction_type, amount, currency, status,
                   original_balance, updated_balance, ref_transaction_id, provider, game_id,
                   session_id, metadata, created_at
            FROM transactions WHERE transaction_type = 'cancel' AND ref_transaction_id = $1
            "#,
        )
        .bind(ref_transaction_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(classify)?;

        row.map(row_to_transaction).transpose()
    }

    pub async fn insert_transaction(&mut self, new_tx: NewTransaction<'_>) -> Result<Transaction, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO transactions
                (transaction_id, player_id, transaction_type, amount, currency, status,
                 original_balance, updated_balance, ref_transaction_id, provider, game_id,
                 session_id, metadata)
            VALUES ($1, $2, $3, $4, $5, 'completed', $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, transaction_id, player_id, transaction_type, amount, currency, status,
                      original_balance, updated_balance, ref_transaction_id, provider, game_id,
                      session_id, metadata, created_at
            "#,
        )
        .bind(new_tx.transaction_id)
        .bind(new_tx.player_id)
        .bind(new_tx.transaction_type.to_string())
        .bind(new_tx.amount)
        .bind(new_tx.currency)
        .bind(new_tx.original_balance)
        .bind(new_tx.updated_balance)
        .bind(new_tx.ref_transaction_id)
        .bind(new_tx.provider)
        .bind(new_tx.game_id)
        .bind(new_tx.session_id)
        .bind(new_tx.metadata)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(classify)?;

        row_to_transaction(row)
    }

    /// Flip the referenced transaction's status to `canceled` (spec.md §3:
    /// "no transaction record is ever updated except the single status flip
    /// on cancel").
    pub async fn flip_transaction_canceled(&mut self, transaction_id: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE transactions SET status = 'canceled' WHERE transaction_id = $1")
            .bind(transaction_id)
            .execute(&mut *self.tx)
            .await
            .map_err(classify)?;
        Ok(())
    }

    pub async fn list_transactions_by_type_window(
        &mut self,
        player_id: &str,
        transaction_type: TransactionType,
        since: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, transaction_id, player_id, transaction_type, amount, currency, status,
                   original_balance, updated_balance, ref_transaction_id, provider, game_id,
                   session_id, metadata, created_at
            FROM transactions
            WHERE player_id = $1 AND transaction_type = $2 AND status = 'completed'
              AND created_at >= $3
            ORDER BY created_at ASC
            "#,
        )
        .bind(player_id)
        .bind(transaction_type.to_string())
        .bind(since)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(classify)?;

        rows.into_iter().map(row_to_transaction).collect()
    }

    pub async fn sum_and_count_in_window(
        &mut self,
        player_id: &str,
        transaction_type: TransactionType,
        since: DateTime<Utc>,
    ) -> Result<(Decimal, i64), StoreError> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(amount), 0) AS total, COUNT(*) AS cnt
            FROM transactions
            WHERE player_id = $1 AND transaction_type = $2 AND status = 'completed'
              AND created_at >= $3
            "#,
        )
        .bind(player_id)
        .bind(transaction_type.to_string())
        .bind(since)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(classify)?;

        Ok((row.get("total"), row.get("cnt")))
    }

    pub async fn latest_transaction_at(
        &mut self,
        player_id: &str,
        transaction_type: TransactionType,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT MAX(created_at) AS latest FROM transactions
            WHERE player_id = $1 AND transaction_type = $2 AND status = 'completed'
            "#,
        )
        .bind(player_id)
        .bind(transaction_type.to_string())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(classify)?;

        Ok(row.get("latest"))
    }

    // === AML alerts ===

    pub async fn insert_alert(&mut self, alert: NewAlert<'_>) -> Result<AmlAlert, StoreError> {
        let tx_ids = serde_json::to_value(&alert.transaction_ids).map_err(StoreError::Serialization)?;

        let row = sqlx::query(
            r#"
            INSERT INTO aml_alerts
                (player_id, alert_type, severity, status, description, detection_rule,
                 risk_score, transaction_ids, transaction_details, alert_data)
            VALUES ($1, $2, $3, 'NEW', $4, $5, $6, $7, $8, $9)
            RETURNING id, player_id, alert_type, severity, status, description, detection_rule,
                      risk_score, transaction_ids, transaction_details, alert_data,
                      reviewed_by, review_notes, reviewed_at, reported_at, report_reference, created_at
            "#,
        )
        .bind(alert.player_id)
        .bind(alert.alert_type.to_string())
        .bind(alert.severity.to_string())
        .bind(alert.description)
        .bind(alert.detection_rule)
        .bind(alert.risk_score)
        .bind(tx_ids)
        .bind(alert.transaction_details)
        .bind(alert.alert_data)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(classify)?;

        row_to_alert(row)
    }

    pub async fn get_alert(&mut self, id: i64) -> Result<Option<AmlAlert>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, player_id, alert_type, severity, status, description, detection_rule,
                   risk_score, transaction_ids, transaction_details, alert_data,
                   reviewed_by, review_notes, reviewed_at, reported_at, report_reference, created_at
            FROM aml_alerts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(classify)?;

        row.map(row_to_alert).transpose()
    }

    pub async fn list_alerts(&mut self, filter: AlertFilter) -> Result<Vec<AmlAlert>, StoreError> {
        let limit = if filter.limit <= 0 { 50 } else { filter.limit };

        let rows = sqlx::query(
            r#"
            SELECT id, player_id, alert_type, severity, status, description, detection_rule,
                   risk_score, transaction_ids, transaction_details, alert_data,
                   reviewed_by, review_notes, reviewed_at, reported_at, report_reference, created_at
            FROM aml_alerts
            WHERE ($1::text IS NULL OR player_id = $1)
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL OR severity = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filter.player_id)
        .bind(filter.status.map(|s| s.to_string()))
        .bind(filter.severity.map(|s| s.to_string()))
        .bind(limit)
        .bind(filter.offset)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(classify)?;

        rows.into_iter().map(row_to_alert).collect()
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_alert_status(
        &mut self,
        id: i64,
        status: AlertStatus,
        reviewed_by: Option<&str>,
        review_notes: Option<&str>,
        report_reference: Option<&str>,
    ) -> Result<AmlAlert, StoreError> {
        let reviewed_at_clause = if matches!(status, AlertStatus::New) {
            "reviewed_at"
        } else {
            "now()"
        };
        let reported_at_clause = if matches!(status, AlertStatus::Reported) {
            "now()"
        } else {
            "reported_at"
        };

        let sql = format!(
            r#"
            UPDATE aml_alerts SET
                status = $1,
                reviewed_by = COALESCE($2, reviewed_by),
                review_notes = COALESCE($3, review_notes),
                report_reference = COALESCE($4, report_reference),
                reviewed_at = {reviewed_at_clause},
                reported_at = {reported_at_clause}
            WHERE id = $5
            RETURNING id, player_id, alert_type, severity, status, description, detection_rule,
                      risk_score, transaction_ids, transaction_details, alert_data,
                      reviewed_by, review_notes, reviewed_at, reported_at, report_reference, created_at
            "#
        );

        let row = sqlx::query(&sql)
            .bind(status.to_string())
            .bind(reviewed_by)
            .bind(review_notes)
            .bind(report_reference)
            .bind(id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(classify)?;

        row_to_alert(row)
    }

    // === AML risk profiles ===

    pub async fn get_risk_profile(&mut self, player_id: &str) -> Result<Option<AmlRiskProfile>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT player_id, overall_risk_score, deposit_risk_score, withdrawal_risk_score,
                   gameplay_risk_score, last_deposit_at, last_withdrawal_at, last_played_at,
                   deposit_count_7d, deposit_amount_7d, withdrawal_count_7d, withdrawal_amount_7d,
                   deposit_count_30d, deposit_amount_30d, withdrawal_count_30d, withdrawal_amount_30d,
                   wager_to_deposit_ratio, withdrawal_to_deposit_ratio, risk_factors, last_assessment_at
            FROM aml_risk_profiles WHERE player_id = $1
            "#,
        )
        .bind(player_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(classify)?;

        Ok(row.map(row_to_profile))
    }

    pub async fn upsert_risk_profile(&mut self, profile: &AmlRiskProfile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO aml_risk_profiles
                (player_id, overall_risk_score, deposit_risk_score, withdrawal_risk_score,
                 gameplay_risk_score, last_deposit_at, last_withdrawal_at, last_played_at,
                 deposit_count_7d, deposit_amount_7d, withdrawal_count_7d, withdrawal_amount_7d,
                 deposit_count_30d, deposit_amount_30d, withdrawal_count_30d, withdrawal_amount_30d,
                 wager_to_deposit_ratio, withdrawal_to_deposit_ratio, risk_factors, last_assessment_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            ON CONFLICT (player_id) DO UPDATE SET
                overall_risk_score = EXCLUDED.overall_risk_score,
                deposit_risk_score = EXCLUDED.deposit_risk_score,
                withdrawal_risk_score = EXCLUDED.withdrawal_risk_score,
                gameplay_risk_score = EXCLUDED.gameplay_risk_score,
                last_deposit_at = EXCLUDED.last_deposit_at,
                last_withdrawal_at = EXCLUDED.last_withdrawal_at,
                last_played_at = EXCLUDED.last_played_at,
                deposit_count_7d = EXCLUDED.deposit_count_7d,
                deposit_amount_7d = EXCLUDED.deposit_amount_7d,
                withdrawal_count_7d = EXCLUDED.withdrawal_count_7d,
                withdrawal_amount_7d = EXCLUDED.withdrawal_amount_7d,
                deposit_count_30d = EXCLUDED.deposit_count_30d,
                deposit_amount_30d = EXCLUDED.deposit_amount_30d,
                withdrawal_count_30d = EXCLUDED.withdrawal_count_30d,
                withdrawal_amount_30d = EXCLUDED.withdrawal_amount_30d,
                wager_to_deposit_ratio = EXCLUDED.wager_to_deposit_ratio,
                withdrawal_to_deposit_ratio = EXCLUDED.withdrawal_to_deposit_ratio,
                risk_factors = EXCLUDED.risk_factors,
                last_assessment_at = EXCLUDED.last_assessment_at
            "#,
        )
        .bind(&profile.player_id)
        .bind(profile.overall_risk_score)
        .bind(profile.deposit_risk_score)
        .bind(profile.withdrawal_risk_score)
        .bind(profile.gameplay_risk_score)
        .bind(profile.last_deposit_at)
        .bind(profile.last_withdrawal_at)
        .bind(profile.last_played_at)
        .bind(profile.deposit_count_7d)
        .bind(profile.deposit_amount_7d)
        .bind(profile.withdrawal_count_7d)
        .bind(profile.withdrawal_amount_7d)
        .bind(profile.deposit_count_30d)
        .bind(profile.deposit_amount_30d)
        .bind(profile.withdrawal_count_30d)
        .bind(profile.withdrawal_amount_30d)
        .bind(profile.wager_to_deposit_ratio)
        .bind(profile.withdrawal_to_deposit_ratio)
        .bind(&profile.risk_factors)
        .bind(profile.last_assessment_at)
        .execute(&mut *self.tx)
        .await
        .map_err(classify)?;

        Ok(())
    }

    pub async fn list_risk_profiles_by_score_desc(&mut self, limit: i64) -> Result<Vec<AmlRiskProfile>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT player_id, overall_risk_score, deposit_risk_score, withdrawal_risk_score,
                   gameplay_risk_score, last_deposit_at, last_withdrawal_at, last_played_at,
                   deposit_count_7d, deposit_amount_7d, withdrawal_count_7d, withdrawal_amount_7d,
                   deposit_count_30d, deposit_amount_30d, withdrawal_count_30d, withdrawal_amount_30d,
                   wager_to_deposit_ratio, withdrawal_to_deposit_ratio, risk_factors, last_assessment_at
            FROM aml_risk_profiles
            ORDER BY overall_risk_score DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(classify)?;

        Ok(rows.into_iter().map(row_to_profile).collect())
    }

    // === AML reports ===

    pub async fn insert_report(&mut self, report: NewReport<'_>) -> Result<AmlReport, StoreError> {
        let tx_ids = serde_json::to_value(&report.transaction_ids).map_err(StoreError::Serialization)?;

        let row = sqlx::query(
            r#"
            INSERT INTO aml_reports
                (report_id, player_id, report_type, jurisdiction, alert_id, transaction_ids, notes, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'draft')
            RETURNING report_id, player_id, report_type, jurisdiction, alert_id, transaction_ids,
                      notes, status, created_at, updated_at
            "#,
        )
        .bind(report.report_id)
        .bind(report.player_id)
        .bind(report.report_type.to_string())
        .bind(report.jurisdiction)
        .bind(report.alert_id)
        .bind(tx_ids)
        .bind(report.notes)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(classify)?;

        row_to_report(row)
    }

    /// Advances `report_id` to `status`, enforcing the one-way
    /// `draft -> submitted -> acknowledged` sequence (spec.md's AMLReport
    /// lifecycle). Re-asserting the current status is a no-op; any other
    /// non-forward transition is rejected.
    pub async fn update_report_status(
        &mut self,
        report_id: &str,
        status: ReportStatus,
    ) -> Result<AmlReport, StoreError> {
        let row = sqlx::query("SELECT status FROM aml_reports WHERE report_id = $1 FOR UPDATE")
            .bind(report_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(classify)?
            .ok_or(StoreError::NotFound)?;

        let current_raw: String = row.get("status");
        let current: ReportStatus = current_raw.parse().map_err(|_| StoreError::NotFound)?;

        if !report_transition_allowed(current, status) {
            return Err(StoreError::InvalidTransition {
                from: current.to_string(),
                to: status.to_string(),
            });
        }

        let row = sqlx::query(
            r#"
            UPDATE aml_reports SET status = $1, updated_at = now()
            WHERE report_id = $2
            RETURNING report_id, player_id, report_type, jurisdiction, alert_id, transaction_ids,
                      notes, status, created_at, updated_at
            "#,
        )
        .bind(status.to_string())
        .bind(report_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(classify)?;

        row_to_report(row)
    }
}

fn report_transition_allowed(from: ReportStatus, to: ReportStatus) -> bool {
    matches!(
        (from, to),
        (ReportStatus::Draft, ReportStatus::Draft)
            | (ReportStatus::Draft, ReportStatus::Submitted)
            | (ReportStatus::Submitted, ReportStatus::Submitted)
            | (ReportStatus::Submitted, ReportStatus::Acknowledged)
            | (ReportStatus::Acknowledged, ReportStatus::Acknowledged)
    )
}

fn row_to_transaction(row: sqlx::postgres::PgRow) -> Result<Transaction, StoreError> {
    let transaction_type: String = row.get("transaction_type");
    let status: String = row.get("status");

    Ok(Transaction {
        id: row.get("id"),
        transaction_id: row.get("transaction_id"),
        player_id: row.get("player_id"),
        transaction_type: transaction_type
            .parse()
            .map_err(|_| StoreError::Database(sqlx::Error::Decode("bad transaction_type".into())))?,
        amount: row.get("amount"),
        currency: row.get("currency"),
        status: status
            .parse()
            .map_err(|_| StoreError::Database(sqlx::Error::Decode("bad status".into())))?,
        original_balance: row.get("original_balance"),
        updated_balance: row.get("updated_balance"),
        ref_transaction_id: row.get("ref_transaction_id"),
        provider: row.get("provider"),
        game_id: row.get("game_id"),
        session_id: row.get("session_id"),
        metadata: row.get("metadata"),
        created_at: row.get("created_at"),
    })
}

fn row_to_alert(row: sqlx::postgres::PgRow) -> Result<AmlAlert, StoreError> {
    let alert_type: String = row.get("alert_type");
    let severity: String = row.get("severity");
    let status: String = row.get("status");
    let tx_ids: Json = row.get("transaction_ids");

    Ok(AmlAlert {
        id: row.get("id"),
        player_id: row.get("player_id"),
        alert_type: alert_type
            .parse()
            .map_err(|_| StoreError::Database(sqlx::Error::Decode("bad alert_type".into())))?,
        severity: severity
            .parse()
            .map_err(|_| StoreError::Database(sqlx::Error::Decode("bad severity".into())))?,
        status: status
            .parse()
            .map_err(|_| StoreError::Database(sqlx::Error::Decode("bad alert status".into())))?,
        description: row.get("description"),
        detection_rule: row.get("detection_rule"),
        risk_score: row.get("risk_score"),
        transaction_ids: serde_json::from_value(tx_ids).unwrap_or_default(),
        transaction_details: row.get("transaction_details"),
        alert_data: row.get("alert_data"),
        reviewed_by: row.get("reviewed_by"),
        review_notes: row.get("review_notes"),
        reviewed_at: row.get("reviewed_at"),
        reported_at: row.get("reported_at"),
        report_reference: row.get("report_reference"),
        created_at: row.get("created_at"),
    })
}

fn row_to_profile(row: sqlx::postgres::PgRow) -> AmlRiskProfile {
    AmlRiskProfile {
        player_id: row.get("player_id"),
        overall_risk_score: row.get("overall_risk_score"),
        deposit_risk_score: row.get("deposit_risk_score"),
        withdrawal_risk_score: row.get("withdrawal_risk_score"),
        gameplay_risk_score: row.get("gameplay_risk_score"),
        last_deposit_at: row.get("last_deposit_at"),
        last_withdrawal_at: row.get("last_withdrawal_at"),
        last_played_at: row.get("last_played_at"),
        deposit_count_7d: row.get("deposit_count_7d"),
        deposit_amount_7d: row.get("deposit_amount_7d"),
        withdrawal_count_7d: row.get("withdrawal_count_7d"),
        withdrawal_amount_7d: row.get("withdrawal_amount_7d"),
        deposit_count_30d: row.get("deposit_count_30d"),
        deposit_amount_30d: row.get("deposit_amount_30d"),
        withdrawal_count_30d: row.get("withdrawal_count_30d"),
        withdrawal_amount_30d: row.get("withdrawal_amount_30d"),
        wager_to_deposit_ratio: row.get("wager_to_deposit_ratio"),
        withdrawal_to_deposit_ratio: row.get("withdrawal_to_deposit_ratio"),
        risk_factors: row.get("risk_factors"),
        last_assessment_at: row.get("last_assessment_at"),
    }
}

fn row_to_report(row: sqlx::postgres::PgRow) -> Result<AmlReport, StoreError> {
    let report_type: String = row.get("report_type");
    let status: String = row.get("status");
    let tx_ids: Json = row.get("transaction_ids");

    Ok(AmlReport {
        report_id: row.get("report_id"),
        player_id: row.get("player_id"),
        report_type: report_type
            .parse()
            .map_err(|_| StoreError::Database(sqlx::Error::Decode("bad report_type".into())))?,
        jurisdiction: row.get("jurisdiction"),
        alert_id: row.get("alert_id"),
        transaction_ids: serde_json::from_value(tx_ids).unwrap_or_default(),
        notes: row.get("notes"),
        status: status
            .parse()
            .map_err(|_| StoreError::Database(sqlx::Error::Decode("bad report status".into())))?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
