//! Idempotent schema bootstrap
//!
//! Initial schema migrations are out of scope per spec.md §1, but the crate
//! must still stand up its own tables for local development and tests
//! without an external migration tool. `ensure_schema` is safe to call on
//! every startup.

use sqlx::PgPool;

pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS players (
            player_id   TEXT PRIMARY KEY,
            first_name  TEXT NOT NULL,
            last_name   TEXT NOT NULL,
            country     TEXT NOT NULL,
            currency    TEXT NOT NULL,
            anonymized  BOOLEAN NOT NULL DEFAULT FALSE,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS wallets (
            player_id   TEXT PRIMARY KEY REFERENCES players(player_id),
            balance     NUMERIC(20, 2) NOT NULL DEFAULT 0 CHECK (balance >= 0),
            currency    TEXT NOT NULL,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id                  BIGSERIAL PRIMARY KEY,
            transaction_id      TEXT NOT NULL UNIQUE,
            player_id           TEXT NOT NULL REFERENCES players(player_id),
            transaction_type    TEXT NOT NULL,
            amount              NUMERIC(20, 2) NOT NULL CHECK (amount > 0),
            currency            TEXT NOT NULL,
            status              TEXT NOT NULL,
            original_balance    NUMERIC(20, 2) NOT NULL,
            updated_balance     NUMERIC(20, 2) NOT NULL,
            ref_transaction_id  TEXT,
            provider            TEXT,
            game_id             TEXT,
            session_id          TEXT,
            metadata            JSONB NOT NULL DEFAULT '{}'::jsonb,
            created_at          TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_transactions_player_created
         ON transactions(player_id, created_at DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_transactions_player_type
         ON transactions(player_id, transaction_type)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS aml_alerts (
            id                  BIGSERIAL PRIMARY KEY,
            player_id           TEXT NOT NULL REFERENCES players(player_id),
            alert_type          TEXT NOT NULL,
            severity            TEXT NOT NULL,
            status              TEXT NOT NULL,
            description         TEXT NOT NULL,
            detection_rule      TEXT NOT NULL,
            risk_score          DOUBLE PRECISION NOT NULL,
            transaction_ids     JSONB NOT NULL DEFAULT '[]'::jsonb,
            transaction_details JSONB NOT NULL DEFAULT '{}'::jsonb,
            alert_data          JSONB NOT NULL DEFAULT '{}'::jsonb,
            reviewed_by         TEXT,
            review_notes        TEXT,
            reviewed_at         TIMESTAMPTZ,
            reported_at         TIMESTAMPTZ,
            report_reference    TEXT,
            created_at          TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_aml_alerts_player_created
         ON aml_alerts(player_id, created_at DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS aml_risk_profiles (
            player_id               TEXT PRIMARY KEY REFERENCES players(player_id),
            overall_risk_score      DOUBLE PRECISION NOT NULL DEFAULT 0,
            deposit_risk_score      DOUBLE PRECISION NOT NULL DEFAULT 0,
            withdrawal_risk_score   DOUBLE PRECISION NOT NULL DEFAULT 0,
            gameplay_risk_score     DOUBLE PRECISION NOT NULL DEFAULT 0,
            last_deposit_at         TIMESTAMPTZ,
            last_withdrawal_at      TIMESTAMPTZ,
            last_played_at          TIMESTAMPTZ,
            deposit_count_7d        BIGINT NOT NULL DEFAULT 0,
            deposit_amount_7d       NUMERIC(20, 2) NOT NULL DEFAULT 0,
            withdrawal_count_7d     BIGINT NOT NULL DEFAULT 0,
            withdrawal_amount_7d    NUMERIC(20, 2) NOT NULL DEFAULT 0,
            deposit_count_30d       BIGINT NOT NULL DEFAULT 0,
            deposit_amount_30d      NUMERIC(20, 2) NOT NULL DEFAULT 0,
            withdrawal_count_30d    BIGINT NOT NULL DEFAULT 0,
            withdrawal_amount_30d   NUMERIC(20, 2) NOT NULL DEFAULT 0,
            wager_to_deposit_ratio      DOUBLE PRECISION NOT NULL DEFAULT 0,
            withdrawal_to_deposit_ratio DOUBLE PRECISION NOT NULL DEFAULT 0,
            risk_factors            JSONB NOT NULL DEFAULT '{}'::jsonb,
            last_assessment_at      TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_risk_profiles_score
         ON aml_risk_profiles(overall_risk_score DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS aml_reports (
            report_id       TEXT PRIMARY KEY,
            player_id       TEXT NOT NULL REFERENCES players(player_id),
            report_type     TEXT NOT NULL,
            jurisdiction    TEXT NOT NULL,
            alert_id        BIGINT REFERENCES aml_alerts(id),
            transaction_ids JSONB NOT NULL DEFAULT '[]'::jsonb,
            notes           TEXT,
            status          TEXT NOT NULL,
            created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at      TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
