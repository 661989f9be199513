//! Event payloads published on the shared channels (spec.md §2 C5, §4.5)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    WalletUpdated {
        player_id: String,
        timestamp: DateTime<Utc>,
    },
    AmlAlertRaised {
        alert_id: i64,
        player_id: String,
        severity: String,
        timestamp: DateTime<Utc>,
    },
    AmlReportCreated {
        report_id: String,
        player_id: String,
        report_type: String,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent {
    pub fn wallet_updated(player_id: impl Into<String>) -> Self {
        DomainEvent::WalletUpdated {
            player_id: player_id.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn aml_alert_raised(alert_id: i64, player_id: impl Into<String>, severity: impl Into<String>) -> Self {
        DomainEvent::AmlAlertRaised {
            alert_id,
            player_id: player_id.into(),
            severity: severity.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn aml_report_created(
        report_id: impl Into<String>,
        player_id: impl Into<String>,
        report_type: impl Into<String>,
    ) -> Self {
        DomainEvent::AmlReportCreated {
            report_id: report_id.into(),
            player_id: player_id.into(),
            report_type: report_type.into(),
            timestamp: Utc::now(),
        }
    }

    /// The Redis channel this event is published on.
    pub fn channel(&self) -> &'static str {
        match self {
            DomainEvent::WalletUpdated { .. } => "wallet_updates",
            DomainEvent::AmlAlertRaised { .. } => "aml_alerts",
            DomainEvent::AmlReportCreated { .. } => "aml_reports",
        }
    }

    pub fn to_json(&self) -> Result<Json, serde_json::Error> {
        serde_json::to_value(self)
    }
}
