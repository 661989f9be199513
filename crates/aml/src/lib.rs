//! AMLService (C4): rule-based transaction scoring, alert emission, and
//! rolling risk-profile maintenance (spec.md §4.4).

pub mod jurisdiction;
pub mod risk_profile;
pub mod rules;
pub mod service;
pub mod types;

pub use jurisdiction::Jurisdiction;
pub use service::AmlService;
pub use types::{Alert, AlertListFilter, AnalysisResult, NewReportRequest, RiskProfile};
