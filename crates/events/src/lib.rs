//! Fire-and-forget publication of domain events for downstream consumers
//! (spec.md §2 C5, §4.5): `wallet_updated`, `aml_alert_raised`,
//! `aml_report_created`.

pub mod bus;
pub mod error;
pub mod event;

pub use bus::EventBus;
pub use error::EventError;
pub use event::DomainEvent;
