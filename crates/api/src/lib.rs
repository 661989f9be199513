//! API Facade (C6): request validation, auth, domain-error translation,
//! and the HTTP route table over WalletService/AMLService (spec.md §4.6).

pub mod access;
pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod locale;
pub mod middleware;
pub mod router;
pub mod state;

pub use access::AccessControl;
pub use auth::JwtCodec;
pub use router::build;
pub use state::AppState;
