//! Durable persistence for players, wallets, transactions, and AML records
//!
//! All mutation flows through a single [`StoreSession`] per request: one
//! Postgres transaction, row-locked where spec.md §4.1/§5 require it,
//! committed or rolled back as a unit. Nothing outside this crate issues
//! SQL directly.

pub mod error;
pub mod models;
pub mod pii;
pub mod pool;
pub mod schema;
pub mod session;

pub use error::StoreError;
pub use models::*;
pub use pii::{PiiCipher, PiiError};
pub use pool::StorePool;
pub use session::{AlertFilter, NewAlert, NewReport, NewTransaction, StoreSession};
